//! Интеграционные тесты DeathBroadcast и backstab
//!
//! Inactive guard'ы не получают broadcast, backstab работает только незамеченным.

use std::time::Duration;

use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use sentinel_simulation::{
    create_stepped_app, BackstabRequested, BackstabZone, BehaviorChanged, BehaviorState,
    Collider2d, DeathBroadcast, DesiredVelocity, Facing, Guard, GuardEliminated, Inactive,
    LayerMask, Player, PlayerDied, PlayerStatus, VisionConfig, VisionSensor,
};

fn spawn_player(app: &mut App, x: f32) -> Entity {
    app.world_mut()
        .spawn((
            Player,
            Transform::from_xyz(x, 0.0, 0.0),
            Collider2d::circle(0.25, LayerMask::PLAYER),
        ))
        .id()
}

fn spawn_guard(app: &mut App, x: f32, facing: Facing, state: BehaviorState) -> Entity {
    app.world_mut()
        .spawn((
            Guard::default(),
            Transform::from_xyz(x, 0.0, 0.0),
            facing,
            state,
            VisionSensor::fixed(VisionConfig::default()),
            BackstabZone::default(),
        ))
        .id()
}

fn collect<E: Event + Clone>(app: &App) -> Vec<E> {
    let events = app.world().resource::<Events<E>>();
    let mut cursor = events.get_cursor();
    cursor.read(events).cloned().collect()
}

#[test]
fn test_broadcast_skips_inactive_guards() {
    let mut app = create_stepped_app();
    // Игрок далеко за спиной у обоих
    let player = spawn_player(&mut app, -30.0);
    let active = spawn_guard(&mut app, 0.0, Facing::Right, BehaviorState::Chase { elapsed: 0.0 });
    let dormant = spawn_guard(&mut app, 4.0, Facing::Right, BehaviorState::Chase { elapsed: 0.3 });
    app.world_mut().entity_mut(dormant).insert(Inactive);

    app.update();
    app.update();
    app.update();

    {
        let broadcast = app.world().resource::<DeathBroadcast>();
        assert!(broadcast.is_subscribed(active));
        assert!(!broadcast.is_subscribed(dormant));
    }
    // Detection sticky: без broadcast'а guard не возвращается в Patrol
    assert!(app.world().get::<BehaviorState>(active).unwrap().chase_timer().unwrap() > 0.0);

    app.world_mut().send_event(PlayerDied { player });
    app.update();

    assert!(app.world().get::<BehaviorState>(active).unwrap().is_patrol());
    assert_eq!(app.world().get::<DesiredVelocity>(active).unwrap().0, 0.0);
    // Неактивный guard заморожен целиком, включая ChaseTimer
    assert_eq!(
        *app.world().get::<BehaviorState>(dormant).unwrap(),
        BehaviorState::Chase { elapsed: 0.3 }
    );

    let changes = collect::<BehaviorChanged>(&app);
    assert!(changes
        .iter()
        .any(|change| change.guard == active && change.from == "Chase" && change.to == "Patrol"));
    assert!(changes.iter().all(|change| change.guard != dormant));
}

#[test]
fn test_activation_toggles_subscription() {
    let mut app = create_stepped_app();
    spawn_player(&mut app, -30.0);
    let guard = spawn_guard(&mut app, 0.0, Facing::Right, BehaviorState::Patrol);
    app.world_mut().entity_mut(guard).insert(Inactive);

    app.update();
    app.update();
    assert!(!app.world().resource::<DeathBroadcast>().is_subscribed(guard));

    app.world_mut().entity_mut(guard).remove::<Inactive>();
    app.update();
    assert!(app.world().resource::<DeathBroadcast>().is_subscribed(guard));

    app.world_mut().entity_mut(guard).insert(Inactive);
    app.update();
    assert!(!app.world().resource::<DeathBroadcast>().is_subscribed(guard));
}

/// Несколько update'ов без fixed тика, затем один полный тик
fn run_frames_without_fixed_tick(app: &mut App, frames: usize) {
    let timestep = Time::<Fixed>::from_hz(60.0).timestep();
    app.insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_millis(1)));
    for _ in 0..frames {
        app.update();
    }
    app.insert_resource(TimeUpdateStrategy::ManualDuration(timestep));
    app.update();
}

#[test]
fn test_reactivation_survives_frames_without_fixed_tick() {
    let mut app = create_stepped_app();
    spawn_player(&mut app, -30.0);
    let guard = spawn_guard(&mut app, 0.0, Facing::Right, BehaviorState::Patrol);
    app.world_mut().entity_mut(guard).insert(Inactive);
    app.update();
    app.update();
    assert!(!app.world().resource::<DeathBroadcast>().is_subscribed(guard));

    app.world_mut().entity_mut(guard).remove::<Inactive>();
    run_frames_without_fixed_tick(&mut app, 2);

    assert!(app.world().resource::<DeathBroadcast>().is_subscribed(guard));
}

#[test]
fn test_despawn_survives_frames_without_fixed_tick() {
    let mut app = create_stepped_app();
    spawn_player(&mut app, -30.0);
    let guard = spawn_guard(&mut app, 0.0, Facing::Right, BehaviorState::Patrol);
    app.update();
    app.update();
    assert!(app.world().resource::<DeathBroadcast>().is_subscribed(guard));

    app.world_mut().entity_mut(guard).despawn();
    run_frames_without_fixed_tick(&mut app, 2);

    assert!(app.world().resource::<DeathBroadcast>().is_empty());
}

#[test]
fn test_backstab_from_behind_eliminates_guard() {
    let mut app = create_stepped_app();
    // Центр зоны по умолчанию в 0.75 м за спиной
    let player = spawn_player(&mut app, -0.8);
    let guard = spawn_guard(&mut app, 0.0, Facing::Right, BehaviorState::Patrol);

    app.update();
    app.update();
    assert!(!app.world().get::<PlayerStatus>(player).unwrap().spotted);

    app.world_mut().send_event(BackstabRequested { player });
    app.update();

    assert!(app.world().get_entity(guard).is_err());
    let eliminated = collect::<GuardEliminated>(&app);
    assert_eq!(eliminated, vec![GuardEliminated { guard }]);

    app.update();
    assert!(!app.world().resource::<DeathBroadcast>().is_subscribed(guard));
}

#[test]
fn test_backstab_ignored_once_spotted() {
    let mut app = create_stepped_app();
    let player = spawn_player(&mut app, -0.8);
    let victim = spawn_guard(&mut app, 0.0, Facing::Right, BehaviorState::Patrol);
    // Второй guard смотрит на игрока
    let watcher = spawn_guard(&mut app, -3.0, Facing::Right, BehaviorState::Patrol);

    app.update();
    app.update();
    assert!(app.world().get::<PlayerStatus>(player).unwrap().spotted);
    assert!(matches!(
        app.world().get::<BehaviorState>(watcher),
        Some(BehaviorState::Chase { .. })
    ));

    app.world_mut().send_event(BackstabRequested { player });
    app.update();

    assert!(app.world().get_entity(victim).is_ok());
    assert!(collect::<GuardEliminated>(&app).is_empty());
}

#[test]
fn test_backstab_ignored_while_player_dying() {
    let mut app = create_stepped_app();
    let player = spawn_player(&mut app, -0.8);
    let guard = spawn_guard(&mut app, 0.0, Facing::Right, BehaviorState::Patrol);
    app.update();
    app.update();

    app.world_mut().get_mut::<PlayerStatus>(player).unwrap().dying = Some(5.0);
    app.world_mut().send_event(BackstabRequested { player });
    app.update();

    assert!(app.world().get_entity(guard).is_ok());
    assert!(collect::<GuardEliminated>(&app).is_empty());
}
