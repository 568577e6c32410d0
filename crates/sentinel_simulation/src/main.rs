//! Headless симуляция SENTINEL
//!
//! Загружает RON сценарий и гоняет fixed тики без рендера.

use std::path::PathBuf;
use std::process::ExitCode;

use bevy::prelude::*;
use clap::{Parser, ValueEnum};
use sentinel_simulation::{
    create_stepped_app, init_logger, load_scenario, load_scenario_file, log_error, log_info,
    set_log_level, BehaviorState, Guard, LogLevel, Scenario, ScenarioError,
};

const BUNDLED_SCENARIO: &str = include_str!("../demos/watchtower.ron");

/// Headless guard simulation
#[derive(Parser, Debug)]
#[command(name = "sentinel_simulation")]
#[command(about = "Runs a guard scenario headless at a fixed 60 Hz tick", long_about = None)]
#[command(version)]
struct Cli {
    /// RON сценарий (по умолчанию встроенный demos/watchtower.ron)
    #[arg(short, long)]
    scenario: Option<PathBuf>,

    /// Сколько fixed тиков прогнать
    #[arg(short, long, default_value_t = 900)]
    ticks: u32,

    /// Как часто печатать состояние guard'ов (в тиках)
    #[arg(long, default_value_t = 60)]
    report_every: u32,

    #[arg(long, value_enum, default_value_t = LevelArg::Debug)]
    log_level: LevelArg,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum LevelArg {
    Debug,
    Info,
    Warning,
    Error,
}

impl From<LevelArg> for LogLevel {
    fn from(level: LevelArg) -> Self {
        match level {
            LevelArg::Debug => LogLevel::Debug,
            LevelArg::Info => LogLevel::Info,
            LevelArg::Warning => LogLevel::Warning,
            LevelArg::Error => LogLevel::Error,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logger();
    set_log_level(cli.log_level.into());

    let scenario = match load(&cli) {
        Ok(scenario) => scenario,
        Err(error) => {
            log_error(&format!("Scenario rejected: {}", error));
            return ExitCode::FAILURE;
        }
    };

    let mut app = create_stepped_app();
    if let Err(error) = scenario.spawn(app.world_mut()) {
        log_error(&format!("Scenario spawn failed: {}", error));
        return ExitCode::FAILURE;
    }

    log_info(&format!("Starting SENTINEL headless simulation ({} ticks)", cli.ticks));

    // Первый update только заводит часы
    app.update();

    let report_every = cli.report_every.max(1);
    for tick in 1..=cli.ticks {
        app.update();

        if tick % report_every == 0 {
            report(app.world_mut(), tick);
        }
    }

    log_info("Simulation complete!");
    ExitCode::SUCCESS
}

fn load(cli: &Cli) -> Result<Scenario, ScenarioError> {
    match &cli.scenario {
        Some(path) => load_scenario_file(path),
        None => load_scenario(BUNDLED_SCENARIO),
    }
}

fn report(world: &mut World, tick: u32) {
    let mut query = world.query_filtered::<(Entity, &Transform, &BehaviorState), With<Guard>>();
    let mut guards: Vec<_> = query
        .iter(world)
        .map(|(entity, transform, state)| (entity, transform.translation.x, *state))
        .collect();
    guards.sort_by_key(|(entity, ..)| entity.index());

    let summary: Vec<String> = guards
        .iter()
        .map(|(entity, x, state)| format!("{:?}@{:.2} {}", entity, x, state.label()))
        .collect();

    log_info(&format!("Tick {}: {}", tick, summary.join(", ")));
}
