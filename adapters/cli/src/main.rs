#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs a headless Wizard Duel sparring match.

mod logging;
mod sparring;

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use wizard_duel_core::{Command, Event, SimulationConfig};
use wizard_duel_system_bootstrap::Bootstrap;
use wizard_duel_system_scoreboard::Scoreboard;
use wizard_duel_world::{self as world, query, World};

use sparring::{Referee, Sparring};

/// Command-line arguments for the sparring match.
#[derive(Parser, Debug)]
#[command(name = "wizard-duel")]
#[command(about = "Runs a seeded computer-controlled Wizard Duel sparring match")]
struct Cli {
    /// TOML file overriding the default simulation configuration
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of ticks to simulate
    #[arg(long, default_value_t = 3600)]
    ticks: u64,

    /// Seed overriding the configured one
    #[arg(long)]
    seed: Option<u64>,

    /// Number of wizards entering the arena
    #[arg(long, default_value_t = 2)]
    wizards: usize,
}

/// Entry point for the Wizard Duel command-line interface.
fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_logging()?;

    let mut config = load_config(cli.config.as_deref())?;
    if let Some(seed) = cli.seed {
        config.seed = seed;
    }
    config
        .validate()
        .context("invalid simulation configuration")?;

    let (world, scoreboard) = run_match(config, cli.wizards, cli.ticks);
    println!("{}", Bootstrap::default().welcome_banner(&world));
    println!("after {} ticks:", query::tick_index(&world));
    for (rank, (wizard, tally)) in scoreboard.standings().into_iter().enumerate() {
        println!(
            "{:>2}. wizard {:<3} kills {:>3}  deaths {:>3}",
            rank + 1,
            wizard.get(),
            tally.kills,
            tally.deaths
        );
    }
    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<SimulationConfig> {
    let Some(path) = path else {
        return Ok(SimulationConfig::default());
    };
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {}", path.display()))?;
    toml::from_str(&text).with_context(|| format!("failed to parse config file {}", path.display()))
}

fn run_match(config: SimulationConfig, wizards: usize, ticks: u64) -> (World, Scoreboard) {
    let bounds = config.arena.bounds;
    let mut sparring = Sparring::new(config.seed);
    let mut world = World::with_config(config);
    let bootstrap = Bootstrap::default();
    let mut referee = Referee::default();
    let mut scoreboard = Scoreboard::new();

    let mut commands = Vec::new();
    bootstrap.arena_commands(bounds, &mut commands);
    bootstrap.spawn_commands(bounds, wizards, &mut commands);
    info!(wizards, ticks, "starting sparring match");

    let mut events = Vec::new();
    let mut verdicts = Vec::new();
    submit(&mut world, &mut commands, &mut referee, &mut verdicts, &mut events);
    scoreboard.handle(&events);

    for _ in 0..ticks {
        events.clear();
        sparring.plan(&world, &mut commands);
        commands.push(Command::Tick);
        submit(&mut world, &mut commands, &mut referee, &mut verdicts, &mut events);
        scoreboard.handle(&events);
    }

    if let Some(leader) = scoreboard.leader() {
        info!(leader = leader.get(), "sparring match finished");
    }
    (world, scoreboard)
}

/// Applies every queued command, letting the referee react to each one.
fn submit(
    world: &mut World,
    commands: &mut Vec<Command>,
    referee: &mut Referee,
    verdicts: &mut Vec<Command>,
    events: &mut Vec<Event>,
) {
    for command in commands.drain(..) {
        let start = events.len();
        world::apply(world, command, events);
        referee.judge(world, &events[start..], verdicts);
        for verdict in verdicts.drain(..) {
            world::apply(world, verdict, events);
        }
    }
}
