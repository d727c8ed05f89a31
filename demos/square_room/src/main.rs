//! square_room — smallest example for the rwca collision-avoidance world.
//!
//! Eight agents of two types cross a 20 m × 20 m walled room: four walkers
//! west to east and four children north to south, past a fixed pillar and a
//! sliding crate.  The goal-seeking solver ignores its neighbor lists, so
//! every agent walks a straight line to its goal; plug in an avoiding
//! `VelocitySolver` to steer around the others.  The scenario is embedded;
//! pass a path to run another scenario file instead.
//!
//! ```text
//! RUST_LOG=debug cargo run -p square_room -- my_scenario.json
//! ```

mod scenario;


use std::time::Instant;

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::EnvFilter;

use rwca_core::Tick;
use rwca_neighbor::RTreeSearch;
use rwca_sim::{PreferredVelocitySolver, SimBuilder, SimObserver};
use rwca_world::World;

use scenario::Scenario;

const EMBEDDED_SCENARIO: &str = include_str!("../scenario.json");

// ── Observer ──────────────────────────────────────────────────────────────────

/// Logs progress at every snapshot and tallies agent moves.
#[derive(Default)]
struct ProgressLogger {
    ticks:       u64,
    agent_moves: usize,
}

impl SimObserver for ProgressLogger {
    fn on_tick_end(&mut self, _tick: Tick, moved: usize) {
        self.ticks += 1;
        self.agent_moves += moved;
    }

    fn on_snapshot(&mut self, tick: Tick, world: &World) {
        let total = world.agents().len();
        let arrived = world
            .agents()
            .iter()
            .filter(|(_, a)| a.status.is_finished())
            .count();
        info!(%tick, clock = %world.clock, arrived, total, "snapshot");
    }

    fn on_sim_end(&mut self, final_tick: Tick) {
        info!(%final_tick, ticks = self.ticks, agent_moves = self.agent_moves, "run ended");
    }
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .init();

    // 1. Load the scenario.
    let (source, text) = match std::env::args().nth(1) {
        Some(path) => {
            let text = std::fs::read_to_string(&path)
                .with_context(|| format!("reading scenario {path}"))?;
            (path, text)
        }
        None => ("<embedded>".to_owned(), EMBEDDED_SCENARIO.to_owned()),
    };
    let scenario = Scenario::from_json(&text).with_context(|| format!("parsing scenario {source}"))?;

    // 2. Build the world.
    let world = scenario.build_world().context("building world")?;
    info!(
        %source,
        agents = world.agents().len(),
        walls = world.walls().len(),
        wall_vertices = world.wall_vertices().len(),
        obstacles = world.obstacles().len(),
        agent_types = world.agent_types().len(),
        "world loaded"
    );

    // 3. Build and run the sim.
    let mut sim = SimBuilder::new(world, RTreeSearch::new(), PreferredVelocitySolver)
        .config(scenario.sim)
        .build()?;

    let mut observer = ProgressLogger::default();
    let t0 = Instant::now();
    let summary = sim.run_until_finished(&mut observer)?;
    let elapsed = t0.elapsed();

    println!();
    println!(
        "{} after {} ticks ({}) in {:.3} s",
        if summary.finished { "Finished" } else { "Stopped" },
        summary.ticks,
        sim.world.clock,
        elapsed.as_secs_f64()
    );
    println!();

    // 4. Final agent table.
    println!("{:<8} {:<20} {:<14} {:>8} {:>8} {:>10}", "Agent", "Type", "Status", "x", "y", "to goal");
    println!("{}", "-".repeat(72));
    for (id, agent) in sim.world.agents().iter() {
        let type_name = sim
            .world
            .agent_type(agent.agent_type)
            .map_or("?", |t| t.name.as_str());
        println!(
            "{:<8} {:<20} {:<14} {:>8.2} {:>8.2} {:>10.3}",
            id.0,
            type_name,
            agent.status.as_str(),
            agent.position.x,
            agent.position.y,
            agent.distance_to_goal(),
        );
    }

    Ok(())
}
