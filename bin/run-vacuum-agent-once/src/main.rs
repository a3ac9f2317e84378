/*
 * Copyright 2023 Asim Ihsan
 * SPDX-License-Identifier: Apache-2.0
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 * You may obtain a copy of the License at
 *
 *     http://www.apache.org/licenses/LICENSE-2.0
 *
 * Unless required by applicable law or agreed to in writing, software
 * distributed under the License is distributed on an "AS IS" BASIS,
 * WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 * See the License for the specific language governing permissions and
 * limitations under the License.
 */

use anyhow::{Context, Result};
use clap::Parser;
use rand::{Rng as _, SeedableRng};
use tracing::info;
use tracing_subscriber::EnvFilter;

use vacuum_cleaner::agents::AgentKind;
use vacuum_cleaner::experiment::run_trial;
use vacuum_cleaner::vacuum_world::DirtConfiguration;

// Chapter 2 Intelligent Agents Exercise 11:
//
// Implement a performance-measuring environment simulator for the vacuum-cleaner world. Your
// implementation should be modular so that the sensors, actuators, and environment
// characteristics (size, shape, dirt placement, etc.) can be changed easily.
#[derive(Parser)]
#[command(name = "run-vacuum-agent-once")]
#[command(about = "Run a vacuum agent for a single trial")]
struct Cli {
    /// Agent: random or frequency
    #[arg(short, long, default_value = "frequency")]
    agent: AgentKind,

    /// Dirt probabilities, comma-separated. One room per probability.
    #[arg(short, long, default_value = "0.3,0.3,0.3")]
    config: String,

    /// Time steps
    #[arg(short, long, default_value = "1000")]
    steps: usize,

    /// Random seed. Drawn at random when missing.
    #[arg(long)]
    seed: Option<u64>,

    /// Log every time step
    #[arg(long, short)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let configuration = DirtConfiguration::parse(0, &cli.config)
        .with_context(|| format!("invalid configuration {:?}", cli.config))?;

    let seed = cli.seed.unwrap_or_else(|| rand::thread_rng().gen());
    info!(agent = %cli.agent, seed, steps = cli.steps, "running trial");
    let mut rng = rand_pcg::Pcg64::seed_from_u64(seed);
    let result = run_trial(&configuration, cli.agent, cli.steps, &mut rng, cli.verbose)?;

    println!("score: {}", result.total_reward);
    println!("movement: {}", result.total_movement);
    println!("net score: {}", result.net_reward());
    Ok(())
}
