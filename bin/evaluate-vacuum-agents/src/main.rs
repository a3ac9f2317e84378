/*
 * Copyright (C) 2023 Asim Ihsan
 * SPDX-License-Identifier: AGPL-3.0-only
 *
 * This program is free software: you can redistribute it and/or modify it under
 * the terms of the GNU Affero General Public License as published by the Free
 * Software Foundation, version 3.
 *
 * This program is distributed in the hope that it will be useful, but WITHOUT ANY
 * WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR A
 * PARTICULAR PURPOSE. See the GNU Affero General Public License for more details.
 *
 * You should have received a copy of the GNU Affero General Public License along
 * with this program. If not, see <https://www.gnu.org/licenses/>
 */

#![warn(missing_docs)]

//! Evaluate a vacuum agent over several dirt configurations and write a report.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use serde::de::DeserializeOwned;
use tracing::info;
use tracing_subscriber::EnvFilter;

use vacuum_cleaner::agents::AgentKind;
use vacuum_cleaner::experiment::{default_configurations, Experiment, ExperimentConfig};
use vacuum_cleaner::report::{CsvReporter, JsonReporter, Reporter};
use vacuum_cleaner::vacuum_world::DirtConfiguration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ReportFormat {
    Csv,
    Json,
}

#[derive(Parser)]
#[command(name = "evaluate-vacuum-agents")]
#[command(about = "Evaluate a vacuum agent in worlds where clean rooms get dirty again")]
struct Cli {
    /// Agent: random or frequency [default: frequency]
    #[arg(short, long)]
    agent: Option<AgentKind>,

    /// Number of trials per configuration, at least 2 [default: 10]
    #[arg(short, long)]
    trials: Option<usize>,

    /// Time steps per trial [default: 1000]
    #[arg(short, long)]
    steps: Option<usize>,

    /// JSON file with experiment settings, e.g. {"agent": "random", "seed": 7}. Missing fields
    /// take their defaults and command line flags win over the file.
    #[arg(long)]
    experiment_file: Option<PathBuf>,

    /// Base random seed. Drawn at random when missing.
    #[arg(long)]
    seed: Option<u64>,

    /// Dirt probabilities of one configuration, comma-separated, e.g. "0.3,0.3,0.3". Repeatable.
    #[arg(short, long = "config")]
    configs: Vec<String>,

    /// JSON file with a list of configurations, e.g. [[0.3, 0.3, 0.3], [0.5, 0.2, 0.1]]
    #[arg(long, conflicts_with = "configs")]
    configurations_file: Option<PathBuf>,

    /// Report format
    #[arg(short, long, value_enum, default_value = "csv")]
    format: ReportFormat,

    /// Report output file
    #[arg(short, long, default_value = "report.csv")]
    output: PathBuf,

    /// Log every time step
    #[arg(long, short)]
    verbose: bool,
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let file = File::open(path).with_context(|| format!("cannot open {}", path.display()))?;
    serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("cannot parse {}", path.display()))
}

fn experiment_config(cli: &Cli) -> Result<ExperimentConfig> {
    let mut config: ExperimentConfig = match &cli.experiment_file {
        Some(path) => read_json(path)?,
        None => ExperimentConfig::default(),
    };
    if let Some(agent) = cli.agent {
        config.agent = agent;
    }
    if let Some(trials) = cli.trials {
        config.trials_per_configuration = trials;
    }
    if let Some(steps) = cli.steps {
        config.steps_per_trial = steps;
    }
    if cli.seed.is_some() {
        config.seed = cli.seed;
    }
    config.verbose |= cli.verbose;
    Ok(config)
}

fn load_configurations(cli: &Cli) -> Result<Vec<DirtConfiguration>> {
    if let Some(path) = &cli.configurations_file {
        let probabilities: Vec<Vec<f64>> = read_json(path)?;
        return probabilities
            .into_iter()
            .enumerate()
            .map(|(index, p)| -> Result<DirtConfiguration> {
                Ok(DirtConfiguration::numbered(index, p)?)
            })
            .collect();
    }
    if !cli.configs.is_empty() {
        return cli
            .configs
            .iter()
            .enumerate()
            .map(|(index, c)| -> Result<DirtConfiguration> {
                DirtConfiguration::parse(index, c)
                    .with_context(|| format!("invalid configuration {:?}", c))
            })
            .collect();
    }
    Ok(default_configurations()?)
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let configurations = load_configurations(&cli)?;
    let experiment = Experiment::new(experiment_config(&cli)?)?;
    let report = experiment.run(&configurations)?;

    let file = File::create(&cli.output)
        .with_context(|| format!("cannot create {}", cli.output.display()))?;
    let writer = BufWriter::new(file);
    match cli.format {
        ReportFormat::Csv => CsvReporter::new(writer).write_report(&report)?,
        ReportFormat::Json => JsonReporter::new(writer).write_report(&report)?,
    }
    info!(output = %cli.output.display(), "report written");

    println!("agent: {}", report.agent);
    println!("seed: {}", report.base_seed);
    for summary in &report.summaries {
        println!(
            "{} {:?}: reward {:.1} ± {:.1}, net reward {:.1} ± {:.1}",
            summary.configuration.label(),
            summary.configuration.dirt_probabilities(),
            summary.raw_reward.mean,
            summary.raw_reward.std_dev,
            summary.net_reward.mean,
            summary.net_reward.std_dev,
        );
    }
    println!(
        "overall mean: reward {:.1}, net reward {:.1}",
        report.overall_raw_reward_mean, report.overall_net_reward_mean
    );
    Ok(())
}
