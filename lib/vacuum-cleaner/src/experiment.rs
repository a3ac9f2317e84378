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

// Chapter 2 Intelligent Agents, Exercise 12:
//
// Run the environment with the agent for several dirt configurations. Record the performance
// score for each configuration and the overall average score.

use rand::{Rng as _, SeedableRng};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::agents::{AgentKind, VacuumAgent};
use crate::statistics::{mean, sample_std_dev};
use crate::vacuum_world::{DirtConfiguration, VacuumWorld, VacuumWorldEnvironment};
use crate::{Result, Rng, Simulation, TrialResult, VacuumError};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperimentConfig {
    pub trials_per_configuration: usize,
    pub steps_per_trial: usize,
    pub agent: AgentKind,
    /// Base seed for every trial. Drawn at random when missing and recorded in the report.
    pub seed: Option<u64>,
    /// Log every time step of every trial at debug level.
    pub verbose: bool,
}

impl ExperimentConfig {
    pub fn validate(&self) -> Result<()> {
        if self.trials_per_configuration < 2 {
            return Err(VacuumError::InsufficientTrials(
                self.trials_per_configuration,
            ));
        }
        if self.steps_per_trial == 0 {
            return Err(VacuumError::NoTimeSteps);
        }
        Ok(())
    }
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        Self {
            trials_per_configuration: 10,
            steps_per_trial: 1000,
            agent: AgentKind::Frequency,
            seed: None,
            verbose: false,
        }
    }
}

/// The five dirt configurations of three rooms that are evaluated by default.
pub fn default_configurations() -> Result<Vec<DirtConfiguration>> {
    [
        [0.3, 0.3, 0.3],
        [0.5, 0.2, 0.1],
        [0.2, 0.4, 0.2],
        [0.5, 0.1, 0.3],
        [0.5, 0.3, 0.8],
    ]
    .into_iter()
    .enumerate()
    .map(|(index, probabilities)| DirtConfiguration::numbered(index, probabilities.to_vec()))
    .collect()
}

/// Seed of one trial. Distinct for every (configuration, trial) pair below 2^32 trials.
pub fn trial_seed(base_seed: u64, configuration_index: usize, trial_index: usize) -> u64 {
    base_seed.wrapping_add(((configuration_index as u64) << 32) | trial_index as u64)
}

/// A fresh world with a fresh agent, both logging at debug level when `verbose` is set.
pub fn build_simulation(
    configuration: &DirtConfiguration,
    agent: AgentKind,
    time_steps: usize,
    verbose: bool,
) -> Simulation<VacuumWorldEnvironment, VacuumAgent> {
    let environment =
        VacuumWorldEnvironment::new(VacuumWorld::new(configuration)).with_verbose(verbose);
    let agent = agent.build(configuration.room_count()).with_verbose(verbose);
    Simulation::new(environment, agent, time_steps).with_verbose(verbose)
}

/// Runs one trial in a fresh world with a fresh agent.
pub fn run_trial(
    configuration: &DirtConfiguration,
    agent: AgentKind,
    time_steps: usize,
    rng: &mut Rng,
    verbose: bool,
) -> Result<TrialResult<i64>> {
    build_simulation(configuration, agent, time_steps, verbose).run(rng)
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MetricSummary {
    pub mean: f64,
    pub std_dev: f64,
}

impl MetricSummary {
    pub fn from_samples(samples: &[f64]) -> Result<Self> {
        Ok(Self {
            mean: mean(samples)?,
            std_dev: sample_std_dev(samples)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConfigurationSummary {
    pub configuration: DirtConfiguration,
    /// Total reward, the sum of clean rooms over all time steps.
    pub raw_reward: MetricSummary,
    /// Total reward minus the number of moves.
    pub net_reward: MetricSummary,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExperimentReport {
    pub agent: AgentKind,
    pub base_seed: u64,
    pub trials_per_configuration: usize,
    pub steps_per_trial: usize,
    pub summaries: Vec<ConfigurationSummary>,
    /// Mean of the per-configuration raw reward means. Not pooled over trials.
    pub overall_raw_reward_mean: f64,
    /// Mean of the per-configuration net reward means. Not pooled over trials.
    pub overall_net_reward_mean: f64,
}

pub struct Experiment {
    config: ExperimentConfig,
}

impl Experiment {
    pub fn new(config: ExperimentConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &ExperimentConfig {
        &self.config
    }

    pub fn run(&self, configurations: &[DirtConfiguration]) -> Result<ExperimentReport> {
        if configurations.is_empty() {
            return Err(VacuumError::NoConfigurations);
        }
        let base_seed = self
            .config
            .seed
            .unwrap_or_else(|| rand::thread_rng().gen());
        info!(
            agent = %self.config.agent,
            base_seed,
            configurations = configurations.len(),
            trials = self.config.trials_per_configuration,
            steps = self.config.steps_per_trial,
            "starting experiment"
        );

        let summaries = configurations
            .iter()
            .enumerate()
            .map(|(index, configuration)| self.summarize(index, configuration, base_seed))
            .collect::<Result<Vec<_>>>()?;

        let raw_means: Vec<f64> = summaries.iter().map(|s| s.raw_reward.mean).collect();
        let net_means: Vec<f64> = summaries.iter().map(|s| s.net_reward.mean).collect();
        let report = ExperimentReport {
            agent: self.config.agent,
            base_seed,
            trials_per_configuration: self.config.trials_per_configuration,
            steps_per_trial: self.config.steps_per_trial,
            overall_raw_reward_mean: mean(&raw_means)?,
            overall_net_reward_mean: mean(&net_means)?,
            summaries,
        };
        info!(
            overall_raw_reward_mean = report.overall_raw_reward_mean,
            overall_net_reward_mean = report.overall_net_reward_mean,
            "experiment finished"
        );
        Ok(report)
    }

    /// Trials run in parallel, each with its own rng, and are collected in trial order.
    fn summarize(
        &self,
        index: usize,
        configuration: &DirtConfiguration,
        base_seed: u64,
    ) -> Result<ConfigurationSummary> {
        let results = (0..self.config.trials_per_configuration)
            .into_par_iter()
            .map(|trial| -> Result<TrialResult<i64>> {
                let mut rng = Rng::seed_from_u64(trial_seed(base_seed, index, trial));
                let result = run_trial(
                    configuration,
                    self.config.agent,
                    self.config.steps_per_trial,
                    &mut rng,
                    self.config.verbose,
                )?;
                debug!(
                    configuration = configuration.label(),
                    trial,
                    total_reward = result.total_reward,
                    total_movement = result.total_movement,
                    "trial finished"
                );
                Ok(result)
            })
            .collect::<Result<Vec<_>>>()?;

        let raw: Vec<f64> = results.iter().map(|r| r.total_reward as f64).collect();
        let net: Vec<f64> = results.iter().map(|r| r.net_reward() as f64).collect();
        let summary = ConfigurationSummary {
            configuration: configuration.clone(),
            raw_reward: MetricSummary::from_samples(&raw)?,
            net_reward: MetricSummary::from_samples(&net)?,
        };
        info!(
            configuration = configuration.label(),
            raw_mean = summary.raw_reward.mean,
            raw_std_dev = summary.raw_reward.std_dev,
            net_mean = summary.net_reward.mean,
            net_std_dev = summary.net_reward.std_dev,
            "configuration finished"
        );
        Ok(summary)
    }
}
