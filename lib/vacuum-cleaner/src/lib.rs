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

// PEAS - Performance, Environment, Action, Sensing
//
// See:
// -  Chapter 2: Intelligent Agents, page 40

use num_traits::Zero;
use tracing::debug;

pub mod agents;
pub mod error;
pub mod experiment;
pub mod report;
pub mod robot;
pub mod statistics;
pub mod vacuum_world;

pub use error::{Result, VacuumError};

pub type Rng = rand_pcg::Pcg64;

/// An Agent acts in a Performance, Environment, Action, Sensing (PEAS) cycle.
/// For a given Perception, the Agent will return an Action.
///
/// Agents that keep statistics about previous Perceptions (e.g. how often a square was found
/// dirty) store them on themselves. Such state lives for one Simulation only.
///
/// Notice that the Agent is not aware of an Environment, it's only interface
/// is the Perception coming in then the Action going out. Agents that choose randomly draw from
/// the Simulation's rng so that a seeded run is reproducible.
pub trait Agent {
    type Action;
    type Percept;

    fn act(&mut self, percept: &Self::Percept, rng: &mut Rng) -> Result<Self::Action>;
}

/// An Environment runs a single Agent in a Performance, Environment, Action, Sensing (PEAS) cycle.
///
/// Notice that the Environment is not aware of an Agent.
pub trait Environment {
    type Action: std::fmt::Debug;
    type Percept;
    type Score: num_traits::NumAssign + Copy + std::fmt::Debug;

    fn percept(&self) -> Self::Percept;
    fn execute_action(&mut self, action: &Self::Action) -> Result<()>;

    /// Returns the score of the Environment. This is not cumulative or stateful. This is the score
    /// of the Environment at the current state.
    fn score(&self) -> Self::Score;

    /// Returns the cost the agent has paid so far to act in the Environment, e.g. the number of
    /// moves. Unlike `score` this is cumulative.
    fn cost(&self) -> Self::Score;

    /// Lets the Environment change by itself, once per time step, after the agent's action.
    fn advance_time(&mut self, rng: &mut Rng);
}

/// Final accumulated performance of one Simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrialResult<Score> {
    pub total_reward: Score,
    pub total_movement: Score,
}

impl<Score: num_traits::NumAssign + Copy> TrialResult<Score> {
    /// Reward after paying for movement.
    pub fn net_reward(&self) -> Score {
        self.total_reward - self.total_movement
    }
}

/// A Simulation runs a single Agent in multiple Performance, Environment, Action, Sensing (PEAS)
/// cycles. The Agent's score (Performance) is continually kept up to date.
///
/// The Simulation is aware of both the Environment and the single Agent. Notice that the Agent's
/// generic Action and Percept come from the Environment. The Agent still does not need to know that
/// the Environment exists, but the Agent definitely needs the Environment's Action and Percept
/// types.
pub struct Simulation<_Environment, _Agent>
where
    _Environment: Environment,
    _Agent: Agent<Action = _Environment::Action, Percept = _Environment::Percept>,
{
    environment: _Environment,
    agent: _Agent,
    time_steps: usize,
    score: _Environment::Score,
    verbose: bool,
}

impl<_Environment, _Agent> Simulation<_Environment, _Agent>
where
    _Environment: Environment,
    _Agent: Agent<Action = _Environment::Action, Percept = _Environment::Percept>,
{
    pub fn new(environment: _Environment, agent: _Agent, time_steps: usize) -> Self {
        Self {
            environment,
            agent,
            time_steps,
            score: _Environment::Score::zero(),
            verbose: false,
        }
    }

    /// Emit a debug event for every time step.
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Each time step the agent acts, the score is taken right after the action, and only then
    /// does the environment change by itself. The agent is credited for the squares it just
    /// cleaned before new dirt shows up.
    pub fn run(&mut self, rng: &mut Rng) -> Result<TrialResult<_Environment::Score>> {
        for step in 0..self.time_steps {
            let percept = self.environment.percept();
            let action = self.agent.act(&percept, rng)?;
            self.environment.execute_action(&action)?;
            let step_score = self.environment.score();
            self.score += step_score;
            self.environment.advance_time(rng);

            if self.verbose {
                debug!(
                    step,
                    ?action,
                    ?step_score,
                    total_score = ?self.score,
                    total_cost = ?self.environment.cost(),
                    "time step"
                );
            }
        }
        Ok(self.result())
    }

    pub fn score(&self) -> <_Environment as Environment>::Score {
        self.score
    }

    pub fn result(&self) -> TrialResult<_Environment::Score> {
        TrialResult {
            total_reward: self.score,
            total_movement: self.environment.cost(),
        }
    }

    pub fn environment(&self) -> &_Environment {
        &self.environment
    }

    pub fn agent(&self) -> &_Agent {
        &self.agent
    }
}
