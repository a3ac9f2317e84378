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

use std::str::FromStr;

use rand::Rng as _;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::robot::{can_move_left, can_move_right, is_legal};
use crate::vacuum_world::{VacuumWorldAction, VacuumWorldLocalPercept};
use crate::{Agent, Result, Rng, VacuumError};

/// How many random actions RandomVacuumAgent draws before giving up. NoOp is always legal, so
/// running out means a one in (3/2)^1000 streak of bad luck.
pub const MAX_RESAMPLES: usize = 1000;

const CANDIDATE_MOVES: [VacuumWorldAction; 3] = [
    VacuumWorldAction::Left,
    VacuumWorldAction::Right,
    VacuumWorldAction::NoOp,
];

/// Sucks when the square is dirty, otherwise picks uniformly at random among the legal moves.
#[derive(Debug, Clone, Default)]
pub struct RandomVacuumAgent {}

impl RandomVacuumAgent {
    pub fn new() -> Self {
        Self {}
    }
}

impl Agent for RandomVacuumAgent {
    type Action = VacuumWorldAction;
    type Percept = VacuumWorldLocalPercept;

    fn act(&mut self, percept: &Self::Percept, rng: &mut Rng) -> Result<Self::Action> {
        if percept.is_dirty() {
            return Ok(VacuumWorldAction::Suck);
        }
        for _ in 0..MAX_RESAMPLES {
            let action = CANDIDATE_MOVES[rng.gen_range(0..CANDIDATE_MOVES.len())];
            if is_legal(action, percept) {
                return Ok(action);
            }
        }
        Err(VacuumError::NoLegalAction {
            attempts: MAX_RESAMPLES,
        })
    }
}

/// How often a room was found dirty when the agent stood in it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ObservationStats {
    dirty_observations: u64,
    total_observations: u64,
}

impl ObservationStats {
    pub fn record(&mut self, dirty: bool) {
        if dirty {
            self.dirty_observations += 1;
        }
        self.total_observations += 1;
    }

    /// A room that was never visited is assumed dirty: every room starts out dirty.
    pub fn dirty_frequency(&self) -> f64 {
        if self.total_observations == 0 {
            return 1.0;
        }
        self.dirty_observations as f64 / self.total_observations as f64
    }

    pub fn dirty_observations(&self) -> u64 {
        self.dirty_observations
    }

    pub fn total_observations(&self) -> u64 {
        self.total_observations
    }
}

/// Sucks when the square is dirty, otherwise heads for the neighbour that has most often been
/// found dirty.
///
/// A neighbour the agent may not move to counts as never dirty. When both sides score the same,
/// including when both are walls, the agent goes LEFT. It does so even if LEFT is not a legal
/// move, so in a world of two rooms it can step from room 1 into room 0.
#[derive(Debug, Clone)]
pub struct FrequencyVacuumAgent {
    observations: Vec<ObservationStats>,
    verbose: bool,
}

impl FrequencyVacuumAgent {
    pub fn new(room_count: usize) -> Self {
        Self {
            observations: vec![ObservationStats::default(); room_count],
            verbose: false,
        }
    }

    /// Log every decision with the neighbour frequencies at debug level.
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn verbose(&self) -> bool {
        self.verbose
    }

    pub fn observations(&self) -> &[ObservationStats] {
        &self.observations
    }

    pub fn dirty_frequency(&self, room: usize) -> Result<f64> {
        self.observations
            .get(room)
            .map(ObservationStats::dirty_frequency)
            .ok_or(VacuumError::RoomOutOfRange {
                index: room,
                room_count: self.observations.len(),
            })
    }
}

impl Agent for FrequencyVacuumAgent {
    type Action = VacuumWorldAction;
    type Percept = VacuumWorldLocalPercept;

    fn act(&mut self, percept: &Self::Percept, _rng: &mut Rng) -> Result<Self::Action> {
        let location = percept.location;
        let room_count = self.observations.len();
        self.observations
            .get_mut(location)
            .ok_or(VacuumError::RoomOutOfRange {
                index: location,
                room_count,
            })?
            .record(percept.is_dirty());

        if percept.is_dirty() {
            return Ok(VacuumWorldAction::Suck);
        }

        let left = if can_move_left(location) {
            self.dirty_frequency(location - 1)?
        } else {
            0.0
        };
        let right = if can_move_right(location, percept.room_count) {
            self.dirty_frequency(location + 1)?
        } else {
            0.0
        };
        let current = self.dirty_frequency(location)?;

        let action = if right > left {
            VacuumWorldAction::Right
        } else {
            VacuumWorldAction::Left
        };
        if self.verbose {
            debug!(location, left, current, right, ?action, "frequency decision");
        }
        Ok(action)
    }
}

/// Which decision policy drives the robot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentKind {
    Random,
    Frequency,
}

impl AgentKind {
    pub fn name(&self) -> &'static str {
        match self {
            AgentKind::Random => "random",
            AgentKind::Frequency => "frequency",
        }
    }

    /// A fresh agent with no memory of earlier trials.
    pub fn build(&self, room_count: usize) -> VacuumAgent {
        match self {
            AgentKind::Random => VacuumAgent::Random(RandomVacuumAgent::new()),
            AgentKind::Frequency => VacuumAgent::Frequency(FrequencyVacuumAgent::new(room_count)),
        }
    }
}

impl std::fmt::Display for AgentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for AgentKind {
    type Err = VacuumError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "random" | "baseline" => Ok(AgentKind::Random),
            "frequency" | "heuristic" => Ok(AgentKind::Frequency),
            _ => Err(VacuumError::UnknownAgent(s.to_string())),
        }
    }
}

/// Either policy, chosen at runtime.
#[derive(Debug, Clone)]
pub enum VacuumAgent {
    Random(RandomVacuumAgent),
    Frequency(FrequencyVacuumAgent),
}

impl VacuumAgent {
    /// The random policy has no decision worth logging.
    pub fn with_verbose(self, verbose: bool) -> Self {
        match self {
            VacuumAgent::Frequency(agent) => VacuumAgent::Frequency(agent.with_verbose(verbose)),
            random => random,
        }
    }

    pub fn verbose(&self) -> bool {
        match self {
            VacuumAgent::Random(_) => false,
            VacuumAgent::Frequency(agent) => agent.verbose(),
        }
    }
}

impl Agent for VacuumAgent {
    type Action = VacuumWorldAction;
    type Percept = VacuumWorldLocalPercept;

    fn act(&mut self, percept: &Self::Percept, rng: &mut Rng) -> Result<Self::Action> {
        match self {
            VacuumAgent::Random(agent) => agent.act(percept, rng),
            VacuumAgent::Frequency(agent) => agent.act(percept, rng),
        }
    }
}
