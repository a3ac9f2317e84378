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

use crate::vacuum_world::VacuumWorldAction;

/// Vacuum world error.
#[derive(Debug, thiserror::Error)]
pub enum VacuumError {
    /// Room index is outside of the row of rooms.
    #[error("room {index} is out of range for a world with {room_count} rooms")]
    RoomOutOfRange { index: usize, room_count: usize },

    /// Movement would take the agent outside of the row of rooms.
    #[error("cannot perform {action:?} from room {position}")]
    MoveOutOfBounds {
        position: usize,
        action: VacuumWorldAction,
    },

    /// Resampling a random action never produced a legal one.
    #[error("no legal action found after {attempts} attempts")]
    NoLegalAction { attempts: usize },

    /// A world needs at least one room.
    #[error("configuration has no rooms")]
    EmptyConfiguration,

    /// Dirt probabilities must be within [0, 1].
    #[error("dirt probability for room {room} must be within [0, 1], got {value}")]
    InvalidProbability { room: usize, value: f64 },

    /// A dirt probability is not a number.
    #[error("invalid dirt probability {text:?}")]
    UnparsableProbability {
        text: String,
        #[source]
        source: std::num::ParseFloatError,
    },

    /// Not enough samples for the requested statistic.
    #[error("need at least {needed} samples, got {got}")]
    InsufficientSamples { needed: usize, got: usize },

    /// Standard deviation needs at least two trials per configuration.
    #[error("need at least 2 trials per configuration, got {0}")]
    InsufficientTrials(usize),

    #[error("a trial needs at least one time step")]
    NoTimeSteps,

    #[error("experiment has no configurations")]
    NoConfigurations,

    #[error("unknown agent: {0}")]
    UnknownAgent(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, VacuumError>;
