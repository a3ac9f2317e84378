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

//! The robot's body and the rules for which actions are legal. Shared by every agent policy.

use crate::vacuum_world::{VacuumWorld, VacuumWorldAction, VacuumWorldLocalPercept};
use crate::{Result, VacuumError};

/// LEFT is only legal when it lands on a room index greater than zero. Room 0 acts as a wall:
/// from room 1 a LEFT is illegal even though room 0 exists.
pub fn can_move_left(position: usize) -> bool {
    position > 1
}

pub fn can_move_right(position: usize, room_count: usize) -> bool {
    position + 1 < room_count
}

pub fn is_legal(action: VacuumWorldAction, percept: &VacuumWorldLocalPercept) -> bool {
    match action {
        VacuumWorldAction::Left => can_move_left(percept.location),
        VacuumWorldAction::Right => can_move_right(percept.location, percept.room_count),
        VacuumWorldAction::Suck => percept.is_dirty(),
        VacuumWorldAction::NoOp => true,
    }
}

/// Where the robot is and how far it has travelled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Robot {
    position: usize,
    total_movement: u64,
}

impl Robot {
    pub fn new(position: usize) -> Self {
        Self {
            position,
            total_movement: 0,
        }
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn total_movement(&self) -> u64 {
        self.total_movement
    }

    /// Carries out an action in the world. Legality is the agent's business; here only the
    /// physical walls of the world are enforced, and a move through them is an error rather than
    /// being clamped.
    pub fn perform(&mut self, action: VacuumWorldAction, world: &mut VacuumWorld) -> Result<()> {
        let out_of_bounds = VacuumError::MoveOutOfBounds {
            position: self.position,
            action,
        };
        match action {
            VacuumWorldAction::Left => {
                self.position = self.position.checked_sub(1).ok_or(out_of_bounds)?;
                self.total_movement += 1;
            }
            VacuumWorldAction::Right => {
                if self.position + 1 >= world.room_count() {
                    return Err(out_of_bounds);
                }
                self.position += 1;
                self.total_movement += 1;
            }
            VacuumWorldAction::Suck => {
                world.clean_room(self.position)?;
            }
            VacuumWorldAction::NoOp => {}
        }
        Ok(())
    }
}
