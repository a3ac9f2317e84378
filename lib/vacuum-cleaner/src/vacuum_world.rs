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

use rand::Rng as _;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::robot::Robot;
use crate::{Environment, Result, Rng, VacuumError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SquareState {
    Clean,
    Dirty,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VacuumWorldAction {
    Left,
    Right,
    Suck,
    NoOp,
}

/// VacuumWorldLocalPercept is the Percept that the Agent receives from the Environment for just
/// a single square, e.g imagine a dirt sensor looking right down. The agent also knows where it is
/// and how long the row of squares is, which is what it needs to tell legal moves apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VacuumWorldLocalPercept {
    pub location: usize,
    pub room_count: usize,
    pub square_state: SquareState,
}

impl VacuumWorldLocalPercept {
    pub fn is_dirty(&self) -> bool {
        self.square_state == SquareState::Dirty
    }
}

/// The dirt dynamics of one world: for each room, the probability that a clean room gets dirty
/// again during one time step.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DirtConfiguration {
    label: String,
    dirt_probabilities: Vec<f64>,
}

/// Parses comma-separated dirt probabilities, e.g. "0.3, 0.3, 0.3". Range checks happen when the
/// probabilities become a [`DirtConfiguration`].
pub fn parse_probabilities(s: &str) -> Result<Vec<f64>> {
    s.split(',')
        .map(|p| {
            let text = p.trim();
            text.parse::<f64>()
                .map_err(|source| VacuumError::UnparsableProbability {
                    text: text.to_string(),
                    source,
                })
        })
        .collect()
}

impl DirtConfiguration {
    pub fn new(label: impl Into<String>, dirt_probabilities: Vec<f64>) -> Result<Self> {
        if dirt_probabilities.is_empty() {
            return Err(VacuumError::EmptyConfiguration);
        }
        for (room, &value) in dirt_probabilities.iter().enumerate() {
            // NaN fails the range check as well.
            if !(0.0..=1.0).contains(&value) {
                return Err(VacuumError::InvalidProbability { room, value });
            }
        }
        Ok(Self {
            label: label.into(),
            dirt_probabilities,
        })
    }

    /// Configurations are labelled by their 1-based position in a report.
    pub fn numbered(index: usize, dirt_probabilities: Vec<f64>) -> Result<Self> {
        Self::new(format!("Configuration {}", index + 1), dirt_probabilities)
    }

    /// A numbered configuration from comma-separated probabilities.
    pub fn parse(index: usize, s: &str) -> Result<Self> {
        Self::numbered(index, parse_probabilities(s)?)
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn dirt_probabilities(&self) -> &[f64] {
        &self.dirt_probabilities
    }

    pub fn room_count(&self) -> usize {
        self.dirt_probabilities.len()
    }
}

/// Rooms are named A, B, C, ... and R26, R27, ... once the alphabet runs out.
pub fn room_label(index: usize) -> String {
    if index < 26 {
        char::from(b'A' + index as u8).to_string()
    } else {
        format!("R{}", index)
    }
}

/// A row of rooms. Every room starts dirty.
#[derive(Debug, Clone, PartialEq)]
pub struct VacuumWorld {
    rooms: Vec<String>,
    dirt_probabilities: Vec<f64>,
    squares: Vec<SquareState>,
}

impl VacuumWorld {
    pub fn new(configuration: &DirtConfiguration) -> Self {
        let room_count = configuration.room_count();
        Self {
            rooms: (0..room_count).map(room_label).collect(),
            dirt_probabilities: configuration.dirt_probabilities().to_vec(),
            squares: vec![SquareState::Dirty; room_count],
        }
    }

    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }

    pub fn rooms(&self) -> &[String] {
        &self.rooms
    }

    pub fn squares(&self) -> &[SquareState] {
        &self.squares
    }

    pub fn square_state(&self, position: usize) -> Result<SquareState> {
        self.squares
            .get(position)
            .copied()
            .ok_or(VacuumError::RoomOutOfRange {
                index: position,
                room_count: self.room_count(),
            })
    }

    pub fn is_clean(&self, position: usize) -> Result<bool> {
        Ok(self.square_state(position)? == SquareState::Clean)
    }

    pub fn clean_room(&mut self, position: usize) -> Result<()> {
        let room_count = self.room_count();
        let square = self
            .squares
            .get_mut(position)
            .ok_or(VacuumError::RoomOutOfRange {
                index: position,
                room_count,
            })?;
        *square = SquareState::Clean;
        Ok(())
    }

    pub fn count_clean_rooms(&self) -> usize {
        self.squares
            .iter()
            .filter(|&s| *s == SquareState::Clean)
            .count()
    }

    /// Each clean room independently gets dirty again with its own probability. Dirty rooms stay
    /// dirty, dirt does not pile up. Returns how many rooms got dirty.
    pub fn advance_time(&mut self, rng: &mut Rng) -> usize {
        let mut newly_dirty = 0;
        for (square, &probability) in self.squares.iter_mut().zip(&self.dirt_probabilities) {
            if *square == SquareState::Clean && rng.gen::<f64>() < probability {
                *square = SquareState::Dirty;
                newly_dirty += 1;
            }
        }
        newly_dirty
    }
}

/// The vacuum world together with the robot's body moving through it.
pub struct VacuumWorldEnvironment {
    world: VacuumWorld,
    robot: Robot,
    verbose: bool,
}

impl VacuumWorldEnvironment {
    /// The robot starts in the middle room.
    pub fn new(world: VacuumWorld) -> Self {
        let start = world.room_count() / 2;
        Self {
            world,
            robot: Robot::new(start),
            verbose: false,
        }
    }

    pub fn with_start(world: VacuumWorld, start: usize) -> Result<Self> {
        if start >= world.room_count() {
            return Err(VacuumError::RoomOutOfRange {
                index: start,
                room_count: world.room_count(),
            });
        }
        Ok(Self {
            world,
            robot: Robot::new(start),
            verbose: false,
        })
    }

    /// Log rooms getting dirty again at debug level.
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn verbose(&self) -> bool {
        self.verbose
    }

    pub fn world(&self) -> &VacuumWorld {
        &self.world
    }

    pub fn robot(&self) -> &Robot {
        &self.robot
    }
}

impl Environment for VacuumWorldEnvironment {
    type Action = VacuumWorldAction;
    type Percept = VacuumWorldLocalPercept;
    type Score = i64;

    fn percept(&self) -> Self::Percept {
        let location = self.robot.position();
        VacuumWorldLocalPercept {
            location,
            room_count: self.world.room_count(),
            // The robot never stands outside the world, see Robot::perform.
            square_state: self.world.squares[location],
        }
    }

    fn execute_action(&mut self, action: &Self::Action) -> Result<()> {
        self.robot.perform(*action, &mut self.world)
    }

    fn score(&self) -> Self::Score {
        self.world.count_clean_rooms() as i64
    }

    fn cost(&self) -> Self::Score {
        self.robot.total_movement() as i64
    }

    fn advance_time(&mut self, rng: &mut Rng) {
        let newly_dirty = self.world.advance_time(rng);
        if self.verbose && newly_dirty > 0 {
            debug!(newly_dirty, squares = ?self.world.squares, "rooms got dirty");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Rng;
    use proptest::prelude::*;
    use rand::SeedableRng;

    fn world(dirt_probabilities: Vec<f64>) -> VacuumWorld {
        VacuumWorld::new(&DirtConfiguration::new("test", dirt_probabilities).unwrap())
    }

    #[test]
    fn test_new_world_is_all_dirty() {
        let w = world(vec![0.3, 0.3, 0.3]);
        assert_eq!(w.room_count(), 3);
        assert_eq!(w.rooms(), ["A", "B", "C"]);
        assert_eq!(w.count_clean_rooms(), 0);
        for position in 0..3 {
            assert!(!w.is_clean(position).unwrap());
        }
    }

    #[test]
    fn test_clean_room_is_idempotent() {
        let mut w = world(vec![0.3, 0.3, 0.3]);
        w.clean_room(1).unwrap();
        w.clean_room(1).unwrap();
        assert!(w.is_clean(1).unwrap());
        assert_eq!(w.count_clean_rooms(), 1);
    }

    #[test]
    fn test_out_of_range_room_is_an_error() {
        let mut w = world(vec![0.3, 0.3, 0.3]);
        assert!(matches!(
            w.is_clean(3),
            Err(VacuumError::RoomOutOfRange {
                index: 3,
                room_count: 3
            })
        ));
        assert!(matches!(
            w.clean_room(7),
            Err(VacuumError::RoomOutOfRange { index: 7, .. })
        ));
        assert_eq!(w.count_clean_rooms(), 0);
    }

    #[test]
    fn test_advance_time_with_certain_dirt_makes_every_clean_room_dirty() {
        let mut w = world(vec![1.0, 1.0, 1.0]);
        for position in 0..3 {
            w.clean_room(position).unwrap();
        }
        let mut rng = Rng::seed_from_u64(42);
        assert_eq!(w.advance_time(&mut rng), 3);
        assert_eq!(w.count_clean_rooms(), 0);
    }

    #[test]
    fn test_advance_time_without_dirt_keeps_rooms_clean() {
        let mut w = world(vec![0.0, 0.0, 0.0]);
        w.clean_room(0).unwrap();
        w.clean_room(2).unwrap();
        let mut rng = Rng::seed_from_u64(42);
        for _ in 0..100 {
            assert_eq!(w.advance_time(&mut rng), 0);
        }
        assert_eq!(w.squares(), [SquareState::Clean, SquareState::Dirty, SquareState::Clean]);
    }

    #[test]
    fn test_configuration_rejects_invalid_probabilities() {
        assert!(matches!(
            DirtConfiguration::new("bad", vec![0.3, 1.5, 0.3]),
            Err(VacuumError::InvalidProbability { room: 1, .. })
        ));
        assert!(matches!(
            DirtConfiguration::new("bad", vec![-0.1]),
            Err(VacuumError::InvalidProbability { room: 0, .. })
        ));
        assert!(matches!(
            DirtConfiguration::new("bad", vec![0.3, f64::NAN]),
            Err(VacuumError::InvalidProbability { room: 1, .. })
        ));
        assert!(matches!(
            DirtConfiguration::new("bad", vec![]),
            Err(VacuumError::EmptyConfiguration)
        ));
    }

    #[test]
    fn test_numbered_configuration_label() {
        let c = DirtConfiguration::numbered(0, vec![0.5, 0.2, 0.1]).unwrap();
        assert_eq!(c.label(), "Configuration 1");
        assert_eq!(c.dirt_probabilities(), [0.5, 0.2, 0.1]);
    }

    #[test]
    fn test_parse_configuration() {
        let c = DirtConfiguration::parse(1, "0.3, 0.3,0.3").unwrap();
        assert_eq!(c.label(), "Configuration 2");
        assert_eq!(c.dirt_probabilities(), [0.3, 0.3, 0.3]);
        assert!(matches!(
            DirtConfiguration::parse(0, "0.3,x"),
            Err(VacuumError::UnparsableProbability { ref text, .. }) if text == "x"
        ));
        assert!(matches!(
            DirtConfiguration::parse(0, "0.1,1.2"),
            Err(VacuumError::InvalidProbability { room: 1, .. })
        ));
        assert!(matches!(
            DirtConfiguration::parse(0, "7.0,-3.0,NaN"),
            Err(VacuumError::InvalidProbability { room: 0, .. })
        ));
        assert!(DirtConfiguration::parse(0, "").is_err());
    }

    #[test]
    fn test_room_labels_past_the_alphabet() {
        assert_eq!(room_label(0), "A");
        assert_eq!(room_label(25), "Z");
        assert_eq!(room_label(26), "R26");
    }

    #[test]
    fn test_environment_starts_robot_in_middle_room() {
        let env = VacuumWorldEnvironment::new(world(vec![0.3, 0.3, 0.3]));
        let percept = env.percept();
        assert_eq!(percept.location, 1);
        assert_eq!(percept.room_count, 3);
        assert_eq!(percept.square_state, SquareState::Dirty);
    }

    #[test]
    fn test_environment_score_counts_clean_rooms() {
        let mut env = VacuumWorldEnvironment::new(world(vec![0.3, 0.3, 0.3]));
        assert_eq!(env.score(), 0);
        env.execute_action(&VacuumWorldAction::Suck).unwrap();
        assert_eq!(env.score(), 1);
        env.execute_action(&VacuumWorldAction::Right).unwrap();
        assert_eq!(env.score(), 1);
        env.execute_action(&VacuumWorldAction::Suck).unwrap();
        assert_eq!(env.score(), 2);
        assert_eq!(env.cost(), 1);
    }

    #[test]
    fn test_environment_is_quiet_unless_verbose() {
        let env = VacuumWorldEnvironment::new(world(vec![0.3, 0.3, 0.3]));
        assert!(!env.verbose());
        assert!(env.with_verbose(true).verbose());
    }

    #[test]
    fn test_environment_rejects_start_outside_world() {
        assert!(matches!(
            VacuumWorldEnvironment::with_start(world(vec![0.3, 0.3]), 2),
            Err(VacuumError::RoomOutOfRange { index: 2, .. })
        ));
    }

    fn probabilities() -> impl Strategy<Value = Vec<f64>> {
        prop::collection::vec(0.0..=1.0f64, 1..8)
    }

    proptest! {
        #[test]
        fn test_advance_time_never_touches_dirty_rooms(
            dirt_probabilities in probabilities(),
            seed in any::<u64>(),
            cleaned in prop::collection::vec(any::<bool>(), 8),
        ) {
            let mut w = world(dirt_probabilities);
            for position in 0..w.room_count() {
                if cleaned[position] {
                    w.clean_room(position).unwrap();
                }
            }
            let before = w.squares().to_vec();
            let mut rng = Rng::seed_from_u64(seed);
            w.advance_time(&mut rng);
            for (b, a) in before.iter().zip(w.squares()) {
                if *b == SquareState::Dirty {
                    prop_assert_eq!(*a, SquareState::Dirty);
                }
            }
        }

        #[test]
        fn test_clean_room_then_is_clean(
            dirt_probabilities in probabilities(),
            position in 0..8usize,
        ) {
            let mut w = world(dirt_probabilities);
            let position = position % w.room_count();
            w.clean_room(position).unwrap();
            prop_assert!(w.is_clean(position).unwrap());
        }

        #[test]
        fn test_count_clean_rooms_is_bounded(
            dirt_probabilities in probabilities(),
            seed in any::<u64>(),
            steps in 0..50usize,
        ) {
            let mut w = world(dirt_probabilities);
            let mut rng = Rng::seed_from_u64(seed);
            for step in 0..steps {
                w.clean_room(step % w.room_count()).unwrap();
                w.advance_time(&mut rng);
                prop_assert!(w.count_clean_rooms() <= w.room_count());
            }
        }
    }
}
