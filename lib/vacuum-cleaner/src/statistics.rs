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

use crate::{Result, VacuumError};

pub fn mean(samples: &[f64]) -> Result<f64> {
    if samples.is_empty() {
        return Err(VacuumError::InsufficientSamples { needed: 1, got: 0 });
    }
    Ok(samples.iter().sum::<f64>() / samples.len() as f64)
}

/// Sample standard deviation, i.e. with an N - 1 denominator.
pub fn sample_std_dev(samples: &[f64]) -> Result<f64> {
    if samples.len() < 2 {
        return Err(VacuumError::InsufficientSamples {
            needed: 2,
            got: samples.len(),
        });
    }
    let mean = mean(samples)?;
    let sum_of_squares: f64 = samples.iter().map(|x| (x - mean).powi(2)).sum();
    Ok((sum_of_squares / (samples.len() - 1) as f64).sqrt())
}
