use serde::Serialize;
use std::fmt;

use crate::readers::Grid;

/// Descriptive statistics over the non-NaN cells of a grid.
///
/// An all-missing grid yields NaN for `max`, `min`, `mean` and `std`, and a `sum` of zero.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Summary {
    /// `(rows, cols)` of the grid as processed.
    pub shape: (usize, usize),
    /// Number of cells that took part in the reduction.
    pub valid: usize,
    pub max: f64,
    pub min: f64,
    pub mean: f64,
    /// Population standard deviation.
    pub std: f64,
    pub sum: f64,
}

impl Summary {
    pub fn cells(&self) -> usize {
        self.shape.0 * self.shape.1
    }

    pub fn missing(&self) -> usize {
        self.cells() - self.valid
    }

    pub fn valid_fraction(&self) -> f64 {
        if self.cells() == 0 {
            0.0
        } else {
            self.valid as f64 / self.cells() as f64
        }
    }
}

pub fn summarize(grid: &Grid) -> Summary {
    let mut valid = 0usize;
    let mut sum = 0.0;
    let mut max = f64::NEG_INFINITY;
    let mut min = f64::INFINITY;

    for &v in grid.iter().filter(|v| !v.is_nan()) {
        valid += 1;
        sum += v;
        max = max.max(v);
        min = min.min(v);
    }

    if valid == 0 {
        return Summary {
            shape: grid.dim(),
            valid,
            max: f64::NAN,
            min: f64::NAN,
            mean: f64::NAN,
            std: f64::NAN,
            sum: 0.0,
        };
    }

    let mean = sum / valid as f64;
    let variance = grid
        .iter()
        .filter(|v| !v.is_nan())
        .map(|&v| (v - mean).powi(2))
        .sum::<f64>()
        / valid as f64;

    Summary {
        shape: grid.dim(),
        valid,
        max,
        min,
        mean,
        std: variance.sqrt(),
        sum,
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Max: {} Min: {} Mean: {} Std: {} Sum: {} shape: ({}, {}) valid: {}/{} ({:.1}%)",
            self.max,
            self.min,
            self.mean,
            self.std,
            self.sum,
            self.shape.0,
            self.shape.1,
            self.valid,
            self.cells(),
            self.valid_fraction() * 100.0
        )
    }
}
