/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Ordinary least squares over an evenly spaced series.
//!
//! Free functions so they can be tested independently of the
//! [`DemandEstimator`](super::DemandEstimator).

/// `y = slope · x + intercept`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearFit {
    pub slope: f64,
    pub intercept: f64,
}

impl LinearFit {
    pub fn at(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }
}

/// Fits `values[i]` against `i = 0, 1, …`.
///
/// Returns `None` for fewer than two points (the slope is undefined).
pub fn fit_indexed(values: &[f64]) -> Option<LinearFit> {
    let n = values.len();
    if n < 2 {
        return None;
    }

    let (mut sx, mut sy, mut sxy, mut sxx) = (0.0, 0.0, 0.0, 0.0);
    for (i, &y) in values.iter().enumerate() {
        let x = i as f64;
        sx += x;
        sy += y;
        sxy += x * y;
        sxx += x * x;
    }

    let nf = n as f64;
    // distinct x values, so the denominator is never zero for n >= 2
    let slope = (nf * sxy - sx * sy) / (nf * sxx - sx * sx);
    let intercept = (sy - slope * sx) / nf;
    Some(LinearFit { slope, intercept })
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn too_few_points() {
        assert_eq!(fit_indexed(&[]), None);
        assert_eq!(fit_indexed(&[10.0]), None);
    }

    #[test]
    fn perfect_line_recovers_slope_and_intercept() {
        let fit = fit_indexed(&[40.0, 44.0, 48.0]).unwrap();
        assert!((fit.slope - 4.0).abs() < 1e-9);
        assert!((fit.intercept - 40.0).abs() < 1e-9);
        assert!((fit.at(3.0) - 52.0).abs() < 1e-9);
    }

    #[test]
    fn flat_series_has_zero_slope() {
        let fit = fit_indexed(&[20.0, 20.0, 20.0, 20.0]).unwrap();
        assert_eq!(fit.slope, 0.0);
        assert_eq!(fit.at(10.0), 20.0);
    }

    #[test]
    fn noisy_series_uses_least_squares() {
        // y = 1, 3, 2 → slope 0.5, intercept 1.5
        let fit = fit_indexed(&[1.0, 3.0, 2.0]).unwrap();
        assert!((fit.slope - 0.5).abs() < 1e-9);
        assert!((fit.intercept - 1.5).abs() < 1e-9);
    }
}
