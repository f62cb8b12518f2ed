//! Standard test objectives.
//!
//! All functions take a position slice and can be passed directly wherever
//! an [`Objective`](crate::engine::Objective) is expected.

use std::f64::consts::{E, PI};

/// Sphere function - N-dimensional unimodal
/// Global minimum: f(x) = 0 at x = (0, 0, ..., 0)
/// Bounds: x_i in [-5.12, 5.12]
pub fn sphere(x: &[f64]) -> f64 {
    x.iter().map(|&xi| xi * xi).sum()
}

/// Rastrigin function - N-dimensional multimodal
/// Global minimum: f(x) = 0 at x = (0, 0, ..., 0)
/// Bounds: x_i in [-5.12, 5.12]
pub fn rastrigin(x: &[f64]) -> f64 {
    let n = x.len() as f64;
    let sum: f64 = x
        .iter()
        .map(|&xi| xi * xi - 10.0 * (2.0 * PI * xi).cos())
        .sum();
    10.0 * n + sum
}

/// Ackley function - N-dimensional multimodal
/// Global minimum: f(x) = 0 at x = (0, 0, ..., 0)
/// Bounds: x_i in [-32.768, 32.768]
pub fn ackley(x: &[f64]) -> f64 {
    let n = x.len() as f64;
    let sum_sq: f64 = x.iter().map(|&xi| xi * xi).sum();
    let sum_cos: f64 = x.iter().map(|&xi| (2.0 * PI * xi).cos()).sum();

    -20.0 * (-0.2 * (sum_sq / n).sqrt()).exp() - (sum_cos / n).exp() + 20.0 + E
}

/// Rosenbrock function - N-dimensional, narrow curved valley
/// Global minimum: f(x) = 0 at x = (1, 1, ..., 1)
/// Bounds: x_i in [-5, 10]
pub fn rosenbrock(x: &[f64]) -> f64 {
    x.windows(2)
        .map(|w| 100.0 * (w[1] - w[0] * w[0]).powi(2) + (1.0 - w[0]).powi(2))
        .sum()
}

/// Miele-Cantrell function - 4D
/// Global minimum: f(x) = 0 at x = (0, 1, 1, 1)
/// Bounds: x_i in [-1, 1]
pub fn miele_cantrell(x: &[f64]) -> f64 {
    (x[0].exp().recip() - x[1]).powi(4)
        + 100.0 * (x[1] - x[2]).powi(6)
        + (x[2] - x[3]).tan().powi(4)
        + x[0].powi(8)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_global_minima() {
        assert_eq!(sphere(&[0.0, 0.0, 0.0]), 0.0);
        assert!(rastrigin(&[0.0, 0.0]).abs() < 1e-12);
        assert!(ackley(&[0.0, 0.0, 0.0]).abs() < 1e-12);
        assert_eq!(rosenbrock(&[1.0, 1.0, 1.0, 1.0]), 0.0);
        assert!(miele_cantrell(&[0.0, 1.0, 1.0, 1.0]).abs() < 1e-12);
    }

    #[test]
    fn test_known_values() {
        assert_eq!(sphere(&[1.0, 2.0]), 5.0);
        assert!((rastrigin(&[1.0, 1.0]) - 2.0).abs() < 1e-12);
        assert_eq!(rosenbrock(&[0.0, 0.0]), 1.0);
    }
}
