//! This module contains statistical helpers used by objective evaluation and front analysis.

#[cfg(test)]
#[path = "../../../tests/unit/algorithms/math_test.rs"]
mod math_test;

use crate::utils::Float;

/// Gets mean of values using given slice.
pub fn get_mean(values: &[Float]) -> Float {
    if values.is_empty() {
        0.
    } else {
        values.iter().sum::<Float>() / values.len() as Float
    }
}

/// Returns population variance (no Bessel's correction).
pub fn get_variance(values: &[Float]) -> Float {
    if values.is_empty() {
        return 0.;
    }

    let mean = get_mean(values);
    values.iter().map(|v| (v - mean) * (v - mean)).sum::<Float>() / values.len() as Float
}

/// Returns standard deviation.
pub fn get_stdev(values: &[Float]) -> Float {
    get_variance(values).sqrt()
}

/// Returns coefficient of variation, zero for a zero mean.
pub fn get_cv(values: &[Float]) -> Float {
    let mean = get_mean(values);
    if mean == 0. {
        return 0.;
    }

    get_stdev(values) / mean
}

/// Calculates Euclidean distance between two equally sized vectors.
pub fn euclidean_distance(a: &[Float], b: &[Float]) -> Float {
    debug_assert_eq!(a.len(), b.len());

    a.iter().zip(b.iter()).map(|(a, b)| (a - b) * (a - b)).sum::<Float>().sqrt()
}
