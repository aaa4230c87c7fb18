//! Distance metrics for embedding comparison.

use serde::{Deserialize, Serialize};

/// Distance metric used by the vector index.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    /// Cosine distance in `[0, 2]`; thresholds are given as a similarity.
    #[default]
    Cosine,
    /// Raw Euclidean distance; thresholds are given as a maximum distance.
    L2,
}

impl Metric {
    /// Distance between two embeddings under this metric.
    pub fn distance(self, a: &[f32], b: &[f32]) -> f32 {
        match self {
            Self::Cosine => cosine_distance(a, b),
            Self::L2 => l2_distance(a, b),
        }
    }
}

impl std::fmt::Display for Metric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Cosine => write!(f, "cosine"),
            Self::L2 => write!(f, "l2"),
        }
    }
}

impl std::str::FromStr for Metric {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "cosine" => Ok(Self::Cosine),
            "l2" | "euclidean" => Ok(Self::L2),
            other => Err(format!("unknown metric: {other}")),
        }
    }
}

/// Cosine distance between two vectors.
///
/// Returns a value in `[0, 2]`. Zero vectors and dimension mismatches are
/// treated as maximally distant (2.0).
pub fn cosine_distance(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return 2.0;
    }

    let mut dot = 0.0_f64;
    let mut norm_a = 0.0_f64;
    let mut norm_b = 0.0_f64;

    for (&x, &y) in a.iter().zip(b) {
        let x = f64::from(x);
        let y = f64::from(y);
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    if norm_a == 0.0 || norm_b == 0.0 {
        return 2.0;
    }

    // Clamp to [-1, 1] to absorb rounding error.
    let similarity = (dot / (norm_a.sqrt() * norm_b.sqrt())).clamp(-1.0, 1.0);
    #[allow(clippy::cast_possible_truncation)]
    let distance = (1.0 - similarity) as f32;
    distance
}

/// Euclidean distance between two vectors.
///
/// Dimension mismatches return `f32::INFINITY` so they never pass a threshold.
pub fn l2_distance(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return f32::INFINITY;
    }

    let sum: f64 = a
        .iter()
        .zip(b)
        .map(|(&x, &y)| {
            let d = f64::from(x) - f64::from(y);
            d * d
        })
        .sum();

    #[allow(clippy::cast_possible_truncation)]
    let distance = sum.sqrt() as f32;
    distance
}
