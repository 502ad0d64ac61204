//! Stability scoring for the distance window.

/// Derive a stability percentage from a distance series.
///
/// The score is `100 - cv`, clamped to `[0, 100]`, where `cv` is the
/// coefficient of variation of the series: population standard deviation
/// over the mean, as a percentage. A flat series scores 100, a noisy one
/// approaches 0.
///
/// Fewer than two samples score 100 — there is not enough data to measure
/// spread. A series whose mean is exactly zero scores 0, so the result is
/// always finite.
#[must_use]
pub fn stability_score(distances: &[f64]) -> f64 {
    if distances.len() < 2 {
        return 100.0;
    }

    let count = distances.len() as f64;
    let mean = distances.iter().sum::<f64>() / count;
    if mean == 0.0 {
        return 0.0;
    }

    let variance = distances.iter().map(|d| (d - mean).powi(2)).sum::<f64>() / count;
    let cv = variance.sqrt() / mean * 100.0;
    (100.0 - cv).clamp(0.0, 100.0)
}
