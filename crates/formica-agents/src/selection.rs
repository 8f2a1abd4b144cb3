//! Random-proportional move selection.
//!
//! An edge's attractiveness is `tau^alpha * eta^beta`. The next step is
//! drawn with probability proportional to attractiveness; when every
//! candidate scores zero the draw falls back to uniform so the walk can
//! still make progress.

use formica_core::random::RandomSource;

/// Ceiling for overflowing attractiveness so sums stay finite.
const MAX_ATTRACTIVENESS: f64 = 1e300;

/// Attractiveness of one candidate edge.
///
/// Infinite desirability (an inverse-distance heuristic evaluated at the
/// goal) ranks above every finite score. NaN or negative desirability
/// counts as zero. The result is always finite and non-negative.
pub fn attractiveness(intensity: f64, desirability: f64, alpha: f64, beta: f64) -> f64 {
    let eta = if desirability.is_nan() || desirability < 0.0 {
        0.0
    } else {
        desirability
    };
    let tau_term = intensity.max(0.0).powf(alpha);
    let eta_term = eta.powf(beta);
    if tau_term == 0.0 || eta_term == 0.0 {
        return 0.0;
    }
    let weight = tau_term * eta_term;
    if weight.is_nan() {
        0.0
    } else {
        weight.min(MAX_ATTRACTIVENESS)
    }
}

/// Pick an index into `weights` proportionally to its value.
///
/// Returns `None` only when `weights` is empty.
pub fn roulette<R: RandomSource + ?Sized>(weights: &[f64], rng: &mut R) -> Option<usize> {
    if weights.is_empty() {
        return None;
    }
    let total: f64 = weights.iter().sum();
    if !(total.is_finite() && total > 0.0) {
        return Some(rng.next_index(weights.len()));
    }

    let target = rng.next_unit() * total;
    let mut acc = 0.0;
    for (idx, w) in weights.iter().enumerate() {
        acc += w;
        if target < acc {
            return Some(idx);
        }
    }
    // Rounding can leave target == total; take the last non-zero weight.
    weights.iter().rposition(|w| *w > 0.0)
}
