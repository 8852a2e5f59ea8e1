//! Pairwise outcome model.

use rand::Rng;

/// Bradley-Terry probability that a competitor of strength `a` beats one
/// of strength `b`. Two zero strengths are a coin flip.
#[must_use]
pub fn win_probability(a: f64, b: f64) -> f64 {
    let total = a + b;
    if total > 0.0 {
        a / total
    } else {
        0.5
    }
}

/// Which side of a match prevailed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

/// Decides one match with a single uniform draw from `rng`.
///
/// The left entrant wins iff the draw falls below its win probability.
pub fn draw_winner<R: Rng + ?Sized>(rng: &mut R, left: f64, right: f64) -> Side {
    if rng.gen::<f64>() < win_probability(left, right) {
        Side::Left
    } else {
        Side::Right
    }
}
