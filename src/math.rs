use crate::Float;
use serde_derive::{Deserialize, Serialize};

/// Cosine ease-in-out remap of `t` in `[0, 1]`. Zero slope at both ends.
#[inline]
pub fn ease_in_out<F: Float>(t: F) -> F {
    let half = F::one() / (F::one() + F::one());

    half - (t * F::PI()).cos() * half
}

#[inline]
pub fn lerp<F: Float>(a: F, b: F, t: F) -> F {
    a + (b - a) * t
}

/// Position of `frame` between two keyframes, `0` at `prev`, `1` at `next`.
#[inline]
pub fn progress(frame: u32, prev: u32, next: u32) -> f32 {
    if next <= prev {
        return 0.0;
    }

    frame.saturating_sub(prev) as f32 / (next - prev) as f32
}

/// How history weights fall off with lag.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum Decay {
    /// `factor * exp(-lag / len)`
    #[default]
    Exponential,
    /// `factor * (1 - lag / len)`
    Linear,
}

impl Decay {
    /// Weight of the history entry at `lag` (0 = newest) out of `len` entries.
    #[inline]
    pub fn weight<F: Float>(self, factor: F, lag: F, len: F) -> F {
        if len <= F::zero() {
            return F::zero();
        }

        match self {
            Decay::Exponential => factor * (-lag / len).exp(),
            Decay::Linear => factor * (F::one() - lag / len),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ease_endpoints_and_midpoint() {
        assert!(ease_in_out(0.0f32).abs() < 1e-7);
        assert!((ease_in_out(1.0f32) - 1.0).abs() < 1e-7);
        assert!((ease_in_out(0.5f64) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn ease_is_flat_at_the_ends() {
        let h = 1e-3f64;
        let start = (ease_in_out(h) - ease_in_out(0.0)) / h;
        let end = (ease_in_out(1.0) - ease_in_out(1.0 - h)) / h;

        assert!(start < 1e-2);
        assert!(end < 1e-2);
    }

    #[test]
    fn progress_between_keyframes() {
        assert_eq!(progress(10, 10, 20), 0.0);
        assert_eq!(progress(15, 10, 20), 0.5);
        assert_eq!(progress(20, 10, 20), 1.0);
        assert_eq!(progress(5, 10, 10), 0.0);
    }

    #[test]
    fn decay_weights() {
        let newest = Decay::Exponential.weight(0.8f32, 0.0, 4.0);
        let oldest = Decay::Exponential.weight(0.8f32, 3.0, 4.0);

        assert!((newest - 0.8).abs() < 1e-6);
        assert!((oldest - 0.8 * (-0.75f32).exp()).abs() < 1e-6);

        assert!((Decay::Linear.weight(0.8f32, 2.0, 4.0) - 0.4).abs() < 1e-6);
        assert_eq!(Decay::Linear.weight(0.8f32, 0.0, 0.0), 0.0);
    }
}
