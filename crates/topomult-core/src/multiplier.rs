//! Seam to the per-line multiplier model.
//!
//! The physical model lives outside this crate. Anything that maps an
//! elevation profile and its cell spacing to one multiplier per cell can be
//! plugged in, including plain closures.

/// Computes one multiplier per profile cell.
///
/// Implementations must be deterministic and return exactly
/// `profile.len()` values in profile order.
pub trait MultiplierModel: Sync {
    fn multipliers(&self, profile: &[f64], spacing: f64) -> Vec<f64>;
}

impl<F> MultiplierModel for F
where
    F: Fn(&[f64], f64) -> Vec<f64> + Sync,
{
    fn multipliers(&self, profile: &[f64], spacing: f64) -> Vec<f64> {
        self(profile, spacing)
    }
}

/// Echoes the elevation profile. Useful for checking orientation of outputs.
#[derive(Debug, Clone, Copy, Default)]
pub struct Identity;

impl MultiplierModel for Identity {
    fn multipliers(&self, profile: &[f64], _spacing: f64) -> Vec<f64> {
        profile.to_vec()
    }
}

/// Flat-terrain model: every cell gets the neutral multiplier 1.0.
#[derive(Debug, Clone, Copy, Default)]
pub struct Neutral;

impl MultiplierModel for Neutral {
    fn multipliers(&self, profile: &[f64], _spacing: f64) -> Vec<f64> {
        vec![1.0; profile.len()]
    }
}
