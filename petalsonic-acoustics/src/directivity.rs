//! Source radiation patterns.
//!
//! A source either follows the analytic weighted-dipole model or defers
//! entirely to a user callback. The two cases are separate enum variants, so
//! a callback can never be combined with dipole parameters.

use crate::math::{CoordinateSpace, Vec3};
use std::fmt;
use std::sync::Arc;

type DirectivityFn = dyn Fn(Vec3) -> f32 + Send + Sync;

/// User-supplied directivity evaluator.
///
/// Receives a unit direction in the source's local space and returns the
/// relative radiated amplitude. Any user context is captured by the closure.
#[derive(Clone)]
pub struct DirectivityCallback(Arc<DirectivityFn>);

impl DirectivityCallback {
    pub fn new<F>(callback: F) -> Self
    where
        F: Fn(Vec3) -> f32 + Send + Sync + 'static,
    {
        Self(Arc::new(callback))
    }

    pub fn call(&self, direction: Vec3) -> f32 {
        (self.0)(direction)
    }
}

impl fmt::Debug for DirectivityCallback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("DirectivityCallback(..)")
    }
}

#[derive(Debug, Clone)]
pub enum Directivity {
    /// `|(1 - weight) + weight * cos(theta)|^power`.
    ///
    /// `weight` 0 is omnidirectional, 1 is a pure dipole. `theta` is measured
    /// from the source's ahead axis (local -z).
    Dipole { weight: f32, power: f32 },
    /// Overrides the analytic model completely.
    Callback(DirectivityCallback),
}

impl Directivity {
    pub fn omni() -> Self {
        Self::Dipole {
            weight: 0.0,
            power: 0.0,
        }
    }

    /// Dipole pattern. Weight is clamped to [0, 1] and power to >= 0.
    pub fn dipole(weight: f32, power: f32) -> Self {
        if !(0.0..=1.0).contains(&weight) || power < 0.0 {
            log::warn!(
                "Clamping dipole directivity (weight: {}, power: {})",
                weight,
                power
            );
        }
        Self::Dipole {
            weight: weight.clamp(0.0, 1.0),
            power: power.max(0.0),
        }
    }

    pub fn from_fn<F>(callback: F) -> Self
    where
        F: Fn(Vec3) -> f32 + Send + Sync + 'static,
    {
        Self::Callback(DirectivityCallback::new(callback))
    }

    pub fn is_omni(&self) -> bool {
        matches!(self, Self::Dipole { weight, .. } if *weight == 0.0)
    }

    /// Evaluates the pattern for a direction expressed in the source's local
    /// space. Callback results are returned as-is except NaN, which reads as
    /// 0; the dipole model is always non-negative.
    pub fn evaluate(&self, direction: Vec3) -> f32 {
        match self {
            Self::Callback(callback) => {
                let value = callback.call(direction);
                if value.is_nan() { 0.0 } else { value }
            }
            Self::Dipole { weight, power } => {
                // A zero-length direction carries no orientation; treat it as side-on.
                let cosine = -direction.normalize_or_zero().z;
                ((1.0 - weight) + weight * cosine).abs().powf(*power)
            }
        }
    }

    /// Evaluates the pattern towards a world-space `point` for a source whose
    /// frame is `source`.
    ///
    /// Omnidirectional dipoles return 1.0 without touching the frame.
    pub fn evaluate_at(&self, point: Vec3, source: &CoordinateSpace) -> f32 {
        if self.is_omni() {
            return 1.0;
        }

        let world_direction = (point - source.origin).normalize_or_zero();
        self.evaluate(source.direction_to_local(world_direction))
    }
}

impl Default for Directivity {
    fn default() -> Self {
        Self::omni()
    }
}
