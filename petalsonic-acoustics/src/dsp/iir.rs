//! Second-order recursive filters.
//!
//! Coefficient layout and sign convention (a0 normalized to 1):
//!
//! ```text
//! y[n] = b0 x[n] + b1 x[n-1] + b2 x[n-2] - a1 y[n-1] - a2 y[n-2]
//! ```
//!
//! Design formulas follow the Audio EQ Cookbook (R. Bristow-Johnson).

use std::f64::consts::PI;

/// Butterworth quality factor.
const DEFAULT_Q: f64 = std::f64::consts::FRAC_1_SQRT_2;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Iir {
    pub b0: f32,
    pub b1: f32,
    pub b2: f32,
    pub a1: f32,
    pub a2: f32,
}

impl Iir {
    /// Passes the input through unchanged.
    pub const fn identity() -> Self {
        Self {
            b0: 1.0,
            b1: 0.0,
            b2: 0.0,
            a1: 0.0,
            a2: 0.0,
        }
    }

    /// Emits silence for any input.
    pub const fn silence() -> Self {
        Self {
            b0: 0.0,
            b1: 0.0,
            b2: 0.0,
            a1: 0.0,
            a2: 0.0,
        }
    }

    /// Normalizes raw cookbook coefficients by `a0`. Computed in f64 so that
    /// low cutoffs at high sampling rates keep their precision.
    fn normalized(b0: f64, b1: f64, b2: f64, a0: f64, a1: f64, a2: f64) -> Self {
        Self {
            b0: (b0 / a0) as f32,
            b1: (b1 / a0) as f32,
            b2: (b2 / a0) as f32,
            a1: (a1 / a0) as f32,
            a2: (a2 / a0) as f32,
        }
    }

    fn omega(frequency: f32, sampling_rate: u32) -> f64 {
        let nyquist = 0.5 * sampling_rate as f64;
        // Keep the design away from DC and Nyquist where the formulas degenerate.
        let frequency = (frequency as f64).clamp(1.0, nyquist * 0.999);
        2.0 * PI * frequency / sampling_rate as f64
    }

    pub fn low_pass(cutoff: f32, sampling_rate: u32) -> Self {
        Self::low_pass_q(cutoff, DEFAULT_Q, sampling_rate)
    }

    pub fn low_pass_q(cutoff: f32, q: f64, sampling_rate: u32) -> Self {
        let w0 = Self::omega(cutoff, sampling_rate);
        let (sw0, cw0) = w0.sin_cos();
        let alpha = sw0 / (2.0 * q);

        Self::normalized(
            (1.0 - cw0) / 2.0,
            1.0 - cw0,
            (1.0 - cw0) / 2.0,
            1.0 + alpha,
            -2.0 * cw0,
            1.0 - alpha,
        )
    }

    pub fn high_pass(cutoff: f32, sampling_rate: u32) -> Self {
        Self::high_pass_q(cutoff, DEFAULT_Q, sampling_rate)
    }

    pub fn high_pass_q(cutoff: f32, q: f64, sampling_rate: u32) -> Self {
        let w0 = Self::omega(cutoff, sampling_rate);
        let (sw0, cw0) = w0.sin_cos();
        let alpha = sw0 / (2.0 * q);

        Self::normalized(
            (1.0 + cw0) / 2.0,
            -(1.0 + cw0),
            (1.0 + cw0) / 2.0,
            1.0 + alpha,
            -2.0 * cw0,
            1.0 - alpha,
        )
    }

    /// Constant 0 dB peak gain band-pass centred on the geometric mean of the cutoffs.
    pub fn band_pass(low_cutoff: f32, high_cutoff: f32, sampling_rate: u32) -> Self {
        let center = ((low_cutoff.max(1.0) as f64) * (high_cutoff as f64)).sqrt();
        let q_inverse = (high_cutoff as f64 - low_cutoff as f64) / center;
        let w0 = Self::omega(center as f32, sampling_rate);
        let (sw0, cw0) = w0.sin_cos();
        let alpha = sw0 * q_inverse / 2.0;

        Self::normalized(alpha, 0.0, -alpha, 1.0 + alpha, -2.0 * cw0, 1.0 - alpha)
    }

    /// `gain` is a linear amplitude applied below the cutoff.
    pub fn low_shelf(cutoff: f32, gain: f32, sampling_rate: u32) -> Self {
        let w0 = Self::omega(cutoff, sampling_rate);
        let (sw0, cw0) = w0.sin_cos();
        let alpha = sw0 / (2.0 * DEFAULT_Q);
        let a = (gain.max(1e-8) as f64).sqrt();
        let two_sqrt_a_alpha = 2.0 * a.sqrt() * alpha;

        Self::normalized(
            a * ((a + 1.0) - (a - 1.0) * cw0 + two_sqrt_a_alpha),
            2.0 * a * ((a - 1.0) - (a + 1.0) * cw0),
            a * ((a + 1.0) - (a - 1.0) * cw0 - two_sqrt_a_alpha),
            (a + 1.0) + (a - 1.0) * cw0 + two_sqrt_a_alpha,
            -2.0 * ((a - 1.0) + (a + 1.0) * cw0),
            (a + 1.0) + (a - 1.0) * cw0 - two_sqrt_a_alpha,
        )
    }

    /// `gain` is a linear amplitude applied above the cutoff.
    pub fn high_shelf(cutoff: f32, gain: f32, sampling_rate: u32) -> Self {
        let w0 = Self::omega(cutoff, sampling_rate);
        let (sw0, cw0) = w0.sin_cos();
        let alpha = sw0 / (2.0 * DEFAULT_Q);
        let a = (gain.max(1e-8) as f64).sqrt();
        let two_sqrt_a_alpha = 2.0 * a.sqrt() * alpha;

        Self::normalized(
            a * ((a + 1.0) + (a - 1.0) * cw0 + two_sqrt_a_alpha),
            -2.0 * a * ((a - 1.0) + (a + 1.0) * cw0),
            a * ((a + 1.0) + (a - 1.0) * cw0 - two_sqrt_a_alpha),
            (a + 1.0) - (a - 1.0) * cw0 + two_sqrt_a_alpha,
            2.0 * ((a - 1.0) - (a + 1.0) * cw0),
            (a + 1.0) - (a - 1.0) * cw0 - two_sqrt_a_alpha,
        )
    }

    /// `gain` is a linear amplitude applied between the cutoffs.
    pub fn peaking(low_cutoff: f32, high_cutoff: f32, gain: f32, sampling_rate: u32) -> Self {
        let center = ((low_cutoff.max(1.0) as f64) * (high_cutoff as f64)).sqrt();
        let q_inverse = (high_cutoff as f64 - low_cutoff as f64) / center;
        let w0 = Self::omega(center as f32, sampling_rate);
        let (sw0, cw0) = w0.sin_cos();
        let alpha = sw0 * q_inverse / 2.0;
        let a = (gain.max(1e-8) as f64).sqrt();

        Self::normalized(
            1.0 + alpha * a,
            -2.0 * cw0,
            1.0 - alpha * a,
            1.0 + alpha / a,
            -2.0 * cw0,
            1.0 - alpha / a,
        )
    }

    /// One-pole recursive section `y[n] = (1 - g) x[n] + g y[n-1]`.
    ///
    /// The impulse response decays by a factor `g` per sample; unity gain at DC.
    pub fn feedback(gain: f32) -> Self {
        Self {
            b0: 1.0 - gain,
            b1: 0.0,
            b2: 0.0,
            a1: -gain,
            a2: 0.0,
        }
    }

    /// Scales the feed-forward coefficients.
    pub fn scaled(mut self, gain: f32) -> Self {
        self.b0 *= gain;
        self.b1 *= gain;
        self.b2 *= gain;
        self
    }

    /// Magnitude response at angular frequency `omega` (radians per sample).
    pub fn spectrum(&self, omega: f32) -> f32 {
        let (b0, b1, b2, a1, a2) = (self.b0, self.b1, self.b2, self.a1, self.a2);
        let c1 = omega.cos();
        let c2 = (2.0 * omega).cos();
        let numerator = b0 * b0 + b1 * b1 + b2 * b2 + 2.0 * (b0 * b1 + b1 * b2) * c1 + 2.0 * b0 * b2 * c2;
        let denominator = 1.0 + a1 * a1 + a2 * a2 + 2.0 * (a1 + a1 * a2) * c1 + 2.0 * a2 * c2;
        (numerator / denominator).max(0.0).sqrt()
    }

    /// Both poles strictly inside the unit circle.
    pub fn is_stable(&self) -> bool {
        // Stability triangle for z^2 + a1 z + a2.
        self.a2.abs() < 1.0 && self.a1.abs() < 1.0 + self.a2
    }
}

impl Default for Iir {
    fn default() -> Self {
        Self::identity()
    }
}

/// Flushes denormal-range values to zero so long decays do not hit the slow path.
#[inline]
pub fn flush_denormal(x: f32) -> f32 {
    if x.abs() < 1e-20 { 0.0 } else { x }
}

/// Persistent state for running one [`Iir`] over consecutive buffers.
///
/// Changing the coefficients with [`set_filter`](Self::set_filter) keeps the
/// history, so the change is heard as a spectral shift and not a click.
#[derive(Debug, Clone, Default)]
pub struct IirFilterer {
    filter: Iir,
    x1: f32,
    x2: f32,
    y1: f32,
    y2: f32,
}

impl IirFilterer {
    /// A filterer that emits silence until a filter is set.
    pub fn new() -> Self {
        Self::with_filter(Iir::silence())
    }

    pub fn with_filter(filter: Iir) -> Self {
        Self {
            filter,
            x1: 0.0,
            x2: 0.0,
            y1: 0.0,
            y2: 0.0,
        }
    }

    pub fn filter(&self) -> &Iir {
        &self.filter
    }

    pub fn set_filter(&mut self, filter: Iir) {
        self.filter = filter;
    }

    /// Restores the silent filter without touching history.
    pub fn reset_filter(&mut self) {
        self.filter = Iir::silence();
    }

    /// Clears history.
    pub fn reset(&mut self) {
        self.x1 = 0.0;
        self.x2 = 0.0;
        self.y1 = 0.0;
        self.y2 = 0.0;
    }

    pub fn copy_state(&mut self, other: &IirFilterer) {
        self.x1 = other.x1;
        self.x2 = other.x2;
        self.y1 = other.y1;
        self.y2 = other.y2;
    }

    #[inline]
    pub fn apply_sample(&mut self, x: f32) -> f32 {
        let f = &self.filter;
        let y = f.b0 * x + f.b1 * self.x1 + f.b2 * self.x2 - f.a1 * self.y1 - f.a2 * self.y2;
        let y = flush_denormal(y);

        self.x2 = self.x1;
        self.x1 = x;
        self.y2 = self.y1;
        self.y1 = y;

        y
    }

    /// Filters exactly `num_samples` samples from `input` into `output`.
    pub fn apply(&mut self, num_samples: usize, input: &[f32], output: &mut [f32]) {
        for (y, &x) in output[..num_samples].iter_mut().zip(&input[..num_samples]) {
            *y = self.apply_sample(x);
        }
    }

    /// Filters `buffer` in place, one sample at a time.
    pub fn apply_in_place(&mut self, buffer: &mut [f32]) {
        for sample in buffer.iter_mut() {
            *sample = self.apply_sample(*sample);
        }
    }
}
