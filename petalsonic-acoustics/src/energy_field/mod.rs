//! Time/frequency/direction histograms of energy arriving at a listener.
//!
//! A field is created zeroed by [`EnergyFieldFactory`], filled concurrently
//! through the [`EnergyField`] trait, and finalized into a read-only
//! [`EnergyHistogram`]. Finalizing consumes the field, so nothing can write to
//! it afterwards.

mod accelerated;
mod cpu;
mod device;
mod factory;
mod histogram;

pub use accelerated::AcceleratedEnergyField;
pub use cpu::CpuEnergyField;
pub use device::{ComputeDevice, DeviceBuffer, SoftwareDevice};
pub use factory::EnergyFieldFactory;
pub use histogram::EnergyHistogram;

use crate::bands::{BandLayout, Bands};
use crate::error::{AcousticsError, Result};
use crate::sh;
use std::sync::atomic::{AtomicU32, Ordering};

/// Width of one time bin, in seconds.
pub const BIN_DURATION: f32 = 0.01;

/// Where a field's cells live.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnergyFieldBackend {
    Cpu,
    Accelerated,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnergyFieldSettings {
    /// Length of the histogram, in seconds.
    pub duration: f32,
    /// Spherical harmonic order of the directional terms.
    pub order: u32,
    pub band_layout: BandLayout,
}

impl Default for EnergyFieldSettings {
    fn default() -> Self {
        Self {
            duration: 2.0,
            order: 1,
            band_layout: BandLayout::default(),
        }
    }
}

impl EnergyFieldSettings {
    pub fn new(duration: f32, order: u32, band_layout: BandLayout) -> Self {
        Self {
            duration,
            order,
            band_layout,
        }
    }

    pub fn duration(mut self, duration: f32) -> Self {
        self.duration = duration;
        self
    }

    pub fn order(mut self, order: u32) -> Self {
        self.order = order;
        self
    }

    pub fn band_layout(mut self, band_layout: BandLayout) -> Self {
        self.band_layout = band_layout;
        self
    }

    pub fn bands(&self) -> Bands {
        Bands::new(self.band_layout)
    }

    pub fn num_terms(&self) -> usize {
        sh::num_coeffs_for_order(self.order)
    }

    /// `ceil(duration / BIN_DURATION)`, at least one bin.
    pub fn num_bins(&self) -> usize {
        // Durations that are whole multiples of the bin width must not pick up
        // an extra bin from f32 rounding.
        let bins = (self.duration as f64 / BIN_DURATION as f64 - 1e-6).ceil();
        bins.max(1.0) as usize
    }

    pub fn validate(&self) -> Result<()> {
        if !self.duration.is_finite() || self.duration <= 0.0 {
            return Err(AcousticsError::Configuration(format!(
                "Energy field duration must be positive, got {}",
                self.duration
            )));
        }
        if self.order > sh::MAX_ORDER {
            return Err(AcousticsError::Configuration(format!(
                "Energy field order {} exceeds the maximum of {}",
                self.order,
                sh::MAX_ORDER
            )));
        }
        Ok(())
    }
}

/// Dimensions of a `[band][term][bin]` grid stored contiguously.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldShape {
    pub num_bands: usize,
    pub num_terms: usize,
    pub num_bins: usize,
}

impl FieldShape {
    pub fn of(settings: &EnergyFieldSettings) -> Self {
        Self {
            num_bands: settings.bands().num_bands(),
            num_terms: settings.num_terms(),
            num_bins: settings.num_bins(),
        }
    }

    pub fn len(&self) -> usize {
        self.num_bands * self.num_terms * self.num_bins
    }

    pub fn index(&self, band: usize, term: usize, bin: usize) -> Option<usize> {
        (band < self.num_bands && term < self.num_terms && bin < self.num_bins)
            .then(|| (band * self.num_terms + term) * self.num_bins + bin)
    }
}

/// Adds `value` to an `f32` stored as raw bits.
pub(crate) fn atomic_add_f32(cell: &AtomicU32, value: f32) {
    let mut current = cell.load(Ordering::Relaxed);
    loop {
        let next = (f32::from_bits(current) + value).to_bits();
        match cell.compare_exchange_weak(current, next, Ordering::AcqRel, Ordering::Relaxed) {
            Ok(_) => return,
            Err(actual) => current = actual,
        }
    }
}

/// Whether a contribution may be added to a cell. Negative and non-finite
/// values carry no physical energy and are dropped.
pub(crate) fn is_valid_contribution(value: f32) -> bool {
    value.is_finite() && value >= 0.0
}

/// A field being filled with energy.
///
/// All writes go through `&self`, so the field can be shared between ray
/// tracing workers. Each cell is updated atomically; concurrent contributions
/// to the same cell are never lost.
pub trait EnergyField: Send + Sync {
    fn settings(&self) -> &EnergyFieldSettings;

    fn backend(&self) -> EnergyFieldBackend;

    /// Reads one cell. Out-of-range coordinates read as 0.
    fn energy(&self, band: usize, term: usize, bin: usize) -> f32;

    /// Adds `value` to one cell. Out-of-range coordinates and invalid values
    /// are ignored.
    fn accumulate(&self, band: usize, term: usize, bin: usize, value: f32);

    /// Zeroes every cell.
    fn reset(&self);

    /// Ends accumulation and hands back the read-only result.
    fn finalize(self: Box<Self>) -> EnergyHistogram;

    fn bands(&self) -> Bands {
        self.settings().bands()
    }

    fn num_bands(&self) -> usize {
        self.bands().num_bands()
    }

    fn num_terms(&self) -> usize {
        self.settings().num_terms()
    }

    fn num_bins(&self) -> usize {
        self.settings().num_bins()
    }

    fn duration(&self) -> f32 {
        self.settings().duration
    }

    fn order(&self) -> u32 {
        self.settings().order
    }

    /// Bin index for an arrival time, if it falls inside the field.
    fn bin_for_time(&self, time: f32) -> Option<usize> {
        let bin = (time / BIN_DURATION).floor();
        (bin >= 0.0 && (bin as usize) < self.num_bins()).then_some(bin as usize)
    }
}
