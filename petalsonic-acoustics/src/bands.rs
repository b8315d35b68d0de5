//! Partition of the audible spectrum into frequency bands.
//!
//! Every component whose state is sized by the number of bands (energy fields,
//! band splitters, reverb effects, reverb parameters) is constructed from a
//! [`Bands`] value, and the layout travels with it. Consumers call
//! [`Bands::ensure_compatible`] at the boundary so data produced under one
//! layout is never read under another.

use crate::error::{AcousticsError, Result};

/// Selects one of the built-in band tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BandLayout {
    /// Low / mid / high, split at 800 Hz and 8 kHz.
    #[default]
    ThreeBand,
    /// Ten octave bands from 0 Hz to 22 kHz.
    Octave,
}

struct BandTable {
    low: &'static [f32],
    high: &'static [f32],
    band_pass_norm: &'static [f32],
}

// Norm for a middle band is 1 + (low / high)^2: the reciprocal of the gain of a
// Butterworth high-pass/low-pass pair at the band's geometric centre.
static THREE_BAND: BandTable = BandTable {
    low: &[0.0, 800.0, 8000.0],
    high: &[800.0, 8000.0, 22000.0],
    band_pass_norm: &[1.0, 1.01, 1.0],
};

static OCTAVE: BandTable = BandTable {
    low: &[
        0.0, 44.0, 88.0, 177.0, 355.0, 710.0, 1420.0, 2840.0, 5680.0, 11360.0,
    ],
    high: &[
        44.0, 88.0, 177.0, 355.0, 710.0, 1420.0, 2840.0, 5680.0, 11360.0, 22000.0,
    ],
    band_pass_norm: &[1.0, 1.25, 1.25, 1.25, 1.25, 1.25, 1.25, 1.25, 1.25, 1.0],
};

/// Read-only handle to the active band table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Bands {
    layout: BandLayout,
}

impl Bands {
    pub fn new(layout: BandLayout) -> Self {
        Self { layout }
    }

    fn table(&self) -> &'static BandTable {
        match self.layout {
            BandLayout::ThreeBand => &THREE_BAND,
            BandLayout::Octave => &OCTAVE,
        }
    }

    pub fn layout(&self) -> BandLayout {
        self.layout
    }

    pub fn num_bands(&self) -> usize {
        self.table().low.len()
    }

    pub fn low_cutoff(&self, band: usize) -> f32 {
        self.table().low[band]
    }

    pub fn high_cutoff(&self, band: usize) -> f32 {
        self.table().high[band]
    }

    /// Gain applied to band-pass shaped filters. Always 1.0 for the first
    /// (low-pass) and last (high-pass) bands.
    pub fn band_pass_norm(&self, band: usize) -> f32 {
        self.table().band_pass_norm[band]
    }

    /// Geometric centre of the band. The lowest band starts at 0 Hz, so its
    /// centre is taken as half its upper cutoff.
    pub fn center_frequency(&self, band: usize) -> f32 {
        let low = self.low_cutoff(band);
        let high = self.high_cutoff(band);
        if low <= 0.0 {
            0.5 * high
        } else {
            (low * high).sqrt()
        }
    }

    /// Index of the band containing `frequency`, clamped to the table.
    pub fn band_for_frequency(&self, frequency: f32) -> usize {
        let table = self.table();
        table
            .high
            .iter()
            .position(|&high| frequency < high)
            .unwrap_or(table.high.len() - 1)
    }

    /// Which of three broad reference bands (low below 800 Hz, mid below
    /// 8 kHz, high above) contains this band's centre. Used to map data
    /// authored per reference band, such as material coefficients, onto any
    /// layout.
    pub fn reference_band(&self, band: usize) -> usize {
        THREE_BAND
            .high
            .iter()
            .position(|&high| self.center_frequency(band) < high)
            .unwrap_or(THREE_BAND.high.len() - 1)
    }

    pub fn ensure_compatible(&self, other: &Bands) -> Result<()> {
        if self.layout != other.layout {
            return Err(AcousticsError::BandModelMismatch {
                expected: self.layout,
                actual: other.layout,
            });
        }
        Ok(())
    }
}

impl From<BandLayout> for Bands {
    fn from(layout: BandLayout) -> Self {
        Self::new(layout)
    }
}
