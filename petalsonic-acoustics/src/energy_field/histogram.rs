use super::{BIN_DURATION, EnergyFieldSettings, FieldShape};
use crate::bands::Bands;
use crate::error::{AcousticsError, Result};

/// Finalized, read-only energy field.
///
/// Arithmetic helpers operate over the overlap of two histograms: the smaller
/// of their term counts and bin counts. Band layouts must match.
#[derive(Debug, Clone, PartialEq)]
pub struct EnergyHistogram {
    settings: EnergyFieldSettings,
    shape: FieldShape,
    data: Vec<f32>,
}

impl EnergyHistogram {
    pub(crate) fn from_raw(settings: EnergyFieldSettings, data: Vec<f32>) -> Self {
        let shape = FieldShape::of(&settings);
        debug_assert_eq!(data.len(), shape.len());
        Self {
            settings,
            shape,
            data,
        }
    }

    pub fn zeroed(settings: EnergyFieldSettings) -> Result<Self> {
        settings.validate()?;
        let len = FieldShape::of(&settings).len();
        Ok(Self::from_raw(settings, vec![0.0; len]))
    }

    /// Builds a histogram cell by cell from `f(band, term, bin)`.
    pub fn from_fn<F>(settings: EnergyFieldSettings, mut f: F) -> Result<Self>
    where
        F: FnMut(usize, usize, usize) -> f32,
    {
        let mut histogram = Self::zeroed(settings)?;
        let shape = histogram.shape;
        for band in 0..shape.num_bands {
            for term in 0..shape.num_terms {
                let row = histogram.band_mut(band, term);
                for (bin, value) in row.iter_mut().enumerate() {
                    *value = f(band, term, bin);
                }
            }
        }
        Ok(histogram)
    }

    pub fn settings(&self) -> &EnergyFieldSettings {
        &self.settings
    }

    pub fn bands(&self) -> Bands {
        self.settings.bands()
    }

    pub fn num_bands(&self) -> usize {
        self.shape.num_bands
    }

    pub fn num_terms(&self) -> usize {
        self.shape.num_terms
    }

    pub fn num_bins(&self) -> usize {
        self.shape.num_bins
    }

    pub fn duration(&self) -> f32 {
        self.settings.duration
    }

    pub fn bin_duration(&self) -> f32 {
        BIN_DURATION
    }

    pub fn energy(&self, band: usize, term: usize, bin: usize) -> f32 {
        self.shape.index(band, term, bin).map_or(0.0, |i| self.data[i])
    }

    /// All bins of one band and term.
    pub fn band(&self, band: usize, term: usize) -> &[f32] {
        let start = (band * self.shape.num_terms + term) * self.shape.num_bins;
        &self.data[start..start + self.shape.num_bins]
    }

    fn band_mut(&mut self, band: usize, term: usize) -> &mut [f32] {
        let start = (band * self.shape.num_terms + term) * self.shape.num_bins;
        &mut self.data[start..start + self.shape.num_bins]
    }

    /// Sum of the omnidirectional term over all bins of `band`.
    pub fn total_energy(&self, band: usize) -> f32 {
        self.band(band, 0).iter().sum()
    }

    /// Sum of `a` and `b` over their overlap, shaped like `a`.
    pub fn add(a: &EnergyHistogram, b: &EnergyHistogram) -> Result<EnergyHistogram> {
        let mut out = a.clone();
        out.scale_accumulate(b, 1.0)?;
        Ok(out)
    }

    /// Multiplies every cell by `factor`, which must be finite and
    /// non-negative so that energies stay non-negative.
    pub fn scale(&mut self, factor: f32) -> Result<()> {
        check_scale_factor(factor)?;
        for value in &mut self.data {
            *value *= factor;
        }
        Ok(())
    }

    /// `self += factor * other` over the overlap. `factor` must be finite and
    /// non-negative.
    pub fn scale_accumulate(&mut self, other: &EnergyHistogram, factor: f32) -> Result<()> {
        self.bands().ensure_compatible(&other.bands())?;
        check_scale_factor(factor)?;
        self.zip_overlap(other, |dst, src| *dst += factor * src);
        Ok(())
    }

    /// Copies the overlap of `other` into `self`; the rest of `self` is kept.
    pub fn copy_from(&mut self, other: &EnergyHistogram) -> Result<()> {
        self.bands().ensure_compatible(&other.bands())?;
        self.zip_overlap(other, |dst, src| *dst = src);
        Ok(())
    }

    fn zip_overlap(&mut self, other: &EnergyHistogram, mut op: impl FnMut(&mut f32, f32)) {
        let num_terms = self.num_terms().min(other.num_terms());
        let num_bins = self.num_bins().min(other.num_bins());

        for band in 0..self.num_bands() {
            for term in 0..num_terms {
                let src = other.band(band, term);
                let dst = self.band_mut(band, term);
                for (d, &s) in dst[..num_bins].iter_mut().zip(&src[..num_bins]) {
                    op(d, s);
                }
            }
        }
    }

    /// Stretches the decay of each band by `ratios[band]` while keeping the
    /// band's total energy.
    ///
    /// Bins after the peak of the omnidirectional term are remapped as
    /// `peak * (e / peak)^(1 / ratio)`; every term of a bin is scaled by the
    /// same factor, so directional balance is preserved.
    pub fn apply_reverb_scale(&mut self, ratios: &[f32]) -> Result<()> {
        if ratios.len() != self.num_bands() {
            return Err(AcousticsError::Configuration(format!(
                "Expected {} reverb scale ratios, got {}",
                self.num_bands(),
                ratios.len()
            )));
        }
        if let Some(bad) = ratios.iter().find(|r| !r.is_finite() || **r <= 0.0) {
            return Err(AcousticsError::Configuration(format!(
                "Reverb scale ratios must be positive, got {}",
                bad
            )));
        }

        let num_terms = self.num_terms();
        for (band, &ratio) in ratios.iter().enumerate() {
            let omni = self.band(band, 0);
            let (peak_bin, peak_energy) = omni
                .iter()
                .copied()
                .enumerate()
                .fold((0, 0.0f32), |best, (i, e)| if e > best.1 { (i, e) } else { best });

            if peak_energy <= 0.0 {
                continue;
            }

            let old_total = self.total_energy(band);

            let scalars: Vec<f32> = self.band(band, 0)[peak_bin..]
                .iter()
                .map(|&old| {
                    if old <= 0.0 {
                        1.0
                    } else {
                        peak_energy * (old / peak_energy).powf(1.0 / ratio) / old
                    }
                })
                .collect();

            for term in 0..num_terms {
                let row = self.band_mut(band, term);
                for (value, scalar) in row[peak_bin..].iter_mut().zip(&scalars) {
                    *value *= scalar;
                }
            }

            let new_total = self.total_energy(band);
            let normalization = if new_total > 0.0 {
                old_total / new_total
            } else {
                1.0
            };
            for term in 0..num_terms {
                for value in self.band_mut(band, term) {
                    *value *= normalization;
                }
            }
        }

        Ok(())
    }
}

fn check_scale_factor(factor: f32) -> Result<()> {
    if !factor.is_finite() || factor < 0.0 {
        return Err(AcousticsError::Configuration(format!(
            "Scale factor must be finite and non-negative, got {}",
            factor
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bands::BandLayout;

    fn settings(duration: f32, order: u32) -> EnergyFieldSettings {
        EnergyFieldSettings::new(duration, order, BandLayout::ThreeBand)
    }

    #[test]
    fn test_add_uses_overlap() {
        let a = EnergyHistogram::from_fn(settings(0.05, 1), |_, _, _| 1.0).unwrap();
        let b = EnergyHistogram::from_fn(settings(0.03, 0), |_, _, _| 2.0).unwrap();

        let sum = EnergyHistogram::add(&a, &b).unwrap();
        assert_eq!(sum.num_bins(), 5);
        assert_eq!(sum.energy(0, 0, 0), 3.0);
        assert_eq!(sum.energy(0, 0, 2), 3.0);
        assert_eq!(sum.energy(0, 0, 3), 1.0);
        // Term 1 is outside b.
        assert_eq!(sum.energy(0, 1, 0), 1.0);
    }

    #[test]
    fn test_scale_and_scale_accumulate() {
        let mut a = EnergyHistogram::from_fn(settings(0.05, 0), |band, _, bin| (band + bin) as f32)
            .unwrap();
        let b = EnergyHistogram::from_fn(settings(0.05, 0), |_, _, _| 1.0).unwrap();

        a.scale(2.0).unwrap();
        assert_eq!(a.energy(1, 0, 2), 6.0);

        a.scale_accumulate(&b, 0.5).unwrap();
        assert_eq!(a.energy(1, 0, 2), 6.5);
    }

    #[test]
    fn test_negative_scale_factors_rejected() {
        let mut a = EnergyHistogram::from_fn(settings(0.05, 0), |_, _, _| 1.0).unwrap();
        let b = a.clone();

        for factor in [-1.0, f32::NAN, f32::INFINITY] {
            assert!(matches!(a.scale(factor), Err(AcousticsError::Configuration(_))));
            assert!(matches!(
                a.scale_accumulate(&b, factor),
                Err(AcousticsError::Configuration(_))
            ));
        }
        assert_eq!(a, b);

        a.scale(0.0).unwrap();
        assert_eq!(a.total_energy(0), 0.0);
    }

    #[test]
    fn test_copy_from_keeps_rest() {
        let mut a = EnergyHistogram::from_fn(settings(0.05, 0), |_, _, _| 1.0).unwrap();
        let b = EnergyHistogram::from_fn(settings(0.02, 0), |_, _, _| 5.0).unwrap();
        a.copy_from(&b).unwrap();
        assert_eq!(a.band(2, 0), &[5.0, 5.0, 1.0, 1.0, 1.0]);
    }

    #[test]
    fn test_band_layout_mismatch() {
        let mut a = EnergyHistogram::zeroed(settings(0.05, 0)).unwrap();
        let b = EnergyHistogram::zeroed(
            EnergyFieldSettings::new(0.05, 0, BandLayout::Octave),
        )
        .unwrap();
        assert!(matches!(
            a.copy_from(&b),
            Err(AcousticsError::BandModelMismatch { .. })
        ));
        assert!(EnergyHistogram::add(&a, &b).is_err());
    }

    #[test]
    fn test_reverb_scale_preserves_total_energy() {
        let mut h = EnergyHistogram::from_fn(settings(1.0, 1), |band, term, bin| {
            let decay = (-(bin as f32) * 0.1 * (band + 1) as f32).exp();
            if term == 0 { decay } else { 0.5 * decay }
        })
        .unwrap();

        let before: Vec<f32> = (0..3).map(|b| h.total_energy(b)).collect();
        h.apply_reverb_scale(&[2.0, 1.0, 0.5]).unwrap();

        for band in 0..3 {
            let after = h.total_energy(band);
            assert!((after - before[band]).abs() / before[band] < 1e-3);
        }
        // Directional balance is kept.
        assert!((h.energy(0, 1, 10) - 0.5 * h.energy(0, 0, 10)).abs() < 1e-6);

        assert!(h.apply_reverb_scale(&[1.0]).is_err());
        assert!(h.apply_reverb_scale(&[1.0, 0.0, 1.0]).is_err());
    }
}
