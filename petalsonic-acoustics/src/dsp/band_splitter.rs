use super::iir::{Iir, IirFilterer};
use crate::bands::Bands;

/// Splits a signal into the bands of a [`Bands`] table.
///
/// The first band is a low-pass, the last a high-pass, and every band in
/// between a high-pass followed by a low-pass, scaled by the band-pass norm.
/// Each band keeps its own filter history.
#[derive(Debug, Clone)]
pub struct BandSplitter {
    bands: Bands,
    sections: Vec<[IirFilterer; 2]>,
}

impl BandSplitter {
    pub fn new(bands: Bands, sampling_rate: u32) -> Self {
        let num_bands = bands.num_bands();
        let sections = (0..num_bands)
            .map(|band| {
                let (first, second) = Self::design(&bands, band, sampling_rate);
                [
                    IirFilterer::with_filter(first),
                    IirFilterer::with_filter(second),
                ]
            })
            .collect();

        Self { bands, sections }
    }

    fn design(bands: &Bands, band: usize, sampling_rate: u32) -> (Iir, Iir) {
        let last = bands.num_bands() - 1;
        let low = bands.low_cutoff(band);
        let high = bands.high_cutoff(band);

        if band == 0 {
            (Iir::low_pass(high, sampling_rate), Iir::identity())
        } else if band == last {
            (Iir::high_pass(low, sampling_rate), Iir::identity())
        } else {
            (
                Iir::high_pass(low, sampling_rate).scaled(bands.band_pass_norm(band)),
                Iir::low_pass(high, sampling_rate),
            )
        }
    }

    pub fn bands(&self) -> Bands {
        self.bands
    }

    /// Filters `input` through band `band` into `output`.
    ///
    /// Processes `min(input.len(), output.len())` samples.
    pub fn split(&mut self, input: &[f32], band: usize, output: &mut [f32]) {
        let [first, second] = &mut self.sections[band];
        for (y, &x) in output.iter_mut().zip(input) {
            *y = second.apply_sample(first.apply_sample(x));
        }
    }

    /// Filters `buffer` through band `band` in place.
    pub fn split_in_place(&mut self, band: usize, buffer: &mut [f32]) {
        let [first, second] = &mut self.sections[band];
        for sample in buffer.iter_mut() {
            *sample = second.apply_sample(first.apply_sample(*sample));
        }
    }

    pub fn reset(&mut self) {
        for [first, second] in &mut self.sections {
            first.reset();
            second.reset();
        }
    }
}
