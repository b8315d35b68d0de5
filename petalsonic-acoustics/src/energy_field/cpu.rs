use super::{
    EnergyField, EnergyFieldBackend, EnergyFieldSettings, EnergyHistogram, FieldShape,
    atomic_add_f32, is_valid_contribution,
};
use crate::error::Result;
use std::sync::atomic::{AtomicU32, Ordering};

/// Energy field stored in host memory.
pub struct CpuEnergyField {
    settings: EnergyFieldSettings,
    shape: FieldShape,
    cells: Vec<AtomicU32>,
}

impl CpuEnergyField {
    pub fn new(settings: EnergyFieldSettings) -> Result<Self> {
        settings.validate()?;

        let shape = FieldShape::of(&settings);
        let cells = (0..shape.len())
            .map(|_| AtomicU32::new(0.0f32.to_bits()))
            .collect();

        log::info!(
            "Created CPU energy field: {} bands, {} terms, {} bins",
            shape.num_bands,
            shape.num_terms,
            shape.num_bins
        );

        Ok(Self {
            settings,
            shape,
            cells,
        })
    }
}

impl EnergyField for CpuEnergyField {
    fn settings(&self) -> &EnergyFieldSettings {
        &self.settings
    }

    fn backend(&self) -> EnergyFieldBackend {
        EnergyFieldBackend::Cpu
    }

    fn energy(&self, band: usize, term: usize, bin: usize) -> f32 {
        self.shape
            .index(band, term, bin)
            .map_or(0.0, |i| f32::from_bits(self.cells[i].load(Ordering::Acquire)))
    }

    fn accumulate(&self, band: usize, term: usize, bin: usize, value: f32) {
        if !is_valid_contribution(value) {
            log::trace!("Dropping invalid energy contribution {}", value);
            return;
        }
        match self.shape.index(band, term, bin) {
            Some(i) => atomic_add_f32(&self.cells[i], value),
            None => log::trace!("Dropping energy outside field at ({band}, {term}, {bin})"),
        }
    }

    fn reset(&self) {
        for cell in &self.cells {
            cell.store(0.0f32.to_bits(), Ordering::Release);
        }
    }

    fn finalize(self: Box<Self>) -> EnergyHistogram {
        let this = *self;
        let data = this
            .cells
            .into_iter()
            .map(|cell| f32::from_bits(cell.into_inner()))
            .collect();
        EnergyHistogram::from_raw(this.settings, data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bands::BandLayout;
    use crate::error::AcousticsError;

    fn settings() -> EnergyFieldSettings {
        EnergyFieldSettings::new(0.5, 1, BandLayout::ThreeBand)
    }

    #[test]
    fn test_created_zeroed() {
        let field = CpuEnergyField::new(settings()).unwrap();
        assert_eq!(field.backend(), EnergyFieldBackend::Cpu);
        assert_eq!(field.num_bins(), 50);
        for band in 0..field.num_bands() {
            for term in 0..field.num_terms() {
                for bin in 0..field.num_bins() {
                    assert_eq!(field.energy(band, term, bin), 0.0);
                }
            }
        }
    }

    #[test]
    fn test_invalid_settings_rejected() {
        let result = CpuEnergyField::new(settings().duration(0.0));
        assert!(matches!(result, Err(AcousticsError::Configuration(_))));
    }

    #[test]
    fn test_ignores_invalid_contributions() {
        let field = CpuEnergyField::new(settings()).unwrap();
        field.accumulate(0, 0, 0, -1.0);
        field.accumulate(0, 0, 0, f32::NAN);
        field.accumulate(9, 0, 0, 1.0);
        field.accumulate(0, 0, 50, 1.0);
        assert_eq!(field.energy(0, 0, 0), 0.0);
        assert_eq!(field.energy(9, 0, 0), 0.0);
    }

    #[test]
    fn test_concurrent_accumulation_is_order_independent() {
        let field = CpuEnergyField::new(settings()).unwrap();
        let num_threads = 8;
        let per_thread = 1000;

        std::thread::scope(|scope| {
            for t in 0..num_threads {
                let field = &field;
                scope.spawn(move || {
                    for i in 0..per_thread {
                        // Multiples of 0.25 sum exactly in f32.
                        let value = 0.25 * ((t + i) % 4) as f32;
                        field.accumulate(1, 2, 7, value);
                        field.accumulate(0, 0, i % 50, 1.0);
                    }
                });
            }
        });

        let expected: f32 = (0..num_threads)
            .flat_map(|t| (0..per_thread).map(move |i| 0.25 * ((t + i) % 4) as f32))
            .sum();
        assert_eq!(field.energy(1, 2, 7), expected);

        let total: f32 = (0..50).map(|bin| field.energy(0, 0, bin)).sum();
        assert_eq!(total, (num_threads * per_thread) as f32);
    }

    #[test]
    fn test_reset_and_finalize() {
        let field = Box::new(CpuEnergyField::new(settings()).unwrap());
        field.accumulate(2, 0, 3, 4.0);
        field.reset();
        assert_eq!(field.energy(2, 0, 3), 0.0);

        field.accumulate(2, 0, 3, 2.0);
        let histogram = field.finalize();
        assert_eq!(histogram.energy(2, 0, 3), 2.0);
        assert_eq!(histogram.num_bins(), 50);
    }
}
