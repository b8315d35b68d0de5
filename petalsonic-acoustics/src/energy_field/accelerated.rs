use super::{
    ComputeDevice, DeviceBuffer, EnergyField, EnergyFieldBackend, EnergyFieldSettings,
    EnergyHistogram, FieldShape, is_valid_contribution,
};
use crate::error::{AcousticsError, Result};
use std::sync::Arc;

/// Energy field stored in a compute device's memory.
///
/// The device is shared; the buffer belongs to this field alone.
pub struct AcceleratedEnergyField {
    settings: EnergyFieldSettings,
    shape: FieldShape,
    device: Arc<dyn ComputeDevice>,
    buffer: Box<dyn DeviceBuffer>,
}

impl AcceleratedEnergyField {
    pub fn new(settings: EnergyFieldSettings, device: Arc<dyn ComputeDevice>) -> Result<Self> {
        settings.validate()?;

        if !device.is_valid() {
            return Err(AcousticsError::Device(format!(
                "Device '{}' is not valid",
                device.name()
            )));
        }
        if !device.supports_energy_fields() {
            return Err(AcousticsError::Device(format!(
                "Device '{}' does not support energy fields",
                device.name()
            )));
        }

        let shape = FieldShape::of(&settings);
        let buffer = device.allocate(shape.len())?;
        if buffer.len() != shape.len() {
            return Err(AcousticsError::Allocation(format!(
                "Device '{}' returned {} elements, requested {}",
                device.name(),
                buffer.len(),
                shape.len()
            )));
        }
        buffer.zero();

        log::info!(
            "Created accelerated energy field on '{}': {} bands, {} terms, {} bins",
            device.name(),
            shape.num_bands,
            shape.num_terms,
            shape.num_bins
        );

        Ok(Self {
            settings,
            shape,
            device,
            buffer,
        })
    }

    pub fn device(&self) -> &Arc<dyn ComputeDevice> {
        &self.device
    }
}

impl EnergyField for AcceleratedEnergyField {
    fn settings(&self) -> &EnergyFieldSettings {
        &self.settings
    }

    fn backend(&self) -> EnergyFieldBackend {
        EnergyFieldBackend::Accelerated
    }

    fn energy(&self, band: usize, term: usize, bin: usize) -> f32 {
        self.shape
            .index(band, term, bin)
            .map_or(0.0, |i| self.buffer.read(i))
    }

    fn accumulate(&self, band: usize, term: usize, bin: usize, value: f32) {
        if !is_valid_contribution(value) {
            log::trace!("Dropping invalid energy contribution {}", value);
            return;
        }
        if let Some(i) = self.shape.index(band, term, bin) {
            self.buffer.accumulate(i, value);
        }
    }

    fn reset(&self) {
        self.buffer.zero();
    }

    fn finalize(self: Box<Self>) -> EnergyHistogram {
        let mut data = vec![0.0; self.shape.len()];
        if let Err(e) = self.buffer.copy_to_host(&mut data) {
            // Fall back to per-element reads if the bulk copy is refused.
            log::warn!("Bulk copy from '{}' failed: {}", self.device.name(), e);
            for (i, value) in data.iter_mut().enumerate() {
                *value = self.buffer.read(i);
            }
        }
        EnergyHistogram::from_raw(self.settings, data)
    }
}
