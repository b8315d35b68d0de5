use super::{AcceleratedEnergyField, ComputeDevice, CpuEnergyField, EnergyField, EnergyFieldSettings};
use crate::error::Result;
use crate::scene::SceneType;
use std::sync::Arc;

/// Picks the storage backend for new energy fields.
pub struct EnergyFieldFactory;

impl EnergyFieldFactory {
    /// Creates a zeroed field ready for accumulation.
    ///
    /// Accelerated scenes get a device-resident field when `device` is
    /// present, valid and able to hold energy fields. Every other case, and
    /// any device failure, yields a CPU field.
    ///
    /// # Errors
    ///
    /// Returns [`AcousticsError::Configuration`](crate::AcousticsError::Configuration)
    /// when `settings` is invalid.
    pub fn create(
        settings: EnergyFieldSettings,
        scene_type: SceneType,
        device: Option<&Arc<dyn ComputeDevice>>,
    ) -> Result<Box<dyn EnergyField>> {
        settings.validate()?;

        if scene_type == SceneType::Accelerated {
            match device {
                Some(device) => match AcceleratedEnergyField::new(settings, Arc::clone(device)) {
                    Ok(field) => return Ok(Box::new(field)),
                    Err(e) => {
                        log::warn!("Falling back to CPU energy field: {}", e);
                    }
                },
                None => {
                    log::warn!("Accelerated scene without a compute device, using CPU energy field");
                }
            }
        }

        Ok(Box::new(CpuEnergyField::new(settings)?))
    }
}
