use super::atomic_add_f32;
use crate::error::{AcousticsError, Result};
use std::sync::atomic::{AtomicU32, Ordering};

/// Handle to an accelerator that can hold energy fields.
///
/// Devices are shared between fields and simulators through `Arc`.
pub trait ComputeDevice: Send + Sync {
    fn name(&self) -> &str;

    /// False once the device has been lost or was never initialized.
    fn is_valid(&self) -> bool;

    fn supports_energy_fields(&self) -> bool;

    /// Allocates a zeroed buffer of `len` floats.
    fn allocate(&self, len: usize) -> Result<Box<dyn DeviceBuffer>>;
}

/// Device-resident array of floats owned by exactly one energy field.
pub trait DeviceBuffer: Send + Sync {
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Atomically adds `value` to element `index`.
    fn accumulate(&self, index: usize, value: f32);

    fn read(&self, index: usize) -> f32;

    fn zero(&self);

    /// Copies the whole buffer into `host`, which must have `len()` elements.
    fn copy_to_host(&self, host: &mut [f32]) -> Result<()>;
}

/// A compute device emulated in host memory.
///
/// Useful where no accelerator is present but code paths for accelerated
/// fields still need to run.
#[derive(Debug, Clone)]
pub struct SoftwareDevice {
    name: String,
    max_elements: Option<usize>,
}

impl SoftwareDevice {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            max_elements: None,
        }
    }

    /// Caps the size of a single allocation; larger requests fail.
    pub fn with_max_elements(mut self, max_elements: usize) -> Self {
        self.max_elements = Some(max_elements);
        self
    }
}

impl Default for SoftwareDevice {
    fn default() -> Self {
        Self::new("software")
    }
}

impl ComputeDevice for SoftwareDevice {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_valid(&self) -> bool {
        true
    }

    fn supports_energy_fields(&self) -> bool {
        true
    }

    fn allocate(&self, len: usize) -> Result<Box<dyn DeviceBuffer>> {
        if let Some(max) = self.max_elements {
            if len > max {
                return Err(AcousticsError::Allocation(format!(
                    "Device '{}' cannot allocate {} elements (limit {})",
                    self.name, len, max
                )));
            }
        }

        log::debug!("Device '{}' allocated {} elements", self.name, len);

        Ok(Box::new(SoftwareBuffer {
            cells: (0..len).map(|_| AtomicU32::new(0.0f32.to_bits())).collect(),
        }))
    }
}

struct SoftwareBuffer {
    cells: Vec<AtomicU32>,
}

impl DeviceBuffer for SoftwareBuffer {
    fn len(&self) -> usize {
        self.cells.len()
    }

    fn accumulate(&self, index: usize, value: f32) {
        if let Some(cell) = self.cells.get(index) {
            atomic_add_f32(cell, value);
        }
    }

    fn read(&self, index: usize) -> f32 {
        self.cells
            .get(index)
            .map_or(0.0, |cell| f32::from_bits(cell.load(Ordering::Acquire)))
    }

    fn zero(&self) {
        for cell in &self.cells {
            cell.store(0.0f32.to_bits(), Ordering::Release);
        }
    }

    fn copy_to_host(&self, host: &mut [f32]) -> Result<()> {
        if host.len() != self.cells.len() {
            return Err(AcousticsError::Device(format!(
                "Host buffer has {} elements, device buffer has {}",
                host.len(),
                self.cells.len()
            )));
        }
        for (dst, cell) in host.iter_mut().zip(&self.cells) {
            *dst = f32::from_bits(cell.load(Ordering::Acquire));
        }
        Ok(())
    }
}
