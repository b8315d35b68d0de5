//! Surface materials.
//!
//! Material coefficients are authored for three reference bands centred at
//! 400 Hz, 2.5 kHz and 15 kHz. They are mapped onto whichever band layout the
//! simulation runs with by looking up the reference band that contains each
//! band's centre frequency.

use crate::bands::Bands;
use crate::error::{AcousticsError, Result};

/// Number of authored frequency bands per material.
pub const NUM_MATERIAL_BANDS: usize = 3;

/// How a surface absorbs, scatters and transmits sound.
///
/// # Example
///
/// ```
/// use petalsonic_acoustics::scene::AcousticMaterial;
///
/// let wall = AcousticMaterial::CONCRETE;
/// let curtain = AcousticMaterial {
///     absorption: [0.30, 0.60, 0.70],
///     scattering: 0.40,
///     transmission: [0.20, 0.10, 0.05],
/// };
/// assert!(wall.validate().is_ok());
/// assert!(curtain.validate().is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AcousticMaterial {
    /// Fraction of incident energy absorbed at [low, mid, high].
    pub absorption: [f32; NUM_MATERIAL_BANDS],

    /// Fraction of reflected energy sent in a random direction rather than
    /// the mirror direction.
    pub scattering: f32,

    /// Fraction of incident energy passing through the surface at
    /// [low, mid, high].
    pub transmission: [f32; NUM_MATERIAL_BANDS],
}

impl AcousticMaterial {
    pub const GENERIC: Self = Self {
        absorption: [0.10, 0.20, 0.30],
        scattering: 0.05,
        transmission: [0.100, 0.050, 0.030],
    };

    pub const BRICK: Self = Self {
        absorption: [0.03, 0.04, 0.07],
        scattering: 0.05,
        transmission: [0.015, 0.015, 0.015],
    };

    pub const CONCRETE: Self = Self {
        absorption: [0.05, 0.07, 0.08],
        scattering: 0.05,
        transmission: [0.015, 0.002, 0.001],
    };

    pub const CERAMIC: Self = Self {
        absorption: [0.01, 0.02, 0.02],
        scattering: 0.05,
        transmission: [0.060, 0.044, 0.011],
    };

    pub const GRAVEL: Self = Self {
        absorption: [0.60, 0.70, 0.80],
        scattering: 0.05,
        transmission: [0.031, 0.012, 0.008],
    };

    pub const CARPET: Self = Self {
        absorption: [0.24, 0.69, 0.73],
        scattering: 0.05,
        transmission: [0.020, 0.005, 0.003],
    };

    pub const GLASS: Self = Self {
        absorption: [0.06, 0.03, 0.02],
        scattering: 0.05,
        transmission: [0.060, 0.044, 0.011],
    };

    pub const PLASTER: Self = Self {
        absorption: [0.12, 0.06, 0.04],
        scattering: 0.05,
        transmission: [0.056, 0.056, 0.004],
    };

    pub const WOOD: Self = Self {
        absorption: [0.11, 0.07, 0.06],
        scattering: 0.05,
        transmission: [0.070, 0.014, 0.005],
    };

    pub const METAL: Self = Self {
        absorption: [0.20, 0.07, 0.06],
        scattering: 0.05,
        transmission: [0.200, 0.025, 0.010],
    };

    pub const ROCK: Self = Self {
        absorption: [0.13, 0.20, 0.24],
        scattering: 0.05,
        transmission: [0.015, 0.002, 0.001],
    };

    /// A surface absorbing `absorption` of the energy in every band, with no
    /// scattering or transmission.
    pub fn uniform(absorption: f32) -> Self {
        Self {
            absorption: [absorption; NUM_MATERIAL_BANDS],
            scattering: 0.0,
            transmission: [0.0; NUM_MATERIAL_BANDS],
        }
    }

    /// Checks every coefficient lies in [0, 1].
    pub fn validate(&self) -> Result<()> {
        let in_range = |v: f32| (0.0..=1.0).contains(&v);

        if !self.absorption.iter().copied().all(in_range) {
            return Err(AcousticsError::Configuration(format!(
                "Absorption must be within [0, 1], got {:?}",
                self.absorption
            )));
        }
        if !in_range(self.scattering) {
            return Err(AcousticsError::Configuration(format!(
                "Scattering must be within [0, 1], got {}",
                self.scattering
            )));
        }
        if !self.transmission.iter().copied().all(in_range) {
            return Err(AcousticsError::Configuration(format!(
                "Transmission must be within [0, 1], got {:?}",
                self.transmission
            )));
        }

        Ok(())
    }

    /// Absorption coefficient for `band` of `bands`.
    pub fn absorption_for(&self, bands: &Bands, band: usize) -> f32 {
        self.absorption[bands.reference_band(band)]
    }

    pub fn transmission_for(&self, bands: &Bands, band: usize) -> f32 {
        self.transmission[bands.reference_band(band)]
    }

    /// Fraction of incident energy reflected back into the room in `band`.
    pub fn reflectance_for(&self, bands: &Bands, band: usize) -> f32 {
        (1.0 - self.absorption_for(bands, band)).max(0.0)
    }
}

impl Default for AcousticMaterial {
    fn default() -> Self {
        Self::GENERIC
    }
}

/// Materials addressed by the `u8` index a ray tracer reports.
#[derive(Debug, Clone, Default)]
pub struct MaterialTable {
    materials: Vec<AcousticMaterial>,
}

impl MaterialTable {
    pub const MAX_MATERIALS: usize = 256;

    pub fn new() -> Self {
        Self::default()
    }

    /// A table holding every preset, in this order: GENERIC, BRICK, CONCRETE,
    /// CERAMIC, GRAVEL, CARPET, GLASS, PLASTER, WOOD, METAL, ROCK.
    pub fn with_presets() -> Self {
        Self {
            materials: vec![
                AcousticMaterial::GENERIC,
                AcousticMaterial::BRICK,
                AcousticMaterial::CONCRETE,
                AcousticMaterial::CERAMIC,
                AcousticMaterial::GRAVEL,
                AcousticMaterial::CARPET,
                AcousticMaterial::GLASS,
                AcousticMaterial::PLASTER,
                AcousticMaterial::WOOD,
                AcousticMaterial::METAL,
                AcousticMaterial::ROCK,
            ],
        }
    }

    /// Adds a material and returns its index.
    pub fn add(&mut self, material: AcousticMaterial) -> Result<u8> {
        material.validate()?;

        if self.materials.len() >= Self::MAX_MATERIALS {
            return Err(AcousticsError::Configuration(format!(
                "Material table is full ({} materials)",
                Self::MAX_MATERIALS
            )));
        }

        let index = self.materials.len() as u8;
        self.materials.push(material);
        Ok(index)
    }

    pub fn get(&self, index: u8) -> Option<&AcousticMaterial> {
        self.materials.get(index as usize)
    }

    /// Like [`get`](Self::get), but unknown indices resolve to
    /// [`AcousticMaterial::GENERIC`].
    pub fn get_or_generic(&self, index: u8) -> &AcousticMaterial {
        self.get(index).unwrap_or(&AcousticMaterial::GENERIC)
    }

    pub fn len(&self) -> usize {
        self.materials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (u8, &AcousticMaterial)> {
        self.materials.iter().enumerate().map(|(i, m)| (i as u8, m))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bands::BandLayout;

    #[test]
    fn test_material_validation() {
        assert!(AcousticMaterial::CONCRETE.validate().is_ok());

        let bad_absorption = AcousticMaterial {
            absorption: [0.5, 1.5, 0.3],
            ..AcousticMaterial::GENERIC
        };
        assert!(bad_absorption.validate().is_err());

        let bad_scattering = AcousticMaterial {
            scattering: -0.1,
            ..AcousticMaterial::GENERIC
        };
        assert!(bad_scattering.validate().is_err());

        let bad_transmission = AcousticMaterial {
            transmission: [0.0, f32::NAN, 0.0],
            ..AcousticMaterial::GENERIC
        };
        assert!(bad_transmission.validate().is_err());
    }

    #[test]
    fn test_band_mapping() {
        let three = Bands::new(BandLayout::ThreeBand);
        let carpet = AcousticMaterial::CARPET;
        for band in 0..3 {
            assert_eq!(carpet.absorption_for(&three, band), carpet.absorption[band]);
        }

        let octave = Bands::new(BandLayout::Octave);
        // 22 Hz and 500 Hz centres read the low coefficient.
        assert_eq!(carpet.absorption_for(&octave, 0), 0.24);
        assert_eq!(carpet.absorption_for(&octave, 4), 0.24);
        // 2 kHz reads mid, 16 kHz reads high.
        assert_eq!(carpet.absorption_for(&octave, 6), 0.69);
        assert_eq!(carpet.absorption_for(&octave, 9), 0.73);

        assert!((carpet.reflectance_for(&three, 0) - 0.76).abs() < 1e-6);
        assert_eq!(carpet.transmission_for(&three, 2), 0.003);
    }

    #[test]
    fn test_material_table() {
        let mut table = MaterialTable::new();
        assert!(table.is_empty());

        let concrete = table.add(AcousticMaterial::CONCRETE).unwrap();
        let wood = table.add(AcousticMaterial::WOOD).unwrap();
        assert_eq!((concrete, wood), (0, 1));
        assert_eq!(table.len(), 2);
        assert_eq!(table.get(wood), Some(&AcousticMaterial::WOOD));
        assert_eq!(table.get(99), None);
        assert_eq!(table.get_or_generic(99), &AcousticMaterial::GENERIC);

        assert!(table.add(AcousticMaterial::uniform(2.0)).is_err());
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_material_table_full() {
        let mut table = MaterialTable::new();
        for _ in 0..MaterialTable::MAX_MATERIALS {
            table.add(AcousticMaterial::GENERIC).unwrap();
        }
        assert!(table.add(AcousticMaterial::GENERIC).is_err());
    }

    #[test]
    fn test_presets() {
        let table = MaterialTable::with_presets();
        assert_eq!(table.len(), 11);
        assert_eq!(table.get(2), Some(&AcousticMaterial::CONCRETE));
        assert_eq!(table.get(8), Some(&AcousticMaterial::WOOD));
        assert!(table.iter().all(|(_, m)| m.validate().is_ok()));
    }
}
