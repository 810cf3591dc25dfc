//! Cherry MX compatible stem: a cylinder with a plus-shaped hole through it.

use crate::errors::{KeycapError, Result};
use crate::float_types::Real;
use crate::mesh::{Mesh, shapes};
use crate::traits::BooleanEngine;
use std::fmt;
use std::str::FromStr;
use tracing::{debug, info, instrument};

/// Switch mount family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum StemType {
    #[default]
    CherryMx,
    /// Shell only; no stem is built or combined
    None,
}

impl StemType {
    pub const ALL: [StemType; 2] = [StemType::CherryMx, StemType::None];

    pub const fn name(self) -> &'static str {
        match self {
            StemType::CherryMx => "CHERRY_MX",
            StemType::None => "NONE",
        }
    }
}

impl fmt::Display for StemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for StemType {
    type Err = KeycapError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "CHERRY_MX" => Ok(StemType::CherryMx),
            "NONE" => Ok(StemType::None),
            _ => Err(KeycapError::UnsupportedStemType(s.to_string())),
        }
    }
}

/// Stem measurements (mm).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StemDimensions {
    pub outer_radius: Real,
    /// Length of each cross arm, tip to tip
    pub cross_length: Real,
    pub cross_width: Real,
    /// Gap between the stem top and the keycap's outer top
    pub height_clearance: Real,
    /// Total extra height of the cutout prisms, split evenly above and below
    pub cutout_overshoot: Real,
    pub segments: usize,
}

impl Default for StemDimensions {
    fn default() -> Self {
        StemDimensions {
            outer_radius: 2.8,
            cross_length: 4.15,
            cross_width: 1.29,
            height_clearance: 0.5,
            cutout_overshoot: 0.2,
            segments: 64,
        }
    }
}

impl StemDimensions {
    /// Stem height for a keycap whose interior reaches `interior_height`.
    pub fn stem_height(&self, interior_height: Real) -> Real {
        interior_height - self.height_clearance
    }

    /// Area of the plus-shaped hole.
    pub fn cross_area(&self) -> Real {
        2.0 * self.cross_width * self.cross_length - self.cross_width * self.cross_width
    }

    fn check(&self, stem_height: Real) -> Result<()> {
        if !(stem_height > 0.0) {
            return Err(KeycapError::DegenerateProfile {
                what: "stem height",
                value: stem_height,
            });
        }
        if !(self.cross_width > 0.0 && self.cross_width < self.cross_length) {
            return Err(KeycapError::DegenerateProfile {
                what: "cross width",
                value: self.cross_width,
            });
        }
        // An arm reaching the rim would cut the stem into four pieces
        let clearance = self.outer_radius - self.cross_length / 2.0;
        if !(clearance > 0.0) {
            return Err(KeycapError::DegenerateProfile {
                what: "stem wall outside the cross",
                value: clearance,
            });
        }
        Ok(())
    }
}

/// Builds the stem solid with the help of a boolean engine.
#[derive(Debug, Clone, Copy, Default)]
pub struct StemFeatureBuilder {
    pub dimensions: StemDimensions,
}

impl StemFeatureBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub const fn with_dimensions(dimensions: StemDimensions) -> Self {
        StemFeatureBuilder { dimensions }
    }

    /// Build the stem for a keycap `interior_height` mm tall, centred on the
    /// Z axis and standing on z = 0. `StemType::None` yields `Ok(None)`.
    #[instrument(skip(self, engine))]
    pub fn build(
        &self,
        stem_type: StemType,
        interior_height: Real,
        engine: &dyn BooleanEngine,
    ) -> Result<Option<Mesh>> {
        if stem_type == StemType::None {
            debug!("no stem requested");
            return Ok(None);
        }

        let dims = &self.dimensions;
        let height = dims.stem_height(interior_height);
        dims.check(height)?;

        let post = shapes::cylinder(dims.outer_radius, height, dims.segments, 0.0);
        let cutout_height = height + dims.cutout_overshoot;
        let cutout_z = -dims.cutout_overshoot / 2.0;
        let arm_y = shapes::prism(dims.cross_width, dims.cross_length, cutout_height, cutout_z);
        let arm_x = shapes::prism(dims.cross_length, dims.cross_width, cutout_height, cutout_z);

        let stem = engine.subtract(&post, &arm_y)?;
        let stem = engine.subtract(&stem, &arm_x)?;

        info!(
            height,
            vertices = stem.vertex_count(),
            faces = stem.face_count(),
            "stem built"
        );
        Ok(Some(stem))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stem_names_round_trip_through_display() {
        for stem in StemType::ALL {
            assert_eq!(stem.to_string().parse::<StemType>(), Ok(stem));
        }
        assert_eq!("cherry_mx".parse::<StemType>(), Ok(StemType::CherryMx));
        assert_eq!(
            "ALPS".parse::<StemType>(),
            Err(KeycapError::UnsupportedStemType("ALPS".into()))
        );
    }

    #[test]
    fn cross_area_of_the_default_stem() {
        let area = StemDimensions::default().cross_area();
        assert!((area - 9.0429).abs() < 1e-9);
    }

    #[test]
    fn arms_reaching_the_rim_are_rejected() {
        let dims = StemDimensions {
            cross_length: 5.6,
            ..StemDimensions::default()
        };
        assert!(matches!(
            dims.check(8.0),
            Err(KeycapError::DegenerateProfile { .. })
        ));
        assert!(StemDimensions::default().check(8.0).is_ok());
        assert!(StemDimensions::default().check(-0.1).is_err());
    }
}
