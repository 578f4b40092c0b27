/*
MIT License

Copyright (c) 2025 Ameyanagi
*/

//! Euler angle conventions
//!
//! A convention is the tuple (axis order, composition, reference frame) that
//! fixes how a numeric triplet maps to a physical rotation. Each property is a
//! closed enum, so a [`Convention`] can never hold an ambiguous combination.

use super::errors::{EulerError, Result};
use crate::rotation::{AxisOrder, Composition};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which body the rotation described by a triplet is applied to
///
/// The two descriptions are inverse to one another, so switching between them
/// transposes the rotation matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActsOn {
    /// The triplet rotates the reference into alignment with the particle
    #[serde(alias = "rotate_reference")]
    Reference,
    /// The triplet rotates the particle into alignment with the reference
    #[serde(alias = "rotate_particle")]
    Particle,
}

impl ActsOn {
    /// The opposite reference frame
    pub fn flipped(self) -> Self {
        match self {
            ActsOn::Reference => ActsOn::Particle,
            ActsOn::Particle => ActsOn::Reference,
        }
    }
}

impl FromStr for ActsOn {
    type Err = EulerError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "reference" | "rotate_reference" => Ok(ActsOn::Reference),
            "particle" | "rotate_particle" => Ok(ActsOn::Particle),
            _ => Err(EulerError::InvalidConvention(format!(
                "unknown reference frame '{}' (expected reference or particle)",
                s
            ))),
        }
    }
}

impl fmt::Display for ActsOn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActsOn::Reference => write!(f, "reference"),
            ActsOn::Particle => write!(f, "particle"),
        }
    }
}

/// An immutable euler angle convention
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Convention {
    axis_order: AxisOrder,
    composition: Composition,
    acts_on: ActsOn,
}

impl Convention {
    /// Create a convention from fully specified properties
    pub fn new(axis_order: AxisOrder, composition: Composition, acts_on: ActsOn) -> Self {
        Self {
            axis_order,
            composition,
            acts_on,
        }
    }

    /// Create a convention from an axis string and partially specified flags
    ///
    /// A single composition flag is enough: the other is taken as its
    /// negation. Both flags missing, both flags agreeing (e.g. intrinsic and
    /// extrinsic both true), or a missing reference frame is rejected.
    ///
    /// # Arguments
    ///
    /// * `axes` - Axis order string such as `"ZXZ"`
    /// * `intrinsic` - Whether rotations are intrinsic, if known
    /// * `extrinsic` - Whether rotations are extrinsic, if known
    /// * `acts_on` - Reference frame, if known
    pub fn from_flags(
        axes: &str,
        intrinsic: Option<bool>,
        extrinsic: Option<bool>,
        acts_on: Option<ActsOn>,
    ) -> Result<Self> {
        let axis_order: AxisOrder = axes.parse()?;

        let composition = match (intrinsic, extrinsic) {
            (Some(true), None) | (None, Some(false)) | (Some(true), Some(false)) => {
                Composition::Intrinsic
            }
            (Some(false), None) | (None, Some(true)) | (Some(false), Some(true)) => {
                Composition::Extrinsic
            }
            (None, None) => {
                return Err(EulerError::UnderspecifiedConvention(
                    "neither intrinsic nor extrinsic was specified".to_string(),
                ))
            }
            (Some(i), Some(e)) => {
                return Err(EulerError::UnderspecifiedConvention(format!(
                    "intrinsic={} and extrinsic={} contradict each other",
                    i, e
                )))
            }
        };

        let acts_on = acts_on.ok_or_else(|| {
            EulerError::UnderspecifiedConvention(
                "reference frame (reference or particle) was not specified".to_string(),
            )
        })?;

        Ok(Self::new(axis_order, composition, acts_on))
    }

    pub fn axis_order(&self) -> AxisOrder {
        self.axis_order
    }

    pub fn composition(&self) -> Composition {
        self.composition
    }

    pub fn acts_on(&self) -> ActsOn {
        self.acts_on
    }
}

impl fmt::Display for Convention {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} (rotates {})",
            self.axis_order, self.composition, self.acts_on
        )
    }
}
