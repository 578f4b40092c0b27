/*
MIT License

Copyright (c) 2025 Ameyanagi
*/

//! Euler angle triplets and batch conversion to and from `ndarray`

use super::errors::{EulerError, Result};
use crate::rotation::RotationError;
use ndarray::{Array2, ArrayView2};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Three euler angles in degrees
///
/// Angles are matched positionally to the axes of an axis order, e.g. for
/// Dynamo's ZXZ convention the triplet is `[tdrot, tilt, narot]`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct EulerTriplet([f64; 3]);

impl EulerTriplet {
    /// Create a triplet from three angles in degrees
    pub fn new(first: f64, second: f64, third: f64) -> Self {
        Self([first, second, third])
    }

    /// The three angles in degrees
    pub fn angles(&self) -> [f64; 3] {
        self.0
    }

    /// Angles as a slice
    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    pub fn first(&self) -> f64 {
        self.0[0]
    }

    pub fn second(&self) -> f64 {
        self.0[1]
    }

    pub fn third(&self) -> f64 {
        self.0[2]
    }

    /// Triplet with the first and third angle swapped
    pub fn reversed(&self) -> Self {
        Self([self.0[2], self.0[1], self.0[0]])
    }

    /// Compare angle-wise modulo 360 degrees
    pub fn approx_eq_degrees(&self, other: &Self, tolerance: f64) -> bool {
        self.0
            .iter()
            .zip(other.0.iter())
            .all(|(a, b)| angular_difference(*a, *b) <= tolerance)
    }
}

/// Smallest absolute difference between two angles in degrees
pub fn angular_difference(a: f64, b: f64) -> f64 {
    let diff = (a - b).rem_euclid(360.0);
    diff.min(360.0 - diff)
}

impl From<[f64; 3]> for EulerTriplet {
    fn from(angles: [f64; 3]) -> Self {
        Self(angles)
    }
}

impl From<EulerTriplet> for [f64; 3] {
    fn from(triplet: EulerTriplet) -> Self {
        triplet.0
    }
}

impl TryFrom<&[f64]> for EulerTriplet {
    type Error = EulerError;

    fn try_from(values: &[f64]) -> Result<Self> {
        match values {
            [a, b, c] => Ok(Self([*a, *b, *c])),
            _ => Err(RotationError::InvalidTriplet(format!(
                "expected 3 angles, got {}",
                values.len()
            ))
            .into()),
        }
    }
}

impl fmt::Display for EulerTriplet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.4} {:.4} {:.4}", self.0[0], self.0[1], self.0[2])
    }
}

/// Read an (N, 3) array of angles into triplets, preserving row order
///
/// # Errors
///
/// `InvalidTriplet` if the array does not have exactly three columns.
pub fn triplets_from_array(angles: ArrayView2<f64>) -> Result<Vec<EulerTriplet>> {
    if angles.ncols() != 3 {
        return Err(RotationError::InvalidTriplet(format!(
            "expected an (N, 3) array of angles, got {} columns",
            angles.ncols()
        ))
        .into());
    }

    Ok(angles
        .rows()
        .into_iter()
        .map(|row| EulerTriplet::new(row[0], row[1], row[2]))
        .collect())
}

/// Stack triplets into an (N, 3) array
pub fn triplets_to_array(triplets: &[EulerTriplet]) -> Array2<f64> {
    Array2::from_shape_fn((triplets.len(), 3), |(i, j)| triplets[i].0[j])
}
