/*
MIT License

Copyright (c) 2025 Ameyanagi
*/

//! Rotation axes, axis orders and composition order

use super::errors::{Result, RotationError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A cartesian axis about which an elementary rotation is applied
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    /// Parse a single axis letter (case-insensitive)
    pub fn from_char(c: char) -> Result<Self> {
        match c.to_ascii_uppercase() {
            'X' => Ok(Axis::X),
            'Y' => Ok(Axis::Y),
            'Z' => Ok(Axis::Z),
            _ => Err(RotationError::InvalidAxis(c)),
        }
    }

    /// Upper-case letter of this axis
    pub fn as_char(self) -> char {
        match self {
            Axis::X => 'X',
            Axis::Y => 'Y',
            Axis::Z => 'Z',
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// Ordered sequence of the three axes an euler triplet is applied about
///
/// The first axis pairs with the first angle of a triplet, and so on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AxisOrder([Axis; 3]);

impl AxisOrder {
    /// Z, then X, then Z (Dynamo, emClarity)
    pub const ZXZ: AxisOrder = AxisOrder([Axis::Z, Axis::X, Axis::Z]);
    /// Z, then Y, then Z (RELION, Warp)
    pub const ZYZ: AxisOrder = AxisOrder([Axis::Z, Axis::Y, Axis::Z]);

    /// Create an axis order from three axes
    pub fn new(first: Axis, second: Axis, third: Axis) -> Self {
        Self([first, second, third])
    }

    /// The three axes in order of application
    pub fn axes(&self) -> [Axis; 3] {
        self.0
    }
}

impl FromStr for AxisOrder {
    type Err = RotationError;

    fn from_str(s: &str) -> Result<Self> {
        let letters: Vec<char> = s.trim().chars().collect();
        if letters.len() != 3 {
            return Err(RotationError::InvalidAxisOrder(s.to_string()));
        }

        Ok(Self([
            Axis::from_char(letters[0])?,
            Axis::from_char(letters[1])?,
            Axis::from_char(letters[2])?,
        ]))
    }
}

impl TryFrom<String> for AxisOrder {
    type Error = RotationError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<AxisOrder> for String {
    fn from(order: AxisOrder) -> Self {
        order.to_string()
    }
}

impl fmt::Display for AxisOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for axis in self.0 {
            write!(f, "{}", axis)?;
        }
        Ok(())
    }
}

/// How the three elementary rotations of a triplet are composed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Composition {
    /// Each rotation is about an axis of the already rotated frame (R3·R2·R1)
    Intrinsic,
    /// Each rotation is about an axis of the original, fixed frame (R1·R2·R3)
    Extrinsic,
}

impl FromStr for Composition {
    type Err = RotationError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "intrinsic" => Ok(Composition::Intrinsic),
            "extrinsic" => Ok(Composition::Extrinsic),
            _ => Err(RotationError::InvalidComposition(s.to_string())),
        }
    }
}

impl fmt::Display for Composition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Composition::Intrinsic => write!(f, "intrinsic"),
            Composition::Extrinsic => write!(f, "extrinsic"),
        }
    }
}
