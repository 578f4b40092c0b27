/*
MIT License

Copyright (c) 2025 Ameyanagi
*/

//! Rotation matrix construction
//!
//! Builds 3x3 rotation matrices from elementary rotations about X, Y and Z,
//! and composes them from an ordered (axis, angle) triplet. Angles are given
//! in degrees throughout.

pub mod axis;
pub mod builder;
pub mod errors;
pub mod matrix;

pub use axis::{Axis, AxisOrder, Composition};
pub use builder::{compose, compose_str, elementary_rotation};
pub use errors::{Result, RotationError};
pub use matrix::RotationMatrix;
