/*
MIT License

Copyright (c) 2025 Ameyanagi
*/

//! Euler angle conventions and conversion between them
//!
//! Cryo-EM packages disagree on three independent properties of their euler
//! angles: the axis order (ZXZ or ZYZ), whether rotations compose intrinsically
//! or extrinsically, and whether the angles rotate the reference or the
//! particle. This module names those conventions and converts angle batches
//! between any two of them.
//!
//! ```no_run
//! use abtt::euler::{ConventionEngine, EulerTriplet};
//!
//! let engine = ConventionEngine::default();
//! let relion = engine
//!     .convert_named(&[EulerTriplet::new(-155.55, 63.924, 197.81)], "dynamo", "relion")
//!     .unwrap();
//! ```

pub mod convention;
pub mod decompose;
pub mod engine;
pub mod errors;
pub mod registry;
pub mod triplet;

pub use convention::{ActsOn, Convention};
pub use decompose::{decompose, is_supported, POLE_TOLERANCE};
pub use engine::{flip_reference_frame, ConventionEngine, EngineConfig};
pub use errors::{EulerError, Result};
pub use registry::{ConventionRegistry, KNOWN_CONVENTIONS};
pub use triplet::{angular_difference, triplets_from_array, triplets_to_array, EulerTriplet};

use ndarray::{Array2, ArrayView2};

/// Convert (N, 3) Dynamo `[tdrot, tilt, narot]` angles to RELION `[rot, tilt, psi]`
pub fn dynamo_to_relion(angles: ArrayView2<f64>) -> Result<Array2<f64>> {
    ConventionEngine::default().convert_array(angles, "dynamo", "relion")
}

/// Convert (N, 3) RELION `[rot, tilt, psi]` angles to Dynamo `[tdrot, tilt, narot]`
pub fn relion_to_dynamo(angles: ArrayView2<f64>) -> Result<Array2<f64>> {
    ConventionEngine::default().convert_array(angles, "relion", "dynamo")
}
