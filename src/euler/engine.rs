/*
MIT License

Copyright (c) 2025 Ameyanagi
*/

//! Conversion of euler angle batches between conventions
//!
//! Each conversion call runs the pipeline
//! `triplet -> matrix -> (matrix | transposed matrix) -> target triplet`
//! independently per row. A failing row fails the whole batch so that the
//! output never loses alignment with other per-particle arrays.

use super::convention::Convention;
use super::decompose::{decompose, ensure_supported};
use super::errors::{EulerError, Result};
use super::registry::{ConventionRegistry, KNOWN_CONVENTIONS};
use super::triplet::{triplets_from_array, triplets_to_array, EulerTriplet};
use crate::rotation::{compose, RotationMatrix};
use log::{debug, info};
use ndarray::{Array2, ArrayView2};
use rayon::prelude::*;

/// Batch processing configuration for [`ConventionEngine`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineConfig {
    /// Whether large batches are split across the rayon thread pool
    pub parallel: bool,
    /// Minimum number of rows before a batch is processed in parallel
    pub parallel_threshold: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            parallel: true,
            parallel_threshold: 4096,
        }
    }
}

/// Converts euler angle batches between named or explicit conventions
#[derive(Debug, Clone)]
pub struct ConventionEngine<'a> {
    registry: &'a ConventionRegistry,
    config: EngineConfig,
}

impl Default for ConventionEngine<'static> {
    fn default() -> Self {
        Self::new(&KNOWN_CONVENTIONS)
    }
}

impl<'a> ConventionEngine<'a> {
    /// Create an engine resolving names against `registry`
    pub fn new(registry: &'a ConventionRegistry) -> Self {
        debug!(
            "created euler angle conversion engine with {} registered conventions",
            registry.len()
        );
        Self {
            registry,
            config: EngineConfig::default(),
        }
    }

    /// Replace the batch processing configuration
    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn registry(&self) -> &ConventionRegistry {
        self.registry
    }

    /// Look up a registered convention by (case-insensitive) name
    pub fn convention(&self, name: &str) -> Result<Convention> {
        self.registry.get(name).copied()
    }

    /// Rotation matrix of every triplet under `convention`, in row order
    pub fn matrices_from_triplets(
        &self,
        triplets: &[EulerTriplet],
        convention: &Convention,
    ) -> Result<Vec<RotationMatrix>> {
        debug!(
            "calculating {} rotation matrices under {}",
            triplets.len(),
            convention
        );
        self.map_rows(triplets, |triplet| {
            Ok(compose(
                triplet.as_slice(),
                convention.axis_order(),
                convention.composition(),
            )?)
        })
    }

    /// Convert a batch of triplets from one convention to another
    ///
    /// The matrix of each row is built under `from`, transposed if the two
    /// conventions rotate different bodies, and decomposed under the axis
    /// order and composition of `to`.
    ///
    /// # Errors
    ///
    /// * `UnsupportedAxisOrderForDecomposition` if `to` is not ZXZ or ZYZ
    /// * `Row` wrapping the first failing row, e.g. a non-finite angle
    pub fn convert(
        &self,
        triplets: &[EulerTriplet],
        from: &Convention,
        to: &Convention,
    ) -> Result<Vec<EulerTriplet>> {
        ensure_supported(to.axis_order())?;
        info!(
            "converting {} euler triplets from {} to {}",
            triplets.len(),
            from,
            to
        );

        let flip = from.acts_on() != to.acts_on();
        if flip {
            debug!(
                "changing reference frame from {} to {} by transposition",
                from.acts_on(),
                to.acts_on()
            );
        }

        self.map_rows(triplets, |triplet| {
            let matrix = compose(triplet.as_slice(), from.axis_order(), from.composition())?;
            let matrix = if flip { matrix.transpose() } else { matrix };
            decompose(&matrix, to.axis_order(), to.composition())
        })
    }

    /// Convert a batch between two registered conventions
    pub fn convert_named(
        &self,
        triplets: &[EulerTriplet],
        from: &str,
        to: &str,
    ) -> Result<Vec<EulerTriplet>> {
        let from = self.convention(from)?;
        let to = self.convention(to)?;
        self.convert(triplets, &from, &to)
    }

    /// Convert an (N, 3) array of angles between two registered conventions
    pub fn convert_array(&self, angles: ArrayView2<f64>, from: &str, to: &str) -> Result<Array2<f64>> {
        let triplets = triplets_from_array(angles)?;
        let converted = self.convert_named(&triplets, from, to)?;
        Ok(triplets_to_array(&converted))
    }

    /// Apply `f` to every row, in parallel for large batches
    ///
    /// Output order matches input order. When several rows fail, the lowest
    /// row index is reported.
    fn map_rows<T, F>(&self, rows: &[EulerTriplet], f: F) -> Result<Vec<T>>
    where
        T: Send,
        F: Fn(&EulerTriplet) -> Result<T> + Sync,
    {
        let wrap = |(row, triplet): (usize, &EulerTriplet)| {
            f(triplet).map_err(|e| EulerError::at_row(row, e))
        };

        if self.config.parallel && rows.len() >= self.config.parallel_threshold {
            let results: Vec<Result<T>> = rows.par_iter().enumerate().map(wrap).collect();
            results.into_iter().collect()
        } else {
            rows.iter().enumerate().map(wrap).collect()
        }
    }
}

/// Transpose every matrix, switching the body the rotations act on
pub fn flip_reference_frame(matrices: &[RotationMatrix]) -> Vec<RotationMatrix> {
    matrices.iter().map(RotationMatrix::transpose).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::euler::ActsOn;
    use crate::rotation::{AxisOrder, Composition, RotationError};
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_dynamo_to_relion_reference_value() {
        let engine = ConventionEngine::default();
        let out = engine
            .convert_named(&[EulerTriplet::new(-155.55, 63.924, 197.81)], "dynamo", "relion")
            .unwrap();
        assert_eq!(out.len(), 1);
        assert_abs_diff_eq!(out[0].as_slice(), &[107.81, 63.924, -65.55][..], epsilon = 1e-2);
    }

    #[test]
    fn test_frame_flip_between_dynamo_and_emclarity() {
        let engine = ConventionEngine::default();
        let input = [EulerTriplet::new(30.0, 45.0, 60.0)];
        let out = engine.convert_named(&input, "dynamo", "emclarity").unwrap();
        // the inverse of [a, b, c] is [-c, -b, -a], i.e. [180 - c, b, 180 - a]
        assert_abs_diff_eq!(out[0].as_slice(), &[120.0, 45.0, 150.0][..], epsilon = 1e-9);

        let back = engine.convert_named(&out, "emclarity", "dynamo").unwrap();
        assert!(back[0].approx_eq_degrees(&input[0], 1e-9));
    }

    #[test]
    fn test_matrices_preserve_row_order() {
        let engine = ConventionEngine::default();
        let dynamo = engine.convention("dynamo").unwrap();
        let triplets = [EulerTriplet::new(90.0, 0.0, 0.0), EulerTriplet::new(0.0, 90.0, 0.0)];
        let matrices = engine.matrices_from_triplets(&triplets, &dynamo).unwrap();
        assert_eq!(matrices.len(), 2);
        assert_abs_diff_eq!(matrices[0][(1, 0)], 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(matrices[1][(2, 1)], 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_failure_reports_row() {
        let engine = ConventionEngine::default();
        let triplets = [
            EulerTriplet::new(1.0, 2.0, 3.0),
            EulerTriplet::new(1.0, f64::INFINITY, 3.0),
            EulerTriplet::new(f64::NAN, 2.0, 3.0),
        ];
        let err = engine.convert_named(&triplets, "dynamo", "relion").unwrap_err();
        match err {
            EulerError::Row { row, source } => {
                assert_eq!(row, 1);
                assert!(matches!(
                    *source,
                    EulerError::Rotation(RotationError::InvalidTriplet(_))
                ));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_parallel_matches_serial() {
        let registry = ConventionRegistry::known_software();
        let triplets: Vec<EulerTriplet> = (0..64)
            .map(|i| EulerTriplet::new(i as f64 * 5.0 - 160.0, 10.0 + i as f64 * 2.5, 37.0 - i as f64))
            .collect();

        let serial = ConventionEngine::new(&registry)
            .with_config(EngineConfig {
                parallel: false,
                parallel_threshold: 0,
            })
            .convert_named(&triplets, "relion", "emclarity")
            .unwrap();
        let parallel = ConventionEngine::new(&registry)
            .with_config(EngineConfig {
                parallel: true,
                parallel_threshold: 1,
            })
            .convert_named(&triplets, "relion", "emclarity")
            .unwrap();
        assert_eq!(serial, parallel);
    }

    #[test]
    fn test_unsupported_target_fails_before_rows() {
        let engine = ConventionEngine::default();
        let from = engine.convention("dynamo").unwrap();
        let to = Convention::new("XYZ".parse().unwrap(), Composition::Intrinsic, ActsOn::Reference);
        let err = engine
            .convert(&[EulerTriplet::new(f64::NAN, 0.0, 0.0)], &from, &to)
            .unwrap_err();
        assert!(matches!(err, EulerError::UnsupportedAxisOrderForDecomposition(_)));
    }

    #[test]
    fn test_flip_reference_frame_is_self_inverse() {
        let m = compose(&[12.0, 34.0, 56.0], AxisOrder::ZYZ, Composition::Extrinsic).unwrap();
        let flipped = flip_reference_frame(&[m]);
        assert_ne!(flipped[0], m);
        assert_eq!(flip_reference_frame(&flipped), vec![m]);
    }
}
