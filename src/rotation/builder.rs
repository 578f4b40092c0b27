/*
MIT License

Copyright (c) 2025 Ameyanagi
*/

//! Construction of elementary and composite rotation matrices
//!
//! Elementary rotations are anticlockwise when looking down the axis towards
//! the origin:
//!
//! ```text
//! Rx = [[1, 0, 0], [0, cos, -sin], [0, sin, cos]]
//! Ry = [[cos, 0, sin], [0, 1, 0], [-sin, 0, cos]]
//! Rz = [[cos, -sin, 0], [sin, cos, 0], [0, 0, 1]]
//! ```

use super::axis::{Axis, AxisOrder, Composition};
use super::errors::{Result, RotationError};
use super::matrix::RotationMatrix;

/// Rotation about a single axis
///
/// # Arguments
///
/// * `axis` - Axis to rotate about
/// * `angle_degrees` - Rotation angle in degrees
pub fn elementary_rotation(axis: Axis, angle_degrees: f64) -> RotationMatrix {
    let (sin, cos) = angle_degrees.to_radians().sin_cos();

    let rows = match axis {
        Axis::X => [[1.0, 0.0, 0.0], [0.0, cos, -sin], [0.0, sin, cos]],
        Axis::Y => [[cos, 0.0, sin], [0.0, 1.0, 0.0], [-sin, 0.0, cos]],
        Axis::Z => [[cos, -sin, 0.0], [sin, cos, 0.0], [0.0, 0.0, 1.0]],
    };

    RotationMatrix::from_rows(rows)
}

/// Compose the rotation described by an euler triplet
///
/// With R1, R2, R3 the elementary rotations for the first, second and third
/// (axis, angle) pair, the result is `R3·R2·R1` for intrinsic and `R1·R2·R3`
/// for extrinsic composition.
///
/// # Arguments
///
/// * `angles` - Three angles in degrees, positionally matched to `axis_order`
/// * `axis_order` - Axes of the three elementary rotations
/// * `composition` - Intrinsic or extrinsic composition
///
/// # Errors
///
/// `InvalidTriplet` if `angles` does not hold exactly three finite values.
pub fn compose(
    angles: &[f64],
    axis_order: AxisOrder,
    composition: Composition,
) -> Result<RotationMatrix> {
    if angles.len() != 3 {
        return Err(RotationError::InvalidTriplet(format!(
            "expected 3 angles, got {}",
            angles.len()
        )));
    }
    if let Some(angle) = angles.iter().find(|a| !a.is_finite()) {
        return Err(RotationError::InvalidTriplet(format!(
            "angle {} is not finite",
            angle
        )));
    }

    let [a1, a2, a3] = axis_order.axes();
    let r1 = elementary_rotation(a1, angles[0]);
    let r2 = elementary_rotation(a2, angles[1]);
    let r3 = elementary_rotation(a3, angles[2]);

    Ok(match composition {
        Composition::Intrinsic => r3 * r2 * r1,
        Composition::Extrinsic => r1 * r2 * r3,
    })
}

/// Parse an axis order string and compose in one step
///
/// Convenience for callers holding axis orders as text, e.g. `"ZXZ"`.
pub fn compose_str(
    angles: &[f64],
    axis_order: &str,
    composition: Composition,
) -> Result<RotationMatrix> {
    compose(angles, axis_order.parse()?, composition)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    const UNIT_X: [f64; 3] = [1.0, 0.0, 0.0];
    const UNIT_Y: [f64; 3] = [0.0, 1.0, 0.0];
    const UNIT_Z: [f64; 3] = [0.0, 0.0, 1.0];

    #[test]
    fn test_elementary_rotation_signs() {
        let v = elementary_rotation(Axis::Z, 90.0).apply(UNIT_X);
        assert_abs_diff_eq!(&v[..], &UNIT_Y[..], epsilon = 1e-12);

        let v = elementary_rotation(Axis::X, 90.0).apply(UNIT_Y);
        assert_abs_diff_eq!(&v[..], &UNIT_Z[..], epsilon = 1e-12);

        let v = elementary_rotation(Axis::Y, 90.0).apply(UNIT_Z);
        assert_abs_diff_eq!(&v[..], &UNIT_X[..], epsilon = 1e-12);
    }

    #[test]
    fn test_composition_order() {
        let angles = [30.0, 45.0, 60.0];
        let intrinsic = compose(&angles, AxisOrder::ZXZ, Composition::Intrinsic).unwrap();
        let extrinsic = compose(&angles, AxisOrder::ZXZ, Composition::Extrinsic).unwrap();
        assert!(!intrinsic.approx_eq(&extrinsic, 1e-6));

        let r1 = elementary_rotation(Axis::Z, 30.0);
        let r2 = elementary_rotation(Axis::X, 45.0);
        let r3 = elementary_rotation(Axis::Z, 60.0);
        assert!(intrinsic.approx_eq(&(r3 * r2 * r1), 1e-12));
        assert!(extrinsic.approx_eq(&(r1 * r2 * r3), 1e-12));
    }

    #[test]
    fn test_reversed_triplet_swaps_composition() {
        let intrinsic = compose(&[10.0, 20.0, 30.0], AxisOrder::ZYZ, Composition::Intrinsic).unwrap();
        let extrinsic = compose(&[30.0, 20.0, 10.0], AxisOrder::ZYZ, Composition::Extrinsic).unwrap();
        assert!(intrinsic.approx_eq(&extrinsic, 1e-12));
    }

    #[test]
    fn test_composed_matrix_is_proper_rotation() {
        let m = compose_str(&[12.5, -73.0, 141.0], "XYZ", Composition::Intrinsic).unwrap();
        assert_abs_diff_eq!(m.determinant(), 1.0, epsilon = 1e-12);
        assert!((m * m.transpose()).approx_eq(&RotationMatrix::IDENTITY, 1e-12));
    }

    #[test]
    fn test_invalid_inputs() {
        assert!(matches!(
            compose(&[1.0, 2.0], AxisOrder::ZXZ, Composition::Intrinsic),
            Err(RotationError::InvalidTriplet(_))
        ));
        assert!(matches!(
            compose(&[1.0, f64::NAN, 3.0], AxisOrder::ZXZ, Composition::Intrinsic),
            Err(RotationError::InvalidTriplet(_))
        ));
        assert_eq!(
            compose_str(&[1.0, 2.0, 3.0], "ZWZ", Composition::Intrinsic),
            Err(RotationError::InvalidAxis('W'))
        );
    }
}
