/*
MIT License

Copyright (c) 2025 Ameyanagi
*/

//! Decomposition of rotation matrices into ZXZ and ZYZ euler angles
//!
//! Formulas are written for the intrinsic triplet `[a, b, c]`, whose matrix is
//! `Rz(c)·R?(b)·Rz(a)`. The extrinsic triplet of the same matrix is `[c, b, a]`.
//!
//! At the poles (`b` = 0 or 180 degrees) only `a + c` or `c - a` is defined.
//! The canonical representative has `a = 0`, so only the recomposed matrix, not
//! the individual angles, survives a round trip through a pole.

use super::errors::{EulerError, Result};
use super::triplet::EulerTriplet;
use crate::rotation::{AxisOrder, Composition, RotationMatrix};

/// Distance of R[2,2] from +-1 below which the tilt is treated as a pole
pub const POLE_TOLERANCE: f64 = 1e-4;

type Cell = (usize, usize);

/// Cells of `Rz(c)·Rx(b)·Rz(a)`
mod zxz {
    use super::Cell;

    /// cos b
    pub const COS_B: Cell = (2, 2);
    /// sin b sin a
    pub const SIN_B_SIN_A: Cell = (2, 0);
    /// sin b cos a
    pub const SIN_B_COS_A: Cell = (2, 1);
    /// sin c sin b
    pub const SIN_C_SIN_B: Cell = (0, 2);
    /// -cos c sin b
    pub const NEG_COS_C_SIN_B: Cell = (1, 2);
    /// sin(c + a) at b = 0, sin(c - a) at b = 180
    pub const POLE_SIN: Cell = (1, 0);
    /// cos(c + a) at b = 0, cos(c - a) at b = 180
    pub const POLE_COS: Cell = (0, 0);
}

/// Cells of `Rz(c)·Ry(b)·Rz(a)`
mod zyz {
    use super::Cell;

    /// cos b
    pub const COS_B: Cell = (2, 2);
    /// -sin b cos a
    pub const NEG_SIN_B_COS_A: Cell = (2, 0);
    /// sin b sin a
    pub const SIN_B_SIN_A: Cell = (2, 1);
    /// cos c sin b
    pub const COS_C_SIN_B: Cell = (0, 2);
    /// sin c sin b
    pub const SIN_C_SIN_B: Cell = (1, 2);
    /// sin(c + a) at b = 0
    pub const NORTH_SIN: Cell = (1, 0);
    /// cos(c + a) at b = 0
    pub const NORTH_COS: Cell = (0, 0);
    /// -sin(c - a) at b = 180
    pub const SOUTH_NEG_SIN: Cell = (1, 0);
    /// cos(c - a) at b = 180
    pub const SOUTH_COS: Cell = (1, 1);
}

/// Whether [`decompose`] has a closed form for `axis_order`
pub fn is_supported(axis_order: AxisOrder) -> bool {
    axis_order == AxisOrder::ZXZ || axis_order == AxisOrder::ZYZ
}

/// Fail with `UnsupportedAxisOrderForDecomposition` unless `axis_order` is ZXZ or ZYZ
pub fn ensure_supported(axis_order: AxisOrder) -> Result<()> {
    if is_supported(axis_order) {
        Ok(())
    } else {
        Err(EulerError::UnsupportedAxisOrderForDecomposition(
            axis_order.to_string(),
        ))
    }
}

/// Decompose a rotation matrix into euler angles
///
/// # Arguments
///
/// * `matrix` - Rotation matrix to decompose
/// * `axis_order` - Target axis order, ZXZ or ZYZ
/// * `composition` - Target composition; extrinsic output is the intrinsic
///   triplet in reverse order
///
/// # Returns
///
/// Angles in degrees. Away from the poles the tilt lies in (0, 180) and the
/// other two angles in [-180, 180].
pub fn decompose(
    matrix: &RotationMatrix,
    axis_order: AxisOrder,
    composition: Composition,
) -> Result<EulerTriplet> {
    let intrinsic = if axis_order == AxisOrder::ZXZ {
        zxz_intrinsic(matrix)
    } else if axis_order == AxisOrder::ZYZ {
        zyz_intrinsic(matrix)
    } else {
        return Err(EulerError::UnsupportedAxisOrderForDecomposition(
            axis_order.to_string(),
        ));
    };

    Ok(match composition {
        Composition::Intrinsic => intrinsic,
        Composition::Extrinsic => intrinsic.reversed(),
    })
}

fn zxz_intrinsic(m: &RotationMatrix) -> EulerTriplet {
    let cos_b = m[zxz::COS_B];

    if (cos_b - 1.0).abs() < POLE_TOLERANCE {
        let c = m[zxz::POLE_SIN].atan2(m[zxz::POLE_COS]);
        EulerTriplet::new(0.0, 0.0, c.to_degrees())
    } else if (cos_b + 1.0).abs() < POLE_TOLERANCE {
        let c = m[zxz::POLE_SIN].atan2(m[zxz::POLE_COS]);
        EulerTriplet::new(0.0, 180.0, c.to_degrees())
    } else {
        let a = m[zxz::SIN_B_SIN_A].atan2(m[zxz::SIN_B_COS_A]);
        let b = cos_b.clamp(-1.0, 1.0).acos();
        let c = m[zxz::SIN_C_SIN_B].atan2(-m[zxz::NEG_COS_C_SIN_B]);
        EulerTriplet::new(a.to_degrees(), b.to_degrees(), c.to_degrees())
    }
}

fn zyz_intrinsic(m: &RotationMatrix) -> EulerTriplet {
    let cos_b = m[zyz::COS_B];

    if (cos_b - 1.0).abs() < POLE_TOLERANCE {
        let c = m[zyz::NORTH_SIN].atan2(m[zyz::NORTH_COS]);
        EulerTriplet::new(0.0, 0.0, c.to_degrees())
    } else if (cos_b + 1.0).abs() < POLE_TOLERANCE {
        let c = (-m[zyz::SOUTH_NEG_SIN]).atan2(m[zyz::SOUTH_COS]);
        EulerTriplet::new(0.0, 180.0, c.to_degrees())
    } else {
        let a = m[zyz::SIN_B_SIN_A].atan2(-m[zyz::NEG_SIN_B_COS_A]);
        let b = cos_b.clamp(-1.0, 1.0).acos();
        let c = m[zyz::SIN_C_SIN_B].atan2(m[zyz::COS_C_SIN_B]);
        EulerTriplet::new(a.to_degrees(), b.to_degrees(), c.to_degrees())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rotation::{compose, elementary_rotation, Axis};
    use approx::assert_abs_diff_eq;

    fn round_trip(angles: [f64; 3], order: AxisOrder, composition: Composition) {
        let m = compose(&angles, order, composition).unwrap();
        let t = decompose(&m, order, composition).unwrap();
        let back = compose(t.as_slice(), order, composition).unwrap();
        assert!(
            back.approx_eq(&m, 1e-9),
            "{:?} {} {:?} decomposed to {}",
            angles,
            order,
            composition,
            t
        );
    }

    #[test]
    fn test_general_round_trips() {
        for angles in [[30.0, 45.0, 60.0], [-155.55, 63.924, 197.81], [170.0, 179.0, -10.0]] {
            for order in [AxisOrder::ZXZ, AxisOrder::ZYZ] {
                for composition in [Composition::Intrinsic, Composition::Extrinsic] {
                    round_trip(angles, order, composition);
                }
            }
        }
    }

    #[test]
    fn test_pole_round_trips() {
        for angles in [[25.0, 0.0, 40.0], [-120.0, 180.0, 75.0], [0.0, 180.0, 0.0]] {
            for order in [AxisOrder::ZXZ, AxisOrder::ZYZ] {
                for composition in [Composition::Intrinsic, Composition::Extrinsic] {
                    round_trip(angles, order, composition);
                }
            }
        }
    }

    #[test]
    fn test_north_pole_is_canonical() {
        let m = elementary_rotation(Axis::Z, 35.0);
        assert_eq!(m[(2, 2)], 1.0);

        let t = decompose(&m, AxisOrder::ZXZ, Composition::Intrinsic).unwrap();
        assert_eq!(t.first(), 0.0);
        assert_eq!(t.second(), 0.0);
        assert_abs_diff_eq!(t.third(), 35.0, epsilon = 1e-9);

        let t = decompose(&m, AxisOrder::ZYZ, Composition::Extrinsic).unwrap();
        assert_abs_diff_eq!(t.first(), 35.0, epsilon = 1e-9);
        assert_eq!(t.second(), 0.0);
        assert_eq!(t.third(), 0.0);
    }

    #[test]
    fn test_identity_decomposes_to_zeros() {
        let t = decompose(&RotationMatrix::IDENTITY, AxisOrder::ZXZ, Composition::Intrinsic).unwrap();
        assert_eq!(t.angles(), [0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_unsupported_axis_order() {
        let order: AxisOrder = "XYZ".parse().unwrap();
        let err = decompose(&RotationMatrix::IDENTITY, order, Composition::Intrinsic).unwrap_err();
        assert!(matches!(
            err,
            EulerError::UnsupportedAxisOrderForDecomposition(ref name) if name == "XYZ"
        ));
        assert!(ensure_supported(order).is_err());
        assert!(ensure_supported(AxisOrder::ZYZ).is_ok());
    }
}
