/*
MIT License

Copyright (c) 2025 Ameyanagi
*/

//! Immutable 3x3 rotation matrix type

use ndarray::Array2;
use std::fmt;
use std::ops::{Index, Mul};

/// A 3x3 proper rotation matrix (orthogonal, determinant +1)
///
/// Matrices are never edited in place: every operation returns a new matrix.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RotationMatrix([[f64; 3]; 3]);

impl RotationMatrix {
    /// The identity rotation
    pub const IDENTITY: RotationMatrix =
        RotationMatrix([[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]]);

    /// Wrap row-major matrix elements
    ///
    /// No orthogonality check is performed; matrices built by
    /// [`compose`](super::compose) are orthogonal by construction.
    pub fn from_rows(rows: [[f64; 3]; 3]) -> Self {
        Self(rows)
    }

    /// Row-major matrix elements
    pub fn rows(&self) -> [[f64; 3]; 3] {
        self.0
    }

    /// Element at (`row`, `col`), zero-indexed
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.0[row][col]
    }

    /// Transposed matrix, which for a rotation is also its inverse
    pub fn transpose(&self) -> Self {
        let m = &self.0;
        Self([
            [m[0][0], m[1][0], m[2][0]],
            [m[0][1], m[1][1], m[2][1]],
            [m[0][2], m[1][2], m[2][2]],
        ])
    }

    /// Matrix product `self · other`
    pub fn multiply(&self, other: &Self) -> Self {
        let mut result = [[0.0; 3]; 3];
        for (i, row) in result.iter_mut().enumerate() {
            for (j, value) in row.iter_mut().enumerate() {
                *value = (0..3).map(|k| self.0[i][k] * other.0[k][j]).sum();
            }
        }
        Self(result)
    }

    /// Apply the rotation to a column vector
    pub fn apply(&self, v: [f64; 3]) -> [f64; 3] {
        let m = &self.0;
        [
            m[0][0] * v[0] + m[0][1] * v[1] + m[0][2] * v[2],
            m[1][0] * v[0] + m[1][1] * v[1] + m[1][2] * v[2],
            m[2][0] * v[0] + m[2][1] * v[1] + m[2][2] * v[2],
        ]
    }

    /// Determinant of the matrix
    pub fn determinant(&self) -> f64 {
        let m = &self.0;
        m[0][0] * (m[1][1] * m[2][2] - m[1][2] * m[2][1])
            - m[0][1] * (m[1][0] * m[2][2] - m[1][2] * m[2][0])
            + m[0][2] * (m[1][0] * m[2][1] - m[1][1] * m[2][0])
    }

    /// Element-wise comparison within an absolute tolerance
    pub fn approx_eq(&self, other: &Self, tolerance: f64) -> bool {
        self.0
            .iter()
            .flatten()
            .zip(other.0.iter().flatten())
            .all(|(a, b)| (a - b).abs() <= tolerance)
    }

    /// Copy into an `ndarray` matrix
    pub fn to_array(&self) -> Array2<f64> {
        Array2::from_shape_fn((3, 3), |(i, j)| self.0[i][j])
    }
}

impl Default for RotationMatrix {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Index<(usize, usize)> for RotationMatrix {
    type Output = f64;

    fn index(&self, (row, col): (usize, usize)) -> &f64 {
        &self.0[row][col]
    }
}

impl Mul for RotationMatrix {
    type Output = RotationMatrix;

    fn mul(self, rhs: RotationMatrix) -> RotationMatrix {
        self.multiply(&rhs)
    }
}

impl fmt::Display for RotationMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in &self.0 {
            writeln!(f, "[{:>9.4} {:>9.4} {:>9.4}]", row[0], row[1], row[2])?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_transpose_twice_is_identity_operation() {
        let m = RotationMatrix::from_rows([[0.0, -1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0]]);
        assert_eq!(m.transpose().transpose(), m);
        assert_eq!(m.transpose()[(0, 1)], 1.0);
    }

    #[test]
    fn test_rotation_times_transpose() {
        let s = std::f64::consts::FRAC_1_SQRT_2;
        let m = RotationMatrix::from_rows([[1.0, 0.0, 0.0], [0.0, s, -s], [0.0, s, s]]);
        assert!((m * m.transpose()).approx_eq(&RotationMatrix::IDENTITY, 1e-12));
        assert_relative_eq!(m.determinant(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_to_array() {
        let array = RotationMatrix::IDENTITY.to_array();
        assert_eq!(array.shape(), &[3, 3]);
        assert_eq!(array[(2, 2)], 1.0);
        assert_eq!(array[(0, 2)], 0.0);
    }
}
