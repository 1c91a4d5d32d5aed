//! 4×4 float matrix and transform factories.

use crate::vector::{cross, Vector};
use crate::MathError;

/// Flat index of row `i`, column `j` in column-major storage.
#[inline]
fn idx(i: usize, j: usize) -> usize {
    4 * j + i
}

/// A 4×4 matrix in column-major storage.
///
/// The backing array maps element `(row i, column j)` to index `4*j + i`,
/// the layout WebGL expects for a `mat4` uniform, so `get()` is a straight
/// copy. Constructor input reads in row-major literal order and is restored
/// to column-major on the way in. Value type with the same copy-on-operate
/// discipline as [`Vector`]; the in-place setters and row/column swaps are
/// construction tools, used by `inverse()` on its working copies.
///
/// The default is the zero matrix, not identity.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Matrix {
    m: [f32; 16],
}

impl Matrix {
    /// Builds a matrix from the first 16 components of `raw`, read in
    /// row-major order.
    pub fn new(raw: &[f32]) -> Result<Self, MathError> {
        if raw.len() < 16 {
            return Err(MathError::InvalidArgument {
                expected: 16,
                got: raw.len(),
            });
        }
        let mut m = [0.0; 16];
        for i in 0..4 {
            for j in 0..4 {
                m[idx(i, j)] = raw[4 * i + j];
            }
        }
        Ok(Self { m })
    }

    /// The zero matrix, same as `Default`.
    pub fn zero() -> Self {
        Self::default()
    }

    pub fn identity() -> Self {
        Self::from([
            1.0, 0.0, 0.0, 0.0, //
            0.0, 1.0, 0.0, 0.0, //
            0.0, 0.0, 1.0, 0.0, //
            0.0, 0.0, 0.0, 1.0,
        ])
    }

    /// Flat column-major export, suitable for direct upload as a `mat4`
    /// uniform.
    pub fn get(&self) -> [f32; 16] {
        self.m
    }

    /// Element at row `i`, column `j`, both in `0..4`.
    pub fn at(&self, i: usize, j: usize) -> f32 {
        self.m[idx(i, j)]
    }

    pub fn set_at(&mut self, i: usize, j: usize, val: f32) {
        self.m[idx(i, j)] = val;
    }

    /// Exchanges rows `a` and `b` in place.
    pub fn swap_row(&mut self, a: usize, b: usize) {
        for j in 0..4 {
            self.m.swap(idx(a, j), idx(b, j));
        }
    }

    /// Exchanges columns `a` and `b` in place.
    pub fn swap_col(&mut self, a: usize, b: usize) {
        for i in 0..4 {
            self.m.swap(idx(i, a), idx(i, b));
        }
    }

    /// Scales every element by `s`.
    pub fn muls(&self, s: f32) -> Self {
        Self {
            m: self.m.map(|e| e * s),
        }
    }

    /// Matrix-vector product; `v` is treated as a column, so row `i` of the
    /// result is the dot product of matrix row `i` with `v`.
    pub fn mulv(&self, v: &Vector) -> Vector {
        let mut result = Vector::zero();
        for i in 0..4 {
            let mut val = 0.0;
            for j in 0..4 {
                val += self.at(i, j) * v.at(j);
            }
            result.set_at(i, val);
        }
        result
    }

    /// Standard matrix product `self · other`. Non-commutative; the caller
    /// composes transforms in the intended right-to-left application order.
    pub fn mul(&self, other: &Matrix) -> Self {
        let mut result = Self::zero();
        for i in 0..4 {
            for j in 0..4 {
                let mut val = 0.0;
                for k in 0..4 {
                    val += self.at(i, k) * other.at(k, j);
                }
                result.set_at(i, j, val);
            }
        }
        result
    }

    pub fn transpose(&self) -> Self {
        let mut result = Self::zero();
        for i in 0..4 {
            for j in 0..4 {
                result.set_at(i, j, self.at(j, i));
            }
        }
        result
    }

    /// General inverse via Gauss-Jordan elimination with partial pivoting.
    ///
    /// Row operations run on a working copy and on an identity-seeded
    /// accumulator in lockstep; once every column is reduced the accumulator
    /// holds the inverse. A singular input leaves a zero pivot after
    /// selection and the division poisons the result with `Inf`/`NaN` —
    /// accepted numeric behavior, not an error.
    pub fn inverse(&self) -> Self {
        let mut work = *self;
        let mut result = Self::identity();
        for i in 0..4 {
            // partial pivoting: largest |element| in column i, rows i..4
            let mut max = work.at(i, i).abs();
            let mut pivot_row = i;
            for k in (i + 1)..4 {
                let mki = work.at(k, i).abs();
                if mki > max {
                    max = mki;
                    pivot_row = k;
                }
            }
            if pivot_row != i {
                work.swap_row(i, pivot_row);
                result.swap_row(i, pivot_row);
            }
            // divide the pivot row by the pivot
            let pivot = work.at(i, i);
            for j in 0..4 {
                work.set_at(i, j, work.at(i, j) / pivot);
                result.set_at(i, j, result.at(i, j) / pivot);
            }
            // eliminate column i from every other row
            for j in 0..4 {
                if j == i {
                    continue;
                }
                let mji = work.at(j, i);
                for k in 0..4 {
                    work.set_at(j, k, work.at(j, k) - work.at(i, k) * mji);
                    result.set_at(j, k, result.at(j, k) - result.at(i, k) * mji);
                }
            }
        }
        result
    }

    /// Diagonal scale matrix.
    pub fn scaler(x: f32, y: f32, z: f32) -> Self {
        Self::from([
            x, 0.0, 0.0, 0.0, //
            0.0, y, 0.0, 0.0, //
            0.0, 0.0, z, 0.0, //
            0.0, 0.0, 0.0, 1.0,
        ])
    }

    /// Rotation about the X axis by `r` radians.
    pub fn rotator_x(r: f32) -> Self {
        let (s, c) = r.sin_cos();
        Self::from([
            1.0, 0.0, 0.0, 0.0, //
            0.0, c, -s, 0.0, //
            0.0, s, c, 0.0, //
            0.0, 0.0, 0.0, 1.0,
        ])
    }

    /// Rotation about the Y axis by `r` radians.
    pub fn rotator_y(r: f32) -> Self {
        let (s, c) = r.sin_cos();
        Self::from([
            c, 0.0, s, 0.0, //
            0.0, 1.0, 0.0, 0.0, //
            -s, 0.0, c, 0.0, //
            0.0, 0.0, 0.0, 1.0,
        ])
    }

    /// Rotation about the Z axis by `r` radians.
    pub fn rotator_z(r: f32) -> Self {
        let (s, c) = r.sin_cos();
        Self::from([
            c, -s, 0.0, 0.0, //
            s, c, 0.0, 0.0, //
            0.0, 0.0, 1.0, 0.0, //
            0.0, 0.0, 0.0, 1.0,
        ])
    }

    /// Translation matrix; the offset sits in the bottom row, matching the
    /// library's row-vector application convention through its storage
    /// layout.
    pub fn translator(x: f32, y: f32, z: f32) -> Self {
        Self::from([
            1.0, 0.0, 0.0, 0.0, //
            0.0, 1.0, 0.0, 0.0, //
            0.0, 0.0, 1.0, 0.0, //
            x, y, z, 1.0,
        ])
    }

    /// Look-at view matrix from camera position, look-at target, and up
    /// vector. Inputs need at least 3 components; a 4th, if present, is
    /// ignored (forced to 0 internally so the vector algebra stays in
    /// direction space).
    pub fn view(pos: &[f32], at: &[f32], up: &[f32]) -> Self {
        // vectorize
        let vpos = Vector::from([pos[0], pos[1], pos[2], 0.0]);
        let vat = Vector::from([at[0], at[1], at[2], 0.0]);
        let vup = Vector::from([up[0], up[1], up[2], 0.0]);
        // axis vectors of the view coordinate system
        let z = vat.add(&vpos.muls(-1.0)).normalize();
        let x = cross(&z, &vup).normalize();
        let y = cross(&x, &z).normalize();
        // object translation
        let dx = vpos.dot(&x);
        let dy = vpos.dot(&y);
        let dz = vpos.dot(&z);
        // finish
        Self::from([
            x.x(),
            y.x(),
            z.x(),
            0.0,
            x.y(),
            y.y(),
            z.y(),
            0.0,
            x.z(),
            y.z(),
            z.z(),
            0.0,
            -dx,
            -dy,
            -dz,
            1.0,
        ])
    }

    /// Perspective projection matrix.
    ///
    /// Uses `1/tan(pov)` for the vertical scale and bakes `aspect` into the
    /// Y term; the depth terms map with `far/(far - near)`. The element
    /// placement is part of the rendering contract and is reproduced
    /// exactly — not normalized to a textbook convention.
    pub fn perse(pov: f32, aspect: f32, near: f32, far: f32) -> Self {
        let div_tanpov = 1.0 / pov.tan();
        let div_depth = 1.0 / (far - near);
        Self::from([
            div_tanpov,
            0.0,
            0.0,
            0.0,
            0.0,
            div_tanpov * aspect,
            0.0,
            0.0,
            0.0,
            0.0,
            far * div_depth,
            1.0,
            0.0,
            0.0,
            -far * near * div_depth,
            0.0,
        ])
    }
}

impl From<[f32; 16]> for Matrix {
    /// Infallible row-major literal constructor, used by the factories.
    fn from(raw: [f32; 16]) -> Self {
        let mut m = [0.0; 16];
        for i in 0..4 {
            for j in 0..4 {
                m[idx(i, j)] = raw[4 * i + j];
            }
        }
        Self { m }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MathError;

    fn assert_matrix_close(a: &Matrix, b: &Matrix, eps: f32) {
        for i in 0..4 {
            for j in 0..4 {
                let (ea, eb) = (a.at(i, j), b.at(i, j));
                assert!(
                    (ea - eb).abs() < eps,
                    "mismatch at ({i}, {j}): {ea} vs {eb}"
                );
            }
        }
    }

    fn sample() -> Matrix {
        // invertible, asymmetric
        Matrix::translator(1.0, -2.0, 3.0)
            .mul(&Matrix::rotator_z(0.7))
            .mul(&Matrix::rotator_y(-0.3))
            .mul(&Matrix::scaler(2.0, 0.5, 1.5))
    }

    #[test]
    fn test_constructor_is_row_major() {
        let raw: Vec<f32> = (1..=16).map(|n| n as f32).collect();
        let m = Matrix::new(&raw).unwrap();
        assert_eq!(m.at(0, 0), 1.0);
        assert_eq!(m.at(0, 1), 2.0);
        assert_eq!(m.at(1, 0), 5.0);
        assert_eq!(m.at(3, 3), 16.0);
    }

    #[test]
    fn test_export_is_column_major() {
        let raw: Vec<f32> = (1..=16).map(|n| n as f32).collect();
        let m = Matrix::new(&raw).unwrap();
        // column 0 first: elements (0,0), (1,0), (2,0), (3,0)
        assert_eq!(
            m.get(),
            [
                1.0, 5.0, 9.0, 13.0, //
                2.0, 6.0, 10.0, 14.0, //
                3.0, 7.0, 11.0, 15.0, //
                4.0, 8.0, 12.0, 16.0,
            ]
        );
    }

    #[test]
    fn test_too_short_is_rejected() {
        let err = Matrix::new(&[0.0; 15]).unwrap_err();
        assert_eq!(
            err,
            MathError::InvalidArgument {
                expected: 16,
                got: 15
            }
        );
    }

    #[test]
    fn test_default_is_zero() {
        assert_eq!(Matrix::default().get(), [0.0; 16]);
        assert_eq!(Matrix::zero().get(), [0.0; 16]);
    }

    #[test]
    fn test_swap_row_and_col() {
        let raw: Vec<f32> = (1..=16).map(|n| n as f32).collect();
        let mut m = Matrix::new(&raw).unwrap();
        m.swap_row(0, 2);
        assert_eq!(m.at(0, 0), 9.0);
        assert_eq!(m.at(2, 1), 2.0);
        m.swap_col(1, 3);
        assert_eq!(m.at(0, 1), 12.0);
        assert_eq!(m.at(0, 3), 10.0);
    }

    #[test]
    fn test_muls() {
        let m = Matrix::identity().muls(3.0);
        assert_eq!(m.at(0, 0), 3.0);
        assert_eq!(m.at(0, 1), 0.0);
        assert_eq!(m.at(3, 3), 3.0);
    }

    #[test]
    fn test_mul_identity() {
        let m = sample();
        assert_matrix_close(&m.mul(&Matrix::identity()), &m, 1e-6);
        assert_matrix_close(&Matrix::identity().mul(&m), &m, 1e-6);
    }

    #[test]
    fn test_mul_associative() {
        let a = sample();
        let b = Matrix::rotator_x(1.1).mul(&Matrix::translator(-4.0, 0.5, 2.0));
        let c = Matrix::scaler(0.25, 3.0, -1.0);
        assert_matrix_close(&a.mul(&b).mul(&c), &a.mul(&b.mul(&c)), 1e-4);
    }

    #[test]
    fn test_transpose_twice_is_identity_operation() {
        let raw: Vec<f32> = (1..=16).map(|n| n as f32).collect();
        let m = Matrix::new(&raw).unwrap();
        assert_eq!(m.transpose().transpose(), m);
        assert_eq!(m.transpose().at(1, 0), m.at(0, 1));
    }

    #[test]
    fn test_factories_at_rest_are_identity() {
        let id = Matrix::identity();
        assert_matrix_close(&Matrix::translator(0.0, 0.0, 0.0), &id, 1e-6);
        assert_matrix_close(&Matrix::scaler(1.0, 1.0, 1.0), &id, 1e-6);
        assert_matrix_close(&Matrix::rotator_x(0.0), &id, 1e-6);
        assert_matrix_close(&Matrix::rotator_y(0.0), &id, 1e-6);
        assert_matrix_close(&Matrix::rotator_z(0.0), &id, 1e-6);
    }

    #[test]
    fn test_rotator_z_quarter_turn_maps_x_to_y() {
        let m = Matrix::rotator_z(std::f32::consts::FRAC_PI_2);
        let v = m.mulv(&Vector::from([1.0, 0.0, 0.0, 1.0]));
        let expected = [0.0, 1.0, 0.0, 1.0];
        for i in 0..4 {
            assert!((v.at(i) - expected[i]).abs() < 1e-6, "component {i}: {}", v.at(i));
        }
    }

    #[test]
    fn test_inverse_roundtrip() {
        let m = sample();
        assert_matrix_close(&m.mul(&m.inverse()), &Matrix::identity(), 1e-4);
        assert_matrix_close(&m.inverse().mul(&m), &Matrix::identity(), 1e-4);
        assert_matrix_close(&m.inverse().inverse(), &m, 1e-3);
    }

    #[test]
    fn test_inverse_needs_pivoting() {
        // zero on the leading diagonal forces a row swap in the first column
        let m = Matrix::new(&[
            0.0, 2.0, 0.0, 0.0, //
            1.0, 0.0, 0.0, 0.0, //
            0.0, 0.0, 0.0, 4.0, //
            0.0, 0.0, 3.0, 0.0,
        ])
        .unwrap();
        assert_matrix_close(&m.mul(&m.inverse()), &Matrix::identity(), 1e-6);
    }

    #[test]
    fn test_inverse_of_singular_is_nan_not_error() {
        let singular = Matrix::new(&[
            1.0, 2.0, 3.0, 4.0, //
            2.0, 4.0, 6.0, 8.0, //
            0.0, 0.0, 0.0, 0.0, //
            0.0, 0.0, 0.0, 1.0,
        ])
        .unwrap();
        let inv = singular.inverse();
        let has_nan = (0..4).any(|i| (0..4).any(|j| inv.at(i, j).is_nan()));
        assert!(has_nan);
    }

    #[test]
    fn test_translator_offset_in_bottom_row() {
        let m = Matrix::translator(7.0, 8.0, 9.0);
        assert_eq!(m.at(3, 0), 7.0);
        assert_eq!(m.at(3, 1), 8.0);
        assert_eq!(m.at(3, 2), 9.0);
        assert_eq!(m.at(3, 3), 1.0);
        assert_eq!(m.at(0, 3), 0.0);
    }

    #[test]
    fn test_view_axes_and_translation() {
        // camera at z = +5 looking at the origin, conventional up
        let m = Matrix::view(&[0.0, 0.0, 5.0], &[0.0, 0.0, 0.0], &[0.0, 1.0, 0.0]);
        // axis columns: right = +x, up = +y, forward = -z
        assert!((m.at(0, 0) - 1.0).abs() < 1e-6);
        assert!((m.at(1, 1) - 1.0).abs() < 1e-6);
        assert!((m.at(2, 2) + 1.0).abs() < 1e-6);
        // applying the transform to the world origin as a row vector places
        // it 5 units along the camera's forward axis
        let origin = Vector::from([0.0, 0.0, 0.0, 1.0]);
        let viewed = m.transpose().mulv(&origin);
        assert!(viewed.x().abs() < 1e-6);
        assert!(viewed.y().abs() < 1e-6);
        assert!((viewed.z() - 5.0).abs() < 1e-6);
        assert!((viewed.w() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_view_ignores_fourth_component() {
        let a = Matrix::view(&[1.0, 2.0, 5.0], &[0.0, 0.0, 0.0], &[0.0, 1.0, 0.0]);
        let b = Matrix::view(
            &[1.0, 2.0, 5.0, 1.0],
            &[0.0, 0.0, 0.0, 1.0],
            &[0.0, 1.0, 0.0, 1.0],
        );
        assert_matrix_close(&a, &b, 1e-6);
    }

    #[test]
    fn test_perse_element_placement() {
        let (pov, aspect, near, far) = (0.6_f32, 1.5_f32, 1.0_f32, 1000.0_f32);
        let m = Matrix::perse(pov, aspect, near, far);
        let t = 1.0 / pov.tan();
        let d = 1.0 / (far - near);
        assert!((m.at(0, 0) - t).abs() < 1e-6);
        assert!((m.at(1, 1) - t * aspect).abs() < 1e-6);
        assert!((m.at(2, 2) - far * d).abs() < 1e-4);
        assert!((m.at(2, 3) - 1.0).abs() < 1e-6);
        assert!((m.at(3, 2) + far * near * d).abs() < 1e-4);
        assert_eq!(m.at(3, 3), 0.0);
        assert_eq!(m.at(0, 1), 0.0);
        assert_eq!(m.at(1, 0), 0.0);
    }
}
