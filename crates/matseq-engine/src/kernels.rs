//! Eager 4×4 matrix and vector kernels.
//!
//! All storage is column-major `f32`: 16 elements per matrix, 4 per
//! vector. The arithmetic itself is delegated to `nalgebra`.

use nalgebra::{Matrix4, Vector4};

/// A column-major 4×4 matrix.
pub type Mat4 = [f32; 16];

/// A 4-component vector.
pub type Vec4 = [f32; 4];

/// The identity matrix.
pub const IDENTITY: Mat4 = [
    1.0, 0.0, 0.0, 0.0, //
    0.0, 1.0, 0.0, 0.0, //
    0.0, 0.0, 1.0, 0.0, //
    0.0, 0.0, 0.0, 1.0,
];

fn matrix(m: &Mat4) -> Matrix4<f32> {
    Matrix4::from_column_slice(m)
}

/// `target = target × other`.
pub fn mul_matrix(target: &mut Mat4, other: &Mat4) {
    let product = matrix(target) * matrix(other);
    target.copy_from_slice(product.as_slice());
}

/// `vector = matrix × vector`.
pub fn mul_vector(matrix_data: &Mat4, vector: &mut Vec4) {
    let product = matrix(matrix_data) * Vector4::from_column_slice(vector);
    vector.copy_from_slice(product.as_slice());
}

/// Transpose `target` in place.
pub fn transpose(target: &mut Mat4) {
    let t = matrix(target).transpose();
    target.copy_from_slice(t.as_slice());
}

/// Invert `target` in place.
///
/// A singular matrix has no inverse; every element becomes NaN.
pub fn invert(target: &mut Mat4) {
    match matrix(target).try_inverse() {
        Some(inv) => target.copy_from_slice(inv.as_slice()),
        None => target.fill(f32::NAN),
    }
}
