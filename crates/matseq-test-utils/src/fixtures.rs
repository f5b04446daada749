//! Deterministic matrix and vector fixtures.
//!
//! All matrices are column-major `[f32; 16]`, matching the layout the
//! recorder addresses.

use nalgebra::{Matrix4, Rotation3, Translation3, Vector3};
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

/// A well-conditioned random matrix: uniform noise in `[-1, 1)` added
/// to `4 × identity`, so it is always invertible.
pub fn random_matrix(seed: u64) -> [f32; 16] {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut m = [0.0f32; 16];
    for (i, v) in m.iter_mut().enumerate() {
        let diagonal = if i % 5 == 0 { 4.0 } else { 0.0 };
        *v = diagonal + rng.random_range(-1.0f32..1.0);
    }
    m
}

/// A random homogeneous vector with `w = 1`.
pub fn random_vector(seed: u64) -> [f32; 4] {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    [
        rng.random_range(-10.0f32..10.0),
        rng.random_range(-10.0f32..10.0),
        rng.random_range(-10.0f32..10.0),
        1.0,
    ]
}

/// Rotation by `angle` radians about the z axis.
pub fn rotation_z(angle: f32) -> [f32; 16] {
    let m: Matrix4<f32> = Rotation3::from_axis_angle(&Vector3::z_axis(), angle).to_homogeneous();
    let mut out = [0.0f32; 16];
    out.copy_from_slice(m.as_slice());
    out
}

/// Translation by `(x, y, z)`.
pub fn translation(x: f32, y: f32, z: f32) -> [f32; 16] {
    let m: Matrix4<f32> = Translation3::new(x, y, z).to_homogeneous();
    let mut out = [0.0f32; 16];
    out.copy_from_slice(m.as_slice());
    out
}

/// Assert two slices match element-wise within `tolerance`.
#[track_caller]
pub fn assert_close(actual: &[f32], expected: &[f32], tolerance: f32) {
    assert_eq!(actual.len(), expected.len(), "length mismatch");
    for (i, (a, e)) in actual.iter().zip(expected).enumerate() {
        assert!(
            (a - e).abs() <= tolerance,
            "element {i}: {a} vs {e} (tolerance {tolerance})\nactual:   {actual:?}\nexpected: {expected:?}"
        );
    }
}
