//! WP3D core library — transform math, mesh, and scene derivation.
//!
//! This crate is the stateless half of the renderer: the `Vector`/`Matrix`
//! transform algebra, the built-in mesh, and the per-frame derivation of the
//! world/view/projection uniform matrices. It knows nothing about WebGL,
//! shaders, or the DOM; `wp3d-web` feeds its exported float arrays to the GPU.

pub mod geometry;
pub mod matrix;
pub mod scene;
pub mod vector;

// Re-export commonly used types
pub use geometry::{Mesh, Vertex};
pub use matrix::Matrix;
pub use scene::{
    CameraParams, FrameMatrices, LightParams, MaterialParams, ModelParams, SceneParams,
};
pub use vector::{cross, Vector};

use thiserror::Error;

/// Errors from malformed-shape construction of math values.
///
/// Only the constructor shape check is an error. Numeric degeneracies
/// (singular inverse, zero-vector normalize, `far == near` projection)
/// propagate as `Inf`/`NaN` per ordinary floating-point arithmetic and are
/// never converted into errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MathError {
    #[error("expected at least {expected} components, got {got}")]
    InvalidArgument { expected: usize, got: usize },
}

/// Convert degrees to radians.
pub fn deg2rad(deg: f32) -> f32 {
    std::f32::consts::PI * deg / 180.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deg2rad() {
        assert!((deg2rad(180.0) - std::f32::consts::PI).abs() < 1e-6);
        assert!((deg2rad(90.0) - std::f32::consts::FRAC_PI_2).abs() < 1e-6);
        assert_eq!(deg2rad(0.0), 0.0);
    }
}
