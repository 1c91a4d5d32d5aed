//! Per-frame scene parameters and uniform matrix derivation.

use crate::deg2rad;
use crate::matrix::Matrix;

/// Model transform parameters. Angles are in degrees, the unit the form
/// inputs use.
#[derive(Debug, Clone, Copy, Default)]
pub struct ModelParams {
    pub position: [f32; 3],
    /// Fixed orientation offset, applied after the animated rotation.
    pub rotated: [f32; 3],
    /// Animated rotation speed, degrees per frame.
    pub rotating: [f32; 3],
}

/// Camera parameters for the look-at view transform.
#[derive(Debug, Clone, Copy)]
pub struct CameraParams {
    pub position: [f32; 3],
    pub look_at: [f32; 3],
    pub up: [f32; 3],
}

impl Default for CameraParams {
    fn default() -> Self {
        Self {
            position: [0.0, 0.0, 5.0],
            look_at: [0.0, 0.0, 0.0],
            up: [0.0, 1.0, 0.0],
        }
    }
}

/// Point light position and color channels.
#[derive(Debug, Clone, Copy)]
pub struct LightParams {
    pub position: [f32; 3],
    pub ambient: [f32; 3],
    pub diffuse: [f32; 3],
    pub specular: [f32; 3],
}

impl Default for LightParams {
    fn default() -> Self {
        Self {
            position: [0.0, 10.0, 10.0],
            ambient: [0.2, 0.2, 0.2],
            diffuse: [1.0, 1.0, 1.0],
            specular: [1.0, 1.0, 1.0],
        }
    }
}

/// Phong material color channels and shininess exponent.
#[derive(Debug, Clone, Copy)]
pub struct MaterialParams {
    pub ambient: [f32; 3],
    pub diffuse: [f32; 3],
    pub specular: [f32; 3],
    pub shininess: f32,
}

impl Default for MaterialParams {
    fn default() -> Self {
        Self {
            ambient: [0.3, 0.3, 0.3],
            diffuse: [0.8, 0.2, 0.2],
            specular: [1.0, 1.0, 1.0],
            shininess: 30.0,
        }
    }
}

/// Everything the scene-parameter provider supplies for one frame.
#[derive(Debug, Clone, Copy, Default)]
pub struct SceneParams {
    pub model: ModelParams,
    pub camera: CameraParams,
    pub light: LightParams,
    pub material: MaterialParams,
}

/// Homogeneous uniform form of a parameter triple: `[x, y, z, 1]`.
pub fn to_vec4(t: [f32; 3]) -> [f32; 4] {
    [t[0], t[1], t[2], 1.0]
}

/// Vertical field of view of the projection, degrees.
const FOV_DEG: f32 = 45.0;
const NEAR: f32 = 1.0;
const FAR: f32 = 1000.0;

/// The matrix set uploaded as shader uniforms each frame.
#[derive(Debug, Clone, Copy)]
pub struct FrameMatrices {
    pub world: Matrix,
    pub view: Matrix,
    pub proj: Matrix,
    /// Inverse-transpose of the world matrix, for normal transformation.
    pub world_it: Matrix,
}

impl FrameMatrices {
    /// Derives the per-frame matrix set. `frame` is the animation frame
    /// counter scaling the `rotating` speeds into accumulated angles.
    ///
    /// The shader applies matrices to row vectors (`v * M`), which transposes
    /// the product and runs the chain left to right: scale, fixed XYZ
    /// rotation, animated XYZ rotation, then translation. Vertices rotate in
    /// place before the model moves to its position.
    pub fn derive(scene: &SceneParams, aspect: f32, frame: f32) -> Self {
        let m = &scene.model;
        let world = Matrix::scaler(1.0, 1.0, 1.0)
            .mul(&Matrix::rotator_x(deg2rad(m.rotated[0])))
            .mul(&Matrix::rotator_y(deg2rad(m.rotated[1])))
            .mul(&Matrix::rotator_z(deg2rad(m.rotated[2])))
            .mul(&Matrix::rotator_x(deg2rad(m.rotating[0] * frame)))
            .mul(&Matrix::rotator_y(deg2rad(m.rotating[1] * frame)))
            .mul(&Matrix::rotator_z(deg2rad(m.rotating[2] * frame)))
            .mul(&Matrix::translator(m.position[0], m.position[1], m.position[2]));
        let view = Matrix::view(&scene.camera.position, &scene.camera.look_at, &scene.camera.up);
        let proj = Matrix::perse(deg2rad(FOV_DEG), aspect, NEAR, FAR);
        let world_it = world.inverse().transpose();
        Self {
            world,
            view,
            proj,
            world_it,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vector::Vector;

    fn assert_matrix_close(a: &Matrix, b: &Matrix, eps: f32) {
        for i in 0..4 {
            for j in 0..4 {
                assert!((a.at(i, j) - b.at(i, j)).abs() < eps, "({i}, {j})");
            }
        }
    }

    #[test]
    fn test_at_rest_world_is_identity() {
        let scene = SceneParams::default();
        let frame = FrameMatrices::derive(&scene, 1.0, 0.0);
        assert_matrix_close(&frame.world, &Matrix::identity(), 1e-6);
        assert_matrix_close(&frame.world_it, &Matrix::identity(), 1e-5);
    }

    #[test]
    fn test_rotating_accumulates_with_frame_counter() {
        let scene = SceneParams {
            model: ModelParams {
                rotating: [0.0, 0.0, 1.0],
                ..Default::default()
            },
            ..Default::default()
        };
        // 90 frames at 1 degree per frame: a quarter turn about Z
        let frame = FrameMatrices::derive(&scene, 1.0, 90.0);
        let v = frame.world.mulv(&Vector::from([1.0, 0.0, 0.0, 1.0]));
        assert!(v.x().abs() < 1e-5);
        assert!((v.y() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_shader_applied_world_rotates_before_translating() {
        let scene = SceneParams {
            model: ModelParams {
                position: [10.0, 0.0, 0.0],
                rotated: [0.0; 3],
                rotating: [0.0, 0.0, 1.0],
            },
            ..Default::default()
        };
        let frame = FrameMatrices::derive(&scene, 1.0, 90.0);
        // the shader applies `v * world`; on column vectors that is the
        // transpose, so check the transform the vertices actually see
        let world_t = frame.world.transpose();
        // the model origin lands at the model position, not on an orbit
        let origin = world_t.mulv(&Vector::from([0.0, 0.0, 0.0, 1.0]));
        assert!((origin.x() - 10.0).abs() < 1e-4);
        assert!(origin.y().abs() < 1e-4);
        assert!(origin.z().abs() < 1e-4);
        // a unit-x vertex spins in place first, then moves with the model
        let spun = world_t.mulv(&Vector::from([1.0, 0.0, 0.0, 1.0]));
        assert!((spun.x() - 10.0).abs() < 1e-4);
        assert!((spun.y() + 1.0).abs() < 1e-4);
        assert!(spun.z().abs() < 1e-4);
    }

    #[test]
    fn test_world_it_is_inverse_transpose() {
        let scene = SceneParams {
            model: ModelParams {
                position: [1.0, 2.0, 3.0],
                rotated: [10.0, 20.0, 30.0],
                rotating: [0.0; 3],
            },
            ..Default::default()
        };
        let frame = FrameMatrices::derive(&scene, 1.0, 0.0);
        let expected = frame.world.inverse().transpose();
        assert_matrix_close(&frame.world_it, &expected, 1e-6);
        // world * world_it^T recovers identity
        let recovered = frame.world.mul(&frame.world_it.transpose());
        assert_matrix_close(&recovered, &Matrix::identity(), 1e-4);
    }

    #[test]
    fn test_view_and_proj_use_scene_parameters() {
        let scene = SceneParams::default();
        let frame = FrameMatrices::derive(&scene, 2.0, 0.0);
        let t = 1.0 / deg2rad(45.0).tan();
        assert!((frame.proj.at(0, 0) - t).abs() < 1e-5);
        assert!((frame.proj.at(1, 1) - t * 2.0).abs() < 1e-5);
        // default camera sits 5 units behind the origin along +z
        assert!((frame.view.at(3, 2) - 5.0).abs() < 1e-5);
    }

    #[test]
    fn test_to_vec4() {
        assert_eq!(to_vec4([1.0, 2.0, 3.0]), [1.0, 2.0, 3.0, 1.0]);
    }
}
