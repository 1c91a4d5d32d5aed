//! 4-component float vector.

use crate::MathError;

/// A 4-component vector `(x, y, z, w)`.
///
/// Value type: every operation returns a new `Vector` and never mutates an
/// operand. The in-place setters exist for staging components while a value
/// is being built locally. `normalize` runs over all 4 components, so callers
/// set `w` to 0 for directions and 1 for points before normalizing when the
/// distinction matters downstream.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vector {
    v: [f32; 4],
}

impl Vector {
    /// Builds a vector from the first 4 components of `raw`.
    pub fn new(raw: &[f32]) -> Result<Self, MathError> {
        if raw.len() < 4 {
            return Err(MathError::InvalidArgument {
                expected: 4,
                got: raw.len(),
            });
        }
        Ok(Self {
            v: [raw[0], raw[1], raw[2], raw[3]],
        })
    }

    /// The zero vector, same as `Default`.
    pub fn zero() -> Self {
        Self::default()
    }

    /// Flat export, suitable for direct upload as a `vec4` uniform.
    pub fn get(&self) -> [f32; 4] {
        self.v
    }

    pub fn at(&self, i: usize) -> f32 {
        self.v[i]
    }

    pub fn x(&self) -> f32 {
        self.v[0]
    }

    pub fn y(&self) -> f32 {
        self.v[1]
    }

    pub fn z(&self) -> f32 {
        self.v[2]
    }

    pub fn w(&self) -> f32 {
        self.v[3]
    }

    pub fn set_at(&mut self, i: usize, val: f32) {
        self.v[i] = val;
    }

    pub fn set_x(&mut self, x: f32) {
        self.v[0] = x;
    }

    pub fn set_y(&mut self, y: f32) {
        self.v[1] = y;
    }

    pub fn set_z(&mut self, z: f32) {
        self.v[2] = z;
    }

    pub fn set_w(&mut self, w: f32) {
        self.v[3] = w;
    }

    /// Divides every component by the 4-component Euclidean norm.
    ///
    /// The all-zero vector yields NaN components (division by zero); that is
    /// intentional pass-through numeric behavior, not an error.
    pub fn normalize(&self) -> Self {
        let mag =
            (self.x() * self.x() + self.y() * self.y() + self.z() * self.z() + self.w() * self.w())
                .sqrt();
        Self {
            v: [
                self.x() / mag,
                self.y() / mag,
                self.z() / mag,
                self.w() / mag,
            ],
        }
    }

    pub fn add(&self, u: &Vector) -> Self {
        Self {
            v: [
                self.x() + u.x(),
                self.y() + u.y(),
                self.z() + u.z(),
                self.w() + u.w(),
            ],
        }
    }

    /// Scales every component by `s`.
    pub fn muls(&self, s: f32) -> Self {
        Self {
            v: [self.x() * s, self.y() * s, self.z() * s, self.w() * s],
        }
    }

    /// Component-wise product.
    pub fn mul(&self, u: &Vector) -> Self {
        Self {
            v: [
                self.x() * u.x(),
                self.y() * u.y(),
                self.z() * u.z(),
                self.w() * u.w(),
            ],
        }
    }

    pub fn dot(&self, u: &Vector) -> f32 {
        self.x() * u.x() + self.y() * u.y() + self.z() * u.z() + self.w() * u.w()
    }
}

impl From<[f32; 4]> for Vector {
    fn from(v: [f32; 4]) -> Self {
        Self { v }
    }
}

/// 3D cross product of the xyz parts; the result's w is always 0, whatever
/// the operands' w components are.
pub fn cross(v: &Vector, u: &Vector) -> Vector {
    Vector::from([
        v.y() * u.z() - v.z() * u.y(),
        v.z() * u.x() - v.x() * u.z(),
        v.x() * u.y() - v.y() * u.x(),
        0.0,
    ])
}
