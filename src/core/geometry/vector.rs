use std::fmt::{Display, Formatter, Result};
use std::ops::{Add, AddAssign, Sub, Neg, Mul, Div};
use crate::core::ember::Float;
use crate::core::geometry::normal::Normal3f;

#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct Vector3f {
    pub x: Float,
    pub y: Float,
    pub z: Float
}

impl Vector3f {
    pub fn new(x: Float, y: Float, z: Float) -> Self {
        Self { x, y, z }
    }

    #[inline(always)]
    pub fn dot(&self, v: &Vector3f) -> Float {
        self.x * v.x + self.y * v.y + self.z * v.z
    }

    #[inline(always)]
    pub fn dot_norm(&self, n: &Normal3f) -> Float {
        self.x * n.x + self.y * n.y + self.z * n.z
    }

    pub fn cross(&self, v: &Vector3f) -> Vector3f {
        Vector3f::new(
            self.y * v.z - self.z * v.y,
            self.z * v.x - self.x * v.z,
            self.x * v.y - self.y * v.x)
    }

    #[inline(always)]
    pub fn length_squared(&self) -> Float {
        self.dot(self)
    }

    #[inline(always)]
    pub fn length(&self) -> Float {
        self.length_squared().sqrt()
    }

    pub fn normalize(&self) -> Vector3f {
        *self / self.length()
    }

    pub fn has_nans(&self) -> bool {
        self.x.is_nan() || self.y.is_nan() || self.z.is_nan()
    }

    // Build the rest of an orthonormal frame around self. self must be normalized
    pub fn coordinate_system(&self) -> (Vector3f, Vector3f) {
        let v2 = if self.x.abs() > self.y.abs() {
            Vector3f::new(-self.z, 0.0, self.x) /
                (self.x * self.x + self.z * self.z).sqrt()
        } else {
            Vector3f::new(0.0, self.z, -self.y) /
                (self.y * self.y + self.z * self.z).sqrt()
        };

        (v2, self.cross(&v2))
    }
}

impl From<Normal3f> for Vector3f {
    fn from(n: Normal3f) -> Self {
        Vector3f::new(n.x, n.y, n.z)
    }
}

impl Add for Vector3f {
    type Output = Vector3f;

    fn add(self, v: Vector3f) -> Vector3f {
        Vector3f::new(self.x + v.x, self.y + v.y, self.z + v.z)
    }
}

impl AddAssign for Vector3f {
    fn add_assign(&mut self, v: Vector3f) {
        self.x += v.x;
        self.y += v.y;
        self.z += v.z;
    }
}

impl Sub for Vector3f {
    type Output = Vector3f;

    fn sub(self, v: Vector3f) -> Vector3f {
        Vector3f::new(self.x - v.x, self.y - v.y, self.z - v.z)
    }
}

impl Neg for Vector3f {
    type Output = Vector3f;

    fn neg(self) -> Vector3f {
        Vector3f::new(-self.x, -self.y, -self.z)
    }
}

impl Mul<Float> for Vector3f {
    type Output = Vector3f;

    fn mul(self, s: Float) -> Vector3f {
        Vector3f::new(self.x * s, self.y * s, self.z * s)
    }
}

impl Div<Float> for Vector3f {
    type Output = Vector3f;

    fn div(self, s: Float) -> Vector3f {
        let inv = 1.0 / s;

        Vector3f::new(self.x * inv, self.y * inv, self.z * inv)
    }
}

impl Display for Vector3f {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        write!(f, "[ {}, {}, {} ]", self.x, self.y, self.z)
    }
}
