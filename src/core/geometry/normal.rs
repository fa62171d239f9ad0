use std::fmt::{Display, Formatter, Result};
use std::ops::Neg;
use crate::core::ember::Float;
use crate::core::geometry::vector::Vector3f;

#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct Normal3f {
    pub x: Float,
    pub y: Float,
    pub z: Float
}

impl Normal3f {
    pub fn new(x: Float, y: Float, z: Float) -> Self {
        Self { x, y, z }
    }

    #[inline(always)]
    pub fn dot_vec(&self, v: &Vector3f) -> Float {
        self.x * v.x + self.y * v.y + self.z * v.z
    }

    #[inline(always)]
    pub fn dot(&self, n: &Normal3f) -> Float {
        self.x * n.x + self.y * n.y + self.z * n.z
    }

    pub fn normalize(&self) -> Normal3f {
        let len = self.dot(self).sqrt();

        Normal3f::new(self.x / len, self.y / len, self.z / len)
    }
}

impl From<Vector3f> for Normal3f {
    fn from(v: Vector3f) -> Self {
        Normal3f::new(v.x, v.y, v.z)
    }
}

impl Neg for Normal3f {
    type Output = Normal3f;

    fn neg(self) -> Normal3f {
        Normal3f::new(-self.x, -self.y, -self.z)
    }
}

impl Display for Normal3f {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        write!(f, "[ {}, {}, {} ]", self.x, self.y, self.z)
    }
}
