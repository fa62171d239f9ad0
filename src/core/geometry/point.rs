use std::fmt::{Display, Formatter, Result};
use std::ops::{Add, Sub, Index};
use crate::core::ember::Float;
use crate::core::geometry::vector::Vector3f;

#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Point2i {
    pub x: isize,
    pub y: isize
}

impl Point2i {
    pub fn new(x: isize, y: isize) -> Self {
        Self { x, y }
    }
}

impl Sub for Point2i {
    type Output = Point2i;

    fn sub(self, p: Point2i) -> Point2i {
        Point2i::new(self.x - p.x, self.y - p.y)
    }
}

impl Display for Point2i {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        write!(f, "[ {}, {} ]", self.x, self.y)
    }
}

#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct Point2f {
    pub x: Float,
    pub y: Float
}

impl Point2f {
    pub fn new(x: Float, y: Float) -> Self {
        Self { x, y }
    }
}

impl Index<usize> for Point2f {
    type Output = Float;

    fn index(&self, i: usize) -> &Float {
        match i {
            0 => &self.x,
            _ => &self.y
        }
    }
}

impl Display for Point2f {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        write!(f, "[ {}, {} ]", self.x, self.y)
    }
}

#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct Point3f {
    pub x: Float,
    pub y: Float,
    pub z: Float
}

impl Point3f {
    pub fn new(x: Float, y: Float, z: Float) -> Self {
        Self { x, y, z }
    }
}

impl Add<Vector3f> for Point3f {
    type Output = Point3f;

    fn add(self, v: Vector3f) -> Point3f {
        Point3f::new(self.x + v.x, self.y + v.y, self.z + v.z)
    }
}

impl Sub for Point3f {
    type Output = Vector3f;

    fn sub(self, p: Point3f) -> Vector3f {
        Vector3f::new(self.x - p.x, self.y - p.y, self.z - p.z)
    }
}

impl Display for Point3f {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        write!(f, "[ {}, {}, {} ]", self.x, self.y, self.z)
    }
}
