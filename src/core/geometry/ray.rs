use std::fmt::{Display, Formatter, Result};
use crate::core::ember::{Float, INFINITY};
use crate::core::geometry::point::Point3f;
use crate::core::geometry::vector::Vector3f;

#[derive(Debug, Default, Copy, Clone)]
pub struct RayDifferential {
    pub rx_origin   : Point3f,
    pub ry_origin   : Point3f,
    pub rx_direction: Vector3f,
    pub ry_direction: Vector3f
}

#[derive(Debug, Clone)]
pub struct Ray {
    pub o       : Point3f,
    pub d       : Vector3f,
    pub t_max   : Float,
    pub diff    : Option<RayDifferential>
}

impl Default for Ray {
    fn default() -> Self {
        Self {
            o: Point3f::default(),
            d: Vector3f::default(),
            t_max: INFINITY,
            diff: None
        }
    }
}

impl Ray {
    pub fn new(o: &Point3f, d: &Vector3f) -> Self {
        Self {
            o: *o,
            d: *d,
            t_max: INFINITY,
            diff: None
        }
    }

    pub fn find_point(&self, t: Float) -> Point3f {
        self.o + self.d * t
    }

    pub fn scale_differentials(&mut self, s: Float) {
        if let Some(ref mut diff) = self.diff {
            diff.rx_origin = self.o + (diff.rx_origin - self.o) * s;
            diff.ry_origin = self.o + (diff.ry_origin - self.o) * s;
            diff.rx_direction = self.d + (diff.rx_direction - self.d) * s;
            diff.ry_direction = self.d + (diff.ry_direction - self.d) * s;
        }
    }
}

impl Display for Ray {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        write!(f, "[ o: {}, d: {}, t_max: {} ]", self.o, self.d, self.t_max)
    }
}
