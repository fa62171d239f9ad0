use std::fmt::{Display, Formatter, Result};
use crate::core::geometry::point::Point2i;

#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct Bounds2i {
    pub p_min: Point2i,
    pub p_max: Point2i
}

impl Bounds2i {
    pub fn from_points(p1: &Point2i, p2: &Point2i) -> Self {
        Self {
            p_min: Point2i::new(p1.x.min(p2.x), p1.y.min(p2.y)),
            p_max: Point2i::new(p1.x.max(p2.x), p1.y.max(p2.y))
        }
    }

    pub fn diagonal(&self) -> Point2i {
        self.p_max - self.p_min
    }

    pub fn area(&self) -> isize {
        let d = self.diagonal();

        d.x * d.y
    }

    pub fn inside_exclusive(&self, p: &Point2i) -> bool {
        p.x >= self.p_min.x && p.x < self.p_max.x &&
        p.y >= self.p_min.y && p.y < self.p_max.y
    }

    pub fn overlaps(&self, b: &Bounds2i) -> bool {
        self.p_min.x < b.p_max.x && self.p_max.x > b.p_min.x &&
        self.p_min.y < b.p_max.y && self.p_max.y > b.p_min.y
    }
}

pub struct Bounds2iIterator {
    bounds  : Bounds2i,
    p       : Point2i
}

impl Iterator for Bounds2iIterator {
    type Item = Point2i;

    fn next(&mut self) -> Option<Point2i> {
        if self.bounds.p_min.x >= self.bounds.p_max.x { return None; }
        if self.p.y >= self.bounds.p_max.y { return None; }

        let res = self.p;
        self.p.x += 1;

        if self.p.x >= self.bounds.p_max.x {
            self.p.x = self.bounds.p_min.x;
            self.p.y += 1;
        }

        Some(res)
    }
}

impl IntoIterator for &Bounds2i {
    type Item = Point2i;
    type IntoIter = Bounds2iIterator;

    fn into_iter(self) -> Bounds2iIterator {
        Bounds2iIterator {
            bounds: *self,
            p: self.p_min
        }
    }
}

impl Display for Bounds2i {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        write!(f, "[ {} - {} ]", self.p_min, self.p_max)
    }
}
