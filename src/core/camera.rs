use std::fmt::{Display, Formatter, Result};
use crate::core::ember::Float;
use crate::core::geometry::point::{Point2f, Point3f};
use crate::core::geometry::ray::{Ray, RayDifferential};
use crate::core::geometry::vector::Vector3f;

#[derive(Debug, Default, Copy, Clone)]
pub struct CameraSample {
    pub p_film: Point2f
}

impl Display for CameraSample {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        write!(f, "[ pFilm: {} ]", self.p_film)
    }
}

/// Primary-ray collaborator. Returns the camera ray for a film sample with
/// one-pixel-offset differentials, plus the sample's weight.
pub trait Camera: Send + Sync {
    fn generate_ray_differential(&self, sample: &CameraSample) -> (Ray, Float);
}

/// Orthographic projection: film points map to parallel rays.
pub struct OrthographicCamera {
    /// World position of film point (0, 0)
    pub film_origin : Point3f,
    /// World step per film x unit
    pub du          : Vector3f,
    /// World step per film y unit
    pub dv          : Vector3f,
    /// View direction, shared by every ray
    pub dir         : Vector3f
}

impl OrthographicCamera {
    pub fn new(film_origin: Point3f, du: Vector3f, dv: Vector3f, dir: Vector3f) -> Self {
        Self { film_origin, du, dv, dir: dir.normalize() }
    }
}

impl Camera for OrthographicCamera {
    fn generate_ray_differential(&self, sample: &CameraSample) -> (Ray, Float) {
        let o = self.film_origin
            + self.du * sample.p_film.x
            + self.dv * sample.p_film.y;

        let mut ray = Ray::new(&o, &self.dir);
        ray.diff = Some(RayDifferential {
            rx_origin: o + self.du,
            ry_origin: o + self.dv,
            rx_direction: self.dir,
            ry_direction: self.dir
        });

        (ray, 1.0)
    }
}
