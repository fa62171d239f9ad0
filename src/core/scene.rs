use crate::core::ember::Float;
use crate::core::closure::ClosureStack;
use crate::core::geometry::normal::Normal3f;
use crate::core::geometry::point::{Point2f, Point3f};
use crate::core::geometry::ray::Ray;
use crate::core::spectrum::Spectrum;

/// Nearest intersection reported by a scene provider.
#[derive(Debug, Default, Copy, Clone)]
pub struct Hit {
    pub p       : Point3f,
    pub t       : Float,
    pub uv      : Point2f,
    /// Shading normal (may differ from `ng` under bump/normal mapping)
    pub ns      : Normal3f,
    /// Geometric normal
    pub ng      : Normal3f,
    pub prim_id : usize
}

/// Ray-casting collaborator. The renderer treats intersection as opaque;
/// acceleration structures live behind this trait.
pub trait SceneProvider: Send + Sync {
    /// Nearest hit along the ray, or None on a miss.
    fn intersect(&self, ray: &Ray) -> Option<Hit>;

    /// Radiance picked up by rays that escape the scene.
    fn environment(&self, ray: &Ray) -> Spectrum;
}

/// Material collaborator: the ordered list of active closures at a hit.
pub trait ClosureRegistry: Send + Sync {
    fn closures_at(&self, hit: &Hit) -> ClosureStack;
}
