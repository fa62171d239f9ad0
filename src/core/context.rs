use std::sync::Arc;
use anyhow::Result;
use crate::core::geometry::ray::Ray;
use crate::core::rng::RNG;
use crate::core::scene::{ClosureRegistry, SceneProvider};
use crate::core::spectrum::Spectrum;

/// Per-worker copy of the state the sampling loop needs, suitable for
/// concurrent use from multiple threads.
///
/// Each worker owns exactly one context for the whole session; the
/// scheduler hands contexts out through a queue so no two workers ever
/// share one, and shading math runs without any locking.
pub struct RenderContext {
    pub rng     : RNG,
    pub scene   : Arc<dyn SceneProvider>,
    pub registry: Arc<dyn ClosureRegistry>
}

impl RenderContext {
    /// Build one worker's context at session start. Failure here is fatal
    /// for the render session.
    pub fn acquire(
        scene: Arc<dyn SceneProvider>,
        registry: Arc<dyn ClosureRegistry>) -> Result<Self> {
        Ok(Self {
            rng: RNG::default(),
            scene,
            registry
        })
    }

    /// Reseed for one (pixel, sample) pair. Deterministic regardless of
    /// which worker ends up tracing the path.
    pub fn start_sample(&mut self, pixel_index: usize, sample: usize) {
        self.rng.set_sequence(((pixel_index as u64) << 32) | sample as u64);
    }
}

/// Transient state of one light path, discarded at termination.
pub struct PathState {
    pub ray         : Ray,
    pub throughput  : Spectrum,
    pub bounces     : usize
}

impl PathState {
    pub fn new(ray: Ray) -> Self {
        Self {
            ray,
            throughput: Spectrum::new(1.0),
            bounces: 0
        }
    }
}
