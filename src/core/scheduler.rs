use std::fmt::{Display, Formatter};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use anyhow::Result;
use crossbeam::crossbeam_channel::bounded;
use crossbeam::queue::SegQueue;
use log::{info, debug, error};
use rayon::prelude::*;
use crate::core::ember::{Float, SHADOW_EPSILON, get_progress_bar};
use crate::core::adaptive::AdaptiveSampling;
use crate::core::buffers::{RenderBuffers, TileBuffer};
use crate::core::camera::{Camera, CameraSample};
use crate::core::closure::{Bsdf, select_closure};
use crate::core::context::{PathState, RenderContext};
use crate::core::geometry::bounds::Bounds2i;
use crate::core::geometry::point::{Point2f, Point2i};
use crate::core::geometry::ray::{Ray, RayDifferential};
use crate::core::geometry::vector::Vector3f;
use crate::core::scene::{ClosureRegistry, SceneProvider};
use crate::core::spectrum::Spectrum;

/// One scheduling unit: a rectangular pixel region, a sample range and the
/// region's location in the target buffer. Immutable once dispatched and
/// owned by a single worker for the duration of that dispatch.
#[derive(Debug, Copy, Clone)]
pub struct WorkTile {
    pub x           : usize,
    pub y           : usize,
    pub width       : usize,
    pub height      : usize,
    pub start_sample: usize,
    pub samples_num : usize,
    pub offset      : usize,
    pub stride      : usize
}

impl WorkTile {
    pub fn bounds(&self) -> Bounds2i {
        Bounds2i::from_points(
            &Point2i::new(self.x as isize, self.y as isize),
            &Point2i::new((self.x + self.width) as isize, (self.y + self.height) as isize))
    }

    pub fn pixel_index(&self, p: &Point2i) -> usize {
        self.offset
            + (p.y as usize - self.y) * self.stride
            + (p.x as usize - self.x)
    }
}

impl Display for WorkTile {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f, "[ {} samples [{}, {}) ]",
            self.bounds(), self.start_sample, self.start_sample + self.samples_num)
    }
}

pub struct RenderSettings {
    pub tile_size   : usize,
    pub max_depth   : usize,
    pub rr_threshold: Float,
    pub adaptive    : AdaptiveSampling
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            tile_size: 16,
            max_depth: 5,
            rr_threshold: 1.0,
            adaptive: AdaptiveSampling::default()
        }
    }
}

/// Drives the render loop: partitions the frame into work tiles, binds one
/// render context per worker and runs the per-pixel sampling pipeline over
/// a rayon pool. Finished tile buffers flow back over a channel and merge
/// into the shared frame statistics.
pub struct PathRenderer {
    camera  : Arc<dyn Camera>,
    buffers : Arc<RenderBuffers>,
    contexts: SegQueue<RenderContext>,
    cancel  : Arc<AtomicBool>,
    settings: RenderSettings
}

impl PathRenderer {
    /// Construct a render session. Builds one context per worker in the
    /// current rayon pool; any failure here aborts the session.
    pub fn new(
        scene: Arc<dyn SceneProvider>,
        registry: Arc<dyn ClosureRegistry>,
        camera: Arc<dyn Camera>,
        buffers: Arc<RenderBuffers>,
        cancel: Arc<AtomicBool>,
        settings: RenderSettings) -> Result<Self> {
        let workers = rayon::current_num_threads();
        let contexts = SegQueue::new();

        for _ in 0..workers {
            contexts.push(RenderContext::acquire(scene.clone(), registry.clone())?);
        }

        info!("Render session initialized with {} worker contexts", workers);

        Ok(Self {
            camera,
            buffers,
            contexts,
            cancel,
            settings
        })
    }

    pub fn buffers(&self) -> Arc<RenderBuffers> {
        self.buffers.clone()
    }

    /// Shared cooperative cancellation flag, polled between tiles only.
    pub fn cancel_flag(&self) -> Arc<AtomicBool> {
        self.cancel.clone()
    }

    pub fn request_cancel(&self) {
        self.cancel.store(true, Ordering::Relaxed);
    }

    /// Partition the frame into row-major tiles carrying the given sample
    /// range. Tile regions never overlap, which is what makes lock-free
    /// concurrent accumulation safe.
    pub fn work_tiles(&self, start_sample: usize, samples_num: usize) -> Vec<WorkTile> {
        let res = self.buffers.resolution();
        let tile_size = self.settings.tile_size;
        let ntiles_x = (res.x as usize + tile_size - 1) / tile_size;
        let ntiles_y = (res.y as usize + tile_size - 1) / tile_size;
        let mut tiles = Vec::with_capacity(ntiles_x * ntiles_y);

        for ty in 0..ntiles_y {
            for tx in 0..ntiles_x {
                let x = tx * tile_size;
                let y = ty * tile_size;

                tiles.push(WorkTile {
                    x, y,
                    width: tile_size.min(res.x as usize - x),
                    height: tile_size.min(res.y as usize - y),
                    start_sample,
                    samples_num,
                    offset: y * res.x as usize + x,
                    stride: res.x as usize
                });
            }
        }

        tiles
    }

    /// Render one scheduling round: every unconverged pixel gets the
    /// samples in `[start_sample, start_sample + samples_num)`.
    pub fn render_samples(&self, start_sample: usize, samples_num: usize) {
        if samples_num == 0 { return; }

        let tiles = self.work_tiles(start_sample, samples_num);
        let unconverged = self.buffers.unconverged_mask();
        let (sendt, recvt) = bounded(tiles.len());

        info!("Rendering {} tiles, samples [{}, {})",
              tiles.len(), start_sample, start_sample + samples_num);

        tiles
            .par_iter()
            .for_each(|tile| {
                // Cancellation is tile-granular. An in-flight tile always
                // runs to completion so pixel statistics stay unbiased
                if self.cancel.load(Ordering::Relaxed) { return; }

                let mut ctx = self.contexts.pop()
                    .expect("worker render context");
                let tile_buffer =
                    self.render_samples_full_pipeline(&mut ctx, tile, &unconverged);
                self.contexts.push(ctx);

                sendt.send(tile_buffer).unwrap();

                if let Some(pb) = get_progress_bar() { pb.inc(1); }
            });

        drop(sendt);

        while let Ok(tile_buffer) = recvt.recv() {
            self.buffers.merge_tile(&tile_buffer);
        }
    }

    /// Report convergence after a round and mark finished pixels so later
    /// rounds skip them.
    pub fn converge_and_filter(&self) -> bool {
        self.settings.adaptive.converge_and_filter(&self.buffers)
    }

    /// Core path tracing routine: runs the requested sample range for every
    /// unconverged pixel of one tile into a worker-private buffer.
    fn render_samples_full_pipeline(
        &self, ctx: &mut RenderContext, tile: &WorkTile,
        unconverged: &[bool]) -> TileBuffer {
        let bounds = tile.bounds();
        let mut tile_buffer = TileBuffer::new(bounds);

        info!("Starting work tile {}", tile);

        for pixel in &bounds {
            let pixel_index = tile.pixel_index(&pixel);
            if !unconverged[pixel_index] { continue; }

            for sample in tile.start_sample..tile.start_sample + tile.samples_num {
                ctx.start_sample(pixel_index, sample);

                let value = self.trace_sample(ctx, &pixel, sample, tile.samples_num);

                // Exactly one accumulation per requested sample, whether
                // or not the path produced a usable contribution
                tile_buffer.accumulate(&pixel, value);
            }
        }

        info!("Finished work tile {}", tile);

        tile_buffer
    }

    fn trace_sample(
        &self, ctx: &mut RenderContext, pixel: &Point2i,
        sample: usize, samples_num: usize) -> Spectrum {
        // Generate camera ray for the current sample
        let jitter = ctx.rng.uniform_2d();
        let camera_sample = CameraSample {
            p_film: Point2f::new(
                pixel.x as Float + jitter.x,
                pixel.y as Float + jitter.y)
        };
        let (mut ray, ray_weight) = self.camera.generate_ray_differential(&camera_sample);
        ray.scale_differentials(1.0 / (samples_num as Float).sqrt());

        if ray_weight <= 0.0 { return Spectrum::default(); }

        let mut value = self.li(ctx, ray) * ray_weight;

        // A numerically failed path contributes exactly zero, never
        // partial or garbage values
        if value.has_nans() {
            error!(
                "Not-a-number radiance value returned for pixel {}, sample {}. \
                Setting to black", pixel, sample);
            value = Spectrum::default();
        } else if value.y() < -1.0e-5 {
            error!(
                "Negative luminance value, {}, returned for pixel {}, sample {}. \
                Setting to black.", value.y(), pixel, sample);
            value = Spectrum::default();
        } else if value.y().is_infinite() {
            error!(
                "Infinite luminance value returned for pixel {}, sample {}. \
                Setting to black.", pixel, sample);
            value = Spectrum::default();
        }

        value
    }

    /// Radiance along one camera ray
    fn li(&self, ctx: &mut RenderContext, ray: Ray) -> Spectrum {
        let mut L = Spectrum::default();
        let mut path = PathState::new(ray);

        loop {
            debug!("Path bounce {}, beta = {}", path.bounces, path.throughput);

            let hit = match ctx.scene.intersect(&path.ray) {
                Some(hit) => hit,
                None => {
                    // Ray escaped; pick up the environment and finish
                    L += ctx.scene.environment(&path.ray) * path.throughput;
                    break;
                }
            };

            if path.bounces >= self.settings.max_depth { break; }

            // Pick one closure from the registry's stack at this vertex
            let closures = ctx.registry.closures_at(&hit);
            let u_select = ctx.rng.uniform_float();
            let (closure, pick_pdf) = match select_closure(&closures, u_select) {
                Some(c) => c,
                None => break
            };

            let wo = -path.ray.d;
            let (dwo_dx, dwo_dy) = match path.ray.diff {
                Some(ref d) => (-d.rx_direction - wo, -d.ry_direction - wo),
                None => (Vector3f::default(), Vector3f::default())
            };

            // Sample the closure for the next direction. An invalid
            // direction terminates the branch; it is not an error
            let u = ctx.rng.uniform_2d();
            let bs = match closure.sample(&hit.ng, &wo, &dwo_dx, &dwo_dy, &u) {
                Some(bs) => bs,
                None => break
            };

            if bs.pdf == 0.0 || bs.eval.is_black() { break; }

            path.throughput *= closure.sample_weight() * bs.eval / (bs.pdf * pick_pdf);
            debug!("Sampled closure {}, label {:#04x}, pdf = {}, beta = {}",
                   closure, bs.label, bs.pdf, path.throughput);

            if path.throughput.has_nans() { break; }

            // Spawn the continuation ray, nudged off the surface
            let o = hit.p + Vector3f::from(hit.ng) * SHADOW_EPSILON;
            let mut next = Ray::new(&o, &bs.wi);
            next.diff = path.ray.diff.map(|_| RayDifferential {
                rx_origin: o,
                ry_origin: o,
                rx_direction: bs.wi + bs.dwi_dx,
                ry_direction: bs.wi + bs.dwi_dy
            });
            path.ray = next;

            // Possibly terminate the path with Russian roulette
            if path.throughput.max_component_value() < self.settings.rr_threshold
                && path.bounces > 3 {
                let q = (1.0 - path.throughput.max_component_value()).max(0.05);
                if ctx.rng.uniform_float() < q { break; }
                path.throughput /= 1.0 - q;
            }

            path.bounces += 1;
        }

        L
    }
}
