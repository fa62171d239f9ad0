use parking_lot::RwLock;
use log::info;
use crate::core::ember::Float;
use crate::core::geometry::bounds::Bounds2i;
use crate::core::geometry::point::Point2i;
use crate::core::spectrum::Spectrum;

/// Per-pixel accumulator state: radiance sum, sample count and an online
/// variance estimator over sample luminance (Welford). The final mean and
/// variance do not depend on accumulation order, which lets samples from
/// different scheduling rounds arrive in any order.
#[derive(Debug, Default, Copy, Clone)]
pub struct PixelStats {
    radiance    : Spectrum,
    samples     : u32,
    mean        : Float,
    m2          : Float,
    converged   : bool
}

impl PixelStats {
    /// Fold one sample in. Every requested sample lands here exactly once,
    /// valid or not; failed paths contribute black.
    pub fn accumulate(&mut self, value: Spectrum) {
        self.radiance += value;
        self.samples += 1;

        let y = value.y();
        let delta = y - self.mean;
        self.mean += delta / self.samples as Float;
        self.m2 += delta * (y - self.mean);
    }

    /// Combine two disjoint accumulations (parallel Welford merge).
    pub fn merge(&mut self, other: &PixelStats) {
        if other.samples == 0 { return; }

        if self.samples == 0 {
            let converged = self.converged;
            *self = *other;
            self.converged = converged;
            return;
        }

        let na = self.samples as Float;
        let nb = other.samples as Float;
        let n = na + nb;
        let delta = other.mean - self.mean;

        self.mean += delta * nb / n;
        self.m2 += other.m2 + delta * delta * na * nb / n;
        self.radiance += other.radiance;
        self.samples += other.samples;
    }

    pub fn samples(&self) -> u32 {
        self.samples
    }

    pub fn mean_luminance(&self) -> Float {
        self.mean
    }

    /// Unbiased sample variance of luminance
    pub fn variance(&self) -> Float {
        if self.samples < 2 {
            0.0
        } else {
            self.m2 / (self.samples - 1) as Float
        }
    }

    pub fn mean_radiance(&self) -> Spectrum {
        if self.samples == 0 {
            Spectrum::default()
        } else {
            self.radiance / self.samples as Float
        }
    }

    pub fn is_converged(&self) -> bool {
        self.converged
    }

    pub fn set_converged(&mut self, converged: bool) {
        self.converged = converged;
    }
}

/// Worker-private accumulator for one in-flight tile. Tiles own disjoint
/// pixel regions, so these never contend; results land in `RenderBuffers`
/// through a single merge when the tile completes.
pub struct TileBuffer {
    bounds: Bounds2i,
    pixels: Vec<PixelStats>
}

impl TileBuffer {
    pub fn new(bounds: Bounds2i) -> Self {
        Self {
            bounds,
            pixels: vec![PixelStats::default(); bounds.area().max(0) as usize]
        }
    }

    pub fn bounds(&self) -> Bounds2i {
        self.bounds
    }

    pub fn accumulate(&mut self, p: &Point2i, value: Spectrum) {
        let offset = self.offset(p);
        self.pixels[offset].accumulate(value);
    }

    pub fn pixel(&self, p: &Point2i) -> &PixelStats {
        &self.pixels[self.offset(p)]
    }

    fn offset(&self, p: &Point2i) -> usize {
        assert!(self.bounds.inside_exclusive(p));

        let width = self.bounds.p_max.x - self.bounds.p_min.x;

        ((p.x - self.bounds.p_min.x) + (p.y - self.bounds.p_min.y) * width) as usize
    }
}

/// Persistent frame-wide pixel statistics shared by all workers.
///
/// Mutation is accumulation only. Concurrent tiles touch disjoint pixels,
/// enforced by the scheduler's tile assignment rather than per-pixel locks;
/// the lock here only serializes whole-tile merges.
pub struct RenderBuffers {
    resolution  : Point2i,
    pixels      : RwLock<Vec<PixelStats>>
}

impl RenderBuffers {
    pub fn new(resolution: Point2i) -> Self {
        info!("Allocating render buffers at {} resolution", resolution);

        Self {
            resolution,
            pixels: RwLock::new(vec![PixelStats::default(); (resolution.x * resolution.y) as usize])
        }
    }

    pub fn resolution(&self) -> Point2i {
        self.resolution
    }

    pub fn pixel_bounds(&self) -> Bounds2i {
        Bounds2i::from_points(&Point2i::new(0, 0), &self.resolution)
    }

    fn offset(&self, p: &Point2i) -> usize {
        (p.x + p.y * self.resolution.x) as usize
    }

    /// Merge one completed tile into the frame statistics.
    pub fn merge_tile(&self, tile: &TileBuffer) {
        let mut pixels = self.pixels.write();

        for p in &tile.bounds() {
            let offset = self.offset(&p);
            pixels[offset].merge(tile.pixel(&p));
        }
    }

    /// Single-sample entry point, equivalent to merging a 1-pixel tile.
    pub fn accumulate(&self, p: &Point2i, value: Spectrum) {
        let offset = self.offset(p);
        self.pixels.write()[offset].accumulate(value);
    }

    pub fn pixel(&self, p: &Point2i) -> PixelStats {
        let offset = self.offset(p);

        self.pixels.read()[offset]
    }

    /// Run `f` over every pixel's statistics under the write lock.
    pub fn update_pixels<F>(&self, mut f: F)
    where F: FnMut(&mut PixelStats)
    {
        let mut pixels = self.pixels.write();

        for p in pixels.iter_mut() { f(p); }
    }

    /// Pixels that still need samples, in buffer offset order.
    pub fn unconverged_mask(&self) -> Vec<bool> {
        self.pixels.read().iter().map(|p| !p.is_converged()).collect()
    }

    /// Snapshot of per-pixel mean radiance for a display/output sink.
    pub fn mean_radiance(&self) -> Vec<Spectrum> {
        self.pixels.read().iter().map(|p| p.mean_radiance()).collect()
    }

    pub fn total_samples(&self) -> u64 {
        self.pixels.read().iter().map(|p| p.samples() as u64).sum()
    }
}
