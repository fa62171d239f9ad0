use log::debug;
use crate::core::ember::Float;
use crate::core::buffers::RenderBuffers;

// Floor for the mean term so flat dark regions don't divide by zero
const MEAN_EPSILON: Float = 1.0e-4;

/// Decides, after a scheduling round, which pixels have stopped changing
/// meaningfully and can be skipped in later rounds.
pub struct AdaptiveSampling {
    pub noise_threshold : Float,
    pub min_samples     : u32
}

impl Default for AdaptiveSampling {
    fn default() -> Self {
        Self {
            noise_threshold: 0.01,
            min_samples: 32
        }
    }
}

impl AdaptiveSampling {
    pub fn new(noise_threshold: Float, min_samples: u32) -> Self {
        Self { noise_threshold, min_samples }
    }

    /// Mark converged pixels and report whether the whole frame converged.
    ///
    /// A pixel converges when the standard error of its luminance mean,
    /// relative to the mean's magnitude, drops under the noise threshold.
    /// Pixels with no samples, or with no more than `min_samples`, are
    /// never marked converged; a variance estimate that young is not
    /// trustworthy even when it reads exactly zero.
    pub fn converge_and_filter(&self, buffers: &RenderBuffers) -> bool {
        let mut all_converged = true;
        let mut newly_converged = 0u64;

        buffers.update_pixels(|px| {
            if px.is_converged() { return; }

            let n = px.samples();

            if n <= self.min_samples {
                all_converged = false;
                return;
            }

            let error = (px.variance() / n as Float).sqrt()
                / px.mean_luminance().abs().max(MEAN_EPSILON);

            if error < self.noise_threshold {
                px.set_converged(true);
                newly_converged += 1;
            } else {
                all_converged = false;
            }
        });

        debug!("Convergence pass marked {} new pixels", newly_converged);

        all_converged
    }
}
