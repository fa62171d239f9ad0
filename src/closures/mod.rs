pub mod diffuse;
pub mod principled_diffuse;

use crate::core::ember::{Float, clamp};

// Schlick's approximation weight (1 - cos)^5
pub fn schlick_weight(cos_theta: Float) -> Float {
    let m = clamp(1.0 - cos_theta, 0.0, 1.0);

    (m * m) * (m * m) * m
}
