use crate::core::ember::{Float, INV_PI, PI_OVER2, PI_OVER4};
use crate::core::geometry::normal::Normal3f;
use crate::core::geometry::point::Point2f;
use crate::core::geometry::vector::Vector3f;

pub fn concentric_sample_disk(u: &Point2f) -> Point2f {
    // Map uniform random numbers to [-1, 1]^2
    let ux = 2.0 * u.x - 1.0;
    let uy = 2.0 * u.y - 1.0;

    // Handle degeneracy at the origin
    if ux == 0.0 && uy == 0.0 {
        return Point2f::new(0.0, 0.0);
    }

    // Apply concentric mapping to point
    let theta: Float;
    let r: Float;

    if ux.abs() > uy.abs() {
        r = ux;
        theta = PI_OVER4 * (uy / ux);
    } else {
        r = uy;
        theta = PI_OVER2 - PI_OVER4 * (ux / uy);
    }

    Point2f::new(r * theta.cos(), r * theta.sin())
}

pub fn cosine_hemisphere_pdf(cos_theta: Float) -> Float {
    cos_theta * INV_PI
}

// Cosine-weighted direction around the shading normal, with its pdf
pub fn sample_cos_hemisphere(n: &Normal3f, u: &Point2f) -> (Vector3f, Float) {
    let d = concentric_sample_disk(u);
    let z = ((0.0 as Float).max(1.0 - d.x * d.x - d.y * d.y)).sqrt();

    let nv = Vector3f::from(*n);
    let (t, b) = nv.coordinate_system();
    let wi = t * d.x + b * d.y + nv * z;

    (wi, cosine_hemisphere_pdf(z))
}
