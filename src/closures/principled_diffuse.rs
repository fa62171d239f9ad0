use std::fmt::{Display, Formatter, Result};
use crate::core::ember::{Float, INV_PI, clamp};
use crate::core::closure::{Bsdf, BsdfSample, ScatterFlags, ScatterLabel};
use crate::core::geometry::normal::Normal3f;
use crate::core::geometry::point::Point2f;
use crate::core::geometry::vector::Vector3f;
use crate::core::sampling::sample_cos_hemisphere;
use crate::core::spectrum::Spectrum;
use crate::closures::schlick_weight;

/// Principled diffuse term of the Disney BRDF.
///
/// Shading model by Brent Burley: "Physically Based Shading at Disney" (2012)
#[derive(Debug, Copy, Clone)]
pub struct PrincipledDiffuseBsdf {
    pub n           : Normal3f,
    pub weight      : Spectrum,
    pub roughness   : Float
}

impl PrincipledDiffuseBsdf {
    pub fn new(n: Normal3f, weight: Spectrum, roughness: Float) -> Self {
        Self { n, weight, roughness }
    }

    fn brdf(&self, v: &Vector3f, l: &Vector3f) -> Spectrum {
        let ndotl = self.n.dot_vec(l);

        if ndotl <= 0.0 {
            return Spectrum::default();
        }

        let ndotv = self.n.dot_vec(v);

        // H = normalize(L + V);  // Bisector of an angle between L and V.
        // LH2 = 2 * dot(L, H)^2 = 2cos(x)^2 = cos(2x) + 1 = dot(L, V) + 1,
        // half-angle x between L and V is at most 90 deg
        let lh2 = l.dot(v) + 1.0;

        let fl = schlick_weight(ndotl);
        let fv = schlick_weight(ndotv);
        let fd90 = 0.5 + lh2 * self.roughness;
        let fd = (1.0 - fl + fd90 * fl) * (1.0 - fv + fd90 * fv);

        Spectrum::new(INV_PI * ndotl * fd)
    }
}

impl Bsdf for PrincipledDiffuseBsdf {
    fn setup(&mut self) -> u8 {
        self.roughness = clamp(self.roughness, 0.0, 1.0);

        ScatterFlags::Bsdf as u8 | ScatterFlags::BsdfHasEval as u8
    }

    fn normal(&self) -> Normal3f {
        self.n
    }

    fn sample_weight(&self) -> Spectrum {
        self.weight
    }

    fn eval_reflect(&self, wo: &Vector3f, wi: &Vector3f) -> (Spectrum, Float) {
        let ndotwi = self.n.dot_vec(wi);

        if ndotwi > 0.0 {
            (self.brdf(wo, wi), ndotwi * INV_PI)
        } else {
            (Spectrum::default(), 0.0)
        }
    }

    fn sample(
        &self, ng: &Normal3f, wo: &Vector3f, dwo_dx: &Vector3f,
        dwo_dy: &Vector3f, u: &Point2f) -> Option<BsdfSample> {
        let (wi, pdf) = sample_cos_hemisphere(&self.n, u);

        if ng.dot_vec(&wi) <= 0.0 {
            return None;
        }

        let nv = Vector3f::from(self.n);

        Some(BsdfSample {
            wi,
            eval: self.brdf(wo, &wi),
            pdf,
            label: ScatterLabel::Reflect as u8 | ScatterLabel::Diffuse as u8,
            // TODO: find a better approximation for the diffuse bounce
            dwi_dx: -(nv * (2.0 * nv.dot(dwo_dx)) - *dwo_dx),
            dwi_dy: -(nv * (2.0 * nv.dot(dwo_dy)) - *dwo_dy)
        })
    }
}

impl Display for PrincipledDiffuseBsdf {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        write!(f, "[ PrincipledDiffuseBsdf N: {} roughness: {} ]", self.n, self.roughness)
    }
}
