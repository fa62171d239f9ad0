use std::fmt::{Display, Formatter, Result};
use crate::core::ember::{Float, INV_PI};
use crate::core::closure::{Bsdf, BsdfSample, ScatterFlags, ScatterLabel};
use crate::core::geometry::normal::Normal3f;
use crate::core::geometry::point::Point2f;
use crate::core::geometry::vector::Vector3f;
use crate::core::sampling::sample_cos_hemisphere;
use crate::core::spectrum::Spectrum;

/// Lambertian reflection
#[derive(Debug, Copy, Clone)]
pub struct DiffuseBsdf {
    pub n       : Normal3f,
    pub weight  : Spectrum
}

impl DiffuseBsdf {
    pub fn new(n: Normal3f, weight: Spectrum) -> Self {
        Self { n, weight }
    }
}

impl Bsdf for DiffuseBsdf {
    fn setup(&mut self) -> u8 {
        ScatterFlags::Bsdf as u8 | ScatterFlags::BsdfHasEval as u8
    }

    fn normal(&self) -> Normal3f {
        self.n
    }

    fn sample_weight(&self) -> Spectrum {
        self.weight
    }

    fn eval_reflect(&self, _wo: &Vector3f, wi: &Vector3f) -> (Spectrum, Float) {
        let ndotwi = self.n.dot_vec(wi);

        if ndotwi > 0.0 {
            (Spectrum::new(ndotwi * INV_PI), ndotwi * INV_PI)
        } else {
            (Spectrum::default(), 0.0)
        }
    }

    fn sample(
        &self, ng: &Normal3f, _wo: &Vector3f, dwo_dx: &Vector3f,
        dwo_dy: &Vector3f, u: &Point2f) -> Option<BsdfSample> {
        let (wi, pdf) = sample_cos_hemisphere(&self.n, u);

        if ng.dot_vec(&wi) <= 0.0 {
            return None;
        }

        let nv = Vector3f::from(self.n);

        Some(BsdfSample {
            wi,
            eval: Spectrum::new(self.n.dot_vec(&wi) * INV_PI),
            pdf,
            label: ScatterLabel::Reflect as u8 | ScatterLabel::Diffuse as u8,
            dwi_dx: -(nv * (2.0 * nv.dot(dwo_dx)) - *dwo_dx),
            dwi_dy: -(nv * (2.0 * nv.dot(dwo_dy)) - *dwo_dy)
        })
    }
}

impl Display for DiffuseBsdf {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        write!(f, "[ DiffuseBsdf N: {} weight: {} ]", self.n, self.weight)
    }
}
