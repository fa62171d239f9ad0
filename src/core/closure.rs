use enum_dispatch::enum_dispatch;
use smallvec::SmallVec;
use static_assertions::const_assert;
use std::fmt::{Display, Formatter, Result};
use crate::core::ember::Float;
use crate::core::geometry::normal::Normal3f;
use crate::core::geometry::point::Point2f;
use crate::core::geometry::vector::Vector3f;
use crate::core::spectrum::Spectrum;
use crate::closures::diffuse::DiffuseBsdf;
use crate::closures::principled_diffuse::PrincipledDiffuseBsdf;

pub const MAX_CLOSURES: usize = 8;

// Closures are inline fixed-layout values. Adding a variant must never
// push the sum type past this bound
pub const MAX_CLOSURE_SIZE: usize = 48;

const_assert!(std::mem::size_of::<ShaderClosures>() <= MAX_CLOSURE_SIZE);

#[repr(u8)]
#[derive(Copy, Clone)]
pub enum ScatterFlags {
    Bsdf        = 1 << 0,
    BsdfHasEval = 1 << 1
}

#[repr(u8)]
#[derive(Copy, Clone)]
pub enum ScatterLabel {
    Reflect     = 1 << 0,
    Transmit    = 1 << 1,
    Diffuse     = 1 << 2,
    Glossy      = 1 << 3,
    Singular    = 1 << 4
}

/// A direction drawn from a closure's importance-sampling scheme.
///
/// `sample` returns `None` instead when the drawn direction falls below the
/// geometric normal; a `BsdfSample` is always a usable path continuation,
/// which keeps invalid directions distinguishable from valid zero results.
pub struct BsdfSample {
    pub wi      : Vector3f,
    pub eval    : Spectrum,
    pub pdf     : Float,
    pub label   : u8,
    pub dwi_dx  : Vector3f,
    pub dwi_dy  : Vector3f
}

/// Uniform evaluate/sample contract every reflectance model implements.
///
/// Evaluation never fails: directions on the wrong side of the shading
/// normal and components a model does not have (e.g. transmission for an
/// opaque diffuse term) yield a zero contribution with zero pdf.
#[enum_dispatch(ShaderClosures)]
pub trait Bsdf {
    /// Clamp/normalize parameters in place and report capability flags.
    fn setup(&mut self) -> u8;

    fn normal(&self) -> Normal3f;

    fn sample_weight(&self) -> Spectrum;

    /// Scattering value and pdf for a fixed outgoing/incoming pair,
    /// reflection side. The value includes the incoming cosine.
    fn eval_reflect(&self, wo: &Vector3f, wi: &Vector3f) -> (Spectrum, Float);

    fn eval_transmit(&self, _wo: &Vector3f, _wi: &Vector3f) -> (Spectrum, Float) {
        (Spectrum::default(), 0.0)
    }

    /// Draw an incoming direction. `ng` is the geometric normal, distinct
    /// from the shading normal so bump-mapped shading cannot send paths
    /// through the surface.
    fn sample(
        &self, ng: &Normal3f, wo: &Vector3f, dwo_dx: &Vector3f,
        dwo_dy: &Vector3f, u: &Point2f) -> Option<BsdfSample>;
}

#[enum_dispatch]
#[derive(Copy, Clone)]
pub enum ShaderClosures {
    Diffuse(DiffuseBsdf),
    PrincipledDiffuse(PrincipledDiffuseBsdf)
}

impl Display for ShaderClosures {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        match self {
            ShaderClosures::Diffuse(ref b) => write!(f, "{}", b),
            ShaderClosures::PrincipledDiffuse(ref b) => write!(f, "{}", b)
        }
    }
}

/// Active closures at a shading point, ordered as the registry emitted them.
pub type ClosureStack = SmallVec<[ShaderClosures; MAX_CLOSURES]>;

/// Pick one closure proportional to its sample weight. Returns the closure
/// and the discrete probability it was picked with, or None for an empty or
/// all-black stack.
pub fn select_closure(stack: &ClosureStack, u: Float) -> Option<(&ShaderClosures, Float)> {
    let total: Float = stack.iter().map(|c| c.sample_weight().y().abs()).sum();
    if total <= 0.0 { return None; }

    let mut cdf = 0.0;
    let target = u * total;

    for (i, c) in stack.iter().enumerate() {
        let w = c.sample_weight().y().abs();
        cdf += w;

        if target < cdf || i + 1 == stack.len() {
            return Some((c, w / total));
        }
    }

    None
}
