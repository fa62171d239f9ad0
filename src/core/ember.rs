use std::sync::{Arc, Weak};
use lazy_static::lazy_static;
use indicatif::ProgressBar;
use parking_lot::RwLock;

lazy_static! {
    static ref PB: RwLock<Option<Weak<ProgressBar>>> = RwLock::new(None);
}

pub fn set_progress_bar(pb: Option<Weak<ProgressBar>>) {
    *PB.write() = pb;
}

pub fn get_progress_bar() -> Option<Arc<ProgressBar>> {
    PB.read().as_ref()?.upgrade()
}

pub type Float = f32;

pub const PI        : Float = 3.14159265358979323846;
pub const PI_OVER2  : Float = 1.57079632679489661923;
pub const PI_OVER4  : Float = 0.78539816339744830961;
pub const INV_PI    : Float = 0.31830988618379067154;
pub const INFINITY  : Float = std::f32::INFINITY;
pub const SHADOW_EPSILON: Float = 0.0001;

pub fn clamp<T>(val: T, low: T, high: T) -> T
where T: PartialOrd
{
    if val < low {
        low
    } else if val > high {
        high
    } else {
        val
    }
}
