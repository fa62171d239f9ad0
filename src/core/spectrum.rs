use std::fmt::{Display, Formatter, Result};
use std::ops::{Add, AddAssign, Mul, MulAssign, Div, DivAssign, Index};
use crate::core::ember::Float;

const NSPECTRUM_SAMPLES: usize = 3;

#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct Spectrum {
    c: [Float; NSPECTRUM_SAMPLES]
}

impl Spectrum {
    pub fn new(v: Float) -> Self {
        Self { c: [v; NSPECTRUM_SAMPLES] }
    }

    pub fn from_rgb(r: Float, g: Float, b: Float) -> Self {
        Self { c: [r, g, b] }
    }

    pub fn is_black(&self) -> bool {
        self.c.iter().all(|&v| v == 0.0)
    }

    pub fn has_nans(&self) -> bool {
        self.c.iter().any(|v| v.is_nan())
    }

    // CIE luminance of the linear RGB triple
    pub fn y(&self) -> Float {
        0.212671 * self.c[0] + 0.715160 * self.c[1] + 0.072169 * self.c[2]
    }

    pub fn max_component_value(&self) -> Float {
        self.c[0].max(self.c[1]).max(self.c[2])
    }
}

impl Index<usize> for Spectrum {
    type Output = Float;

    fn index(&self, i: usize) -> &Float {
        &self.c[i]
    }
}

impl Add for Spectrum {
    type Output = Spectrum;

    fn add(self, s: Spectrum) -> Spectrum {
        Spectrum { c: [self.c[0] + s.c[0], self.c[1] + s.c[1], self.c[2] + s.c[2]] }
    }
}

impl AddAssign for Spectrum {
    fn add_assign(&mut self, s: Spectrum) {
        for i in 0..NSPECTRUM_SAMPLES { self.c[i] += s.c[i]; }
    }
}

impl Mul for Spectrum {
    type Output = Spectrum;

    fn mul(self, s: Spectrum) -> Spectrum {
        Spectrum { c: [self.c[0] * s.c[0], self.c[1] * s.c[1], self.c[2] * s.c[2]] }
    }
}

impl Mul<Float> for Spectrum {
    type Output = Spectrum;

    fn mul(self, v: Float) -> Spectrum {
        Spectrum { c: [self.c[0] * v, self.c[1] * v, self.c[2] * v] }
    }
}

impl MulAssign for Spectrum {
    fn mul_assign(&mut self, s: Spectrum) {
        for i in 0..NSPECTRUM_SAMPLES { self.c[i] *= s.c[i]; }
    }
}

impl Div<Float> for Spectrum {
    type Output = Spectrum;

    fn div(self, v: Float) -> Spectrum {
        let inv = 1.0 / v;

        Spectrum { c: [self.c[0] * inv, self.c[1] * inv, self.c[2] * inv] }
    }
}

impl DivAssign<Float> for Spectrum {
    fn div_assign(&mut self, v: Float) {
        let inv = 1.0 / v;

        for i in 0..NSPECTRUM_SAMPLES { self.c[i] *= inv; }
    }
}

impl Display for Spectrum {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        write!(f, "[ {}, {}, {} ]", self.c[0], self.c[1], self.c[2])
    }
}
