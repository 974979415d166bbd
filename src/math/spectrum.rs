// Copyright 2020 @TwoCookingMice

use super::constants::{Float, Vector3f};

pub type RGBSpectrum = Vector3f;

pub trait Spectrum {
    fn black() -> Self;
    fn gray(v: Float) -> Self;
    fn is_black(&self) -> bool;
    fn max_value(&self) -> Float;
    /// Component-wise 1/x, zero channels stay zero.
    fn inverse(&self) -> Self;
    fn luminance(&self) -> Float;
}

impl Spectrum for RGBSpectrum {
    fn black() -> Self {
        Vector3f::zeros()
    }

    fn gray(v: Float) -> Self {
        Vector3f::new(v, v, v)
    }

    fn is_black(&self) -> bool {
        self.iter().all(|c| *c == 0.0)
    }

    fn max_value(&self) -> Float {
        self.x.max(self.y).max(self.z)
    }

    fn inverse(&self) -> Self {
        self.map(|c| if c != 0.0 { 1.0 / c } else { 0.0 })
    }

    fn luminance(&self) -> Float {
        0.2126 * self.x + 0.7152 * self.y + 0.0722 * self.z
    }
}

#[cfg(test)]
mod tests {
    use super::{RGBSpectrum, Spectrum};

    #[test]
    fn test_inverse_keeps_zero_channels() {
        let c = RGBSpectrum::new(2.0, 0.0, 0.5);
        let inv = c.inverse();
        assert_eq!(inv, RGBSpectrum::new(0.5, 0.0, 2.0));
        assert!(RGBSpectrum::black().is_black());
        assert!(!c.is_black());
        assert_eq!(c.max_value(), 2.0);
    }
}
