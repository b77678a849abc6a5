use std::num::NonZeroUsize;

use num_complex::Complex;
use rand::Rng;

use crate::noise::NoiseLevel;

mod modulate;
mod perturb;

pub use modulate::Modulate;
pub use perturb::Perturb;

/// Adaptors over streams of constellation points.
pub trait Iter: Iterator<Item = Complex<f64>> + Sized {
    /// Replaces every point with a fresh noisy copy.
    fn perturb<R: Rng>(self, noise: NoiseLevel, rng: R) -> Perturb<Self, R> {
        Perturb::new(self, noise, rng)
    }

    /// Expands every point into `samples_per_symbol` noisy I/Q carrier samples.
    fn modulate<R: Rng>(
        self,
        samples_per_symbol: NonZeroUsize,
        noise: NoiseLevel,
        rng: R,
    ) -> Modulate<Self, R> {
        Modulate::new(self, samples_per_symbol, noise, rng)
    }
}

impl<I: Iterator<Item = Complex<f64>>> Iter for I {}
