use num_complex::Complex;
use rand::Rng;

use crate::noise::{NoiseLevel, perturb};

pub struct Perturb<I: Iterator<Item = Complex<f64>>, R: Rng> {
    source: I,
    noise: NoiseLevel,
    rng: R,
}

impl<I: Iterator<Item = Complex<f64>>, R: Rng> Perturb<I, R> {
    pub fn new(source: I, noise: NoiseLevel, rng: R) -> Perturb<I, R> {
        Self { source, noise, rng }
    }
}

impl<I: Iterator<Item = Complex<f64>>, R: Rng> Iterator for Perturb<I, R> {
    type Item = Complex<f64>;

    fn next(&mut self) -> Option<Complex<f64>> {
        Some(perturb(self.source.next()?, self.noise, &mut self.rng))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.source.size_hint()
    }
}
