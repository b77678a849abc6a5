use std::f64::consts::PI;
use std::num::NonZeroUsize;

use num_complex::Complex;
use rand::Rng;

use crate::noise::{NoiseLevel, perturb};
use crate::waveform::WaveformSample;

/// Carrier samples for a stream of symbols.
///
/// Noise is drawn per sample, not per symbol, so each carrier period is
/// dithered sample by sample.
pub struct Modulate<I: Iterator<Item = Complex<f64>>, R: Rng> {
    source: I,
    samples_per_symbol: usize,
    noise: NoiseLevel,
    rng: R,
    symbol: Option<Complex<f64>>,
    symbol_idx: usize,
    sample_idx: usize,
}

impl<I: Iterator<Item = Complex<f64>>, R: Rng> Modulate<I, R> {
    pub fn new(
        source: I,
        samples_per_symbol: NonZeroUsize,
        noise: NoiseLevel,
        rng: R,
    ) -> Modulate<I, R> {
        Self {
            source,
            samples_per_symbol: samples_per_symbol.get(),
            noise,
            rng,
            symbol: None,
            symbol_idx: 0,
            sample_idx: 0,
        }
    }
}

impl<I: Iterator<Item = Complex<f64>>, R: Rng> Iterator for Modulate<I, R> {
    type Item = WaveformSample;

    fn next(&mut self) -> Option<WaveformSample> {
        if self.sample_idx == 0 {
            self.symbol = Some(self.source.next()?);
        }
        let symbol = self.symbol?;

        let t = self.sample_idx as f64 / self.samples_per_symbol as f64;
        let noisy = perturb(symbol, self.noise, &mut self.rng);
        let sample = WaveformSample {
            time: t + self.symbol_idx as f64,
            i: noisy.re * (2f64 * PI * t).cos(),
            q: noisy.im * (2f64 * PI * t).sin(),
        };

        self.sample_idx += 1;
        if self.sample_idx == self.samples_per_symbol {
            self.sample_idx = 0;
            self.symbol_idx += 1;
        }
        Some(sample)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let (lo, hi) = self.source.size_hint();
        // Samples left in the symbol currently being expanded.
        let pending = if self.sample_idx == 0 {
            0
        } else {
            self.samples_per_symbol - self.sample_idx
        };
        (
            lo.saturating_mul(self.samples_per_symbol).saturating_add(pending),
            hi.and_then(|hi| hi.checked_mul(self.samples_per_symbol))
                .and_then(|hi| hi.checked_add(pending)),
        )
    }
}
