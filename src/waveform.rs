//! Time-domain I/Q waveform synthesized from constellation points.

use std::num::NonZeroUsize;

use itertools::Itertools;
use num_complex::Complex;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::{QamError, QamResult, iter::Iter, noise::NoiseLevel};

pub const DEFAULT_SAMPLES_PER_SYMBOL: usize = 100;

/// One carrier sample. `time` is measured in symbol periods.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct WaveformSample {
    pub time: f64,
    pub i: f64,
    pub q: f64,
}

/// Column layout of a waveform, as consumed by a line chart.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct IqSeries {
    pub time: Vec<f64>,
    pub i: Vec<f64>,
    pub q: Vec<f64>,
}

impl IqSeries {
    pub fn from_samples(samples: &[WaveformSample]) -> IqSeries {
        let (time, i, q): (Vec<f64>, Vec<f64>, Vec<f64>) =
            samples.iter().map(|s| (s.time, s.i, s.q)).multiunzip();
        IqSeries { time, i, q }
    }

    pub fn len(&self) -> usize {
        self.time.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }
}

/// Synthesizes `samples_per_symbol` I/Q samples for every point, in order.
///
/// Sample `i` of symbol `k` has phase `t = i / samples_per_symbol` and is
/// labelled `t + k`. Every sample carries its own noise draw.
pub fn synthesize<R: Rng>(
    points: &[Complex<f64>],
    noise: NoiseLevel,
    samples_per_symbol: usize,
    rng: R,
) -> QamResult<Vec<WaveformSample>> {
    let sps = NonZeroUsize::new(samples_per_symbol).ok_or(QamError::ZeroSamplesPerSymbol)?;
    Ok(points.iter().cloned().modulate(sps, noise, rng).collect())
}
