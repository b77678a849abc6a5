//! Recomputes and redraws the constellation and waveform on every change.

use num_complex::Complex;
use rand::Rng;

use crate::{
    QamError, QamResult,
    chart::{ChartBackend, ChartData, SignalChart},
    config::VisualizerConfig,
    noise::{NoiseLevel, perturb_all},
    qam::{ModulationOrder, generate},
    render::{Canvas, RenderSurface},
    waveform::{IqSeries, WaveformSample, synthesize},
};

/// Everything computed for one parameter set.
#[derive(Clone, Debug, PartialEq)]
pub struct Snapshot {
    pub order: ModulationOrder,
    pub noise: NoiseLevel,
    pub ideal: Vec<Complex<f64>>,
    pub noisy: Vec<Complex<f64>>,
    pub samples: Vec<WaveformSample>,
}

pub struct Visualizer<S: RenderSurface, B: ChartBackend, R: Rng> {
    order: ModulationOrder,
    noise: NoiseLevel,
    samples_per_symbol: usize,
    canvas: Canvas,
    surface: S,
    chart: SignalChart<B>,
    rng: R,
}

impl<S: RenderSurface, B: ChartBackend, R: Rng> Visualizer<S, B, R> {
    /// Starts at 16-QAM without noise and draws the first frame.
    pub fn new(surface: S, backend: B, rng: R) -> QamResult<Self> {
        Self::with_config(&VisualizerConfig::default(), surface, backend, rng)
    }

    pub fn with_config(
        config: &VisualizerConfig,
        surface: S,
        backend: B,
        rng: R,
    ) -> QamResult<Self> {
        config.validate()?;
        let mut visualizer = Visualizer {
            order: config.order,
            noise: config.noise()?,
            samples_per_symbol: config.samples_per_symbol,
            canvas: config.canvas()?,
            surface,
            chart: SignalChart::new(backend),
            rng,
        };
        visualizer.redraw()?;
        Ok(visualizer)
    }

    pub fn order(&self) -> ModulationOrder {
        self.order
    }

    pub fn noise(&self) -> NoiseLevel {
        self.noise
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn chart(&self) -> &SignalChart<B> {
        &self.chart
    }

    /// Selects a new order and redraws.
    ///
    /// A failed redraw restores the previous order. The surface may still
    /// hold the frame drawn for the rejected one.
    pub fn set_order(&mut self, m: usize) -> QamResult<Snapshot> {
        let previous = std::mem::replace(&mut self.order, ModulationOrder::new(m)?);
        self.redraw().inspect_err(|_| self.order = previous)
    }

    /// Sets noise from a slider percentage in [0, 100] and redraws.
    ///
    /// A failed redraw restores the previous noise level.
    pub fn set_noise_percent(&mut self, percent: f64) -> QamResult<Snapshot> {
        let previous = std::mem::replace(&mut self.noise, NoiseLevel::from_percent(percent)?);
        self.redraw().inspect_err(|_| self.noise = previous)
    }

    pub fn set_samples_per_symbol(&mut self, samples_per_symbol: usize) -> QamResult<Snapshot> {
        if samples_per_symbol == 0 {
            return Err(QamError::ZeroSamplesPerSymbol);
        }
        let previous = std::mem::replace(&mut self.samples_per_symbol, samples_per_symbol);
        self.redraw().inspect_err(|_| self.samples_per_symbol = previous)
    }

    /// Recomputes everything from the current parameters.
    ///
    /// The surface is cleared before drawing and the previous chart is
    /// destroyed before its replacement is created.
    pub fn redraw(&mut self) -> QamResult<Snapshot> {
        tracing::debug!(
            order = usize::from(self.order),
            noise = self.noise.level(),
            "redrawing constellation"
        );

        let ideal = generate(self.order);
        let noisy = perturb_all(&ideal, self.noise, &mut self.rng);

        self.surface.clear();
        self.surface.draw(&self.canvas.frame(&ideal, &noisy));

        let samples = synthesize(&ideal, self.noise, self.samples_per_symbol, &mut self.rng)?;
        self.chart
            .redraw(&ChartData::from_series(IqSeries::from_samples(&samples)))?;

        Ok(Snapshot {
            order: self.order,
            noise: self.noise,
            ideal,
            noisy,
            samples,
        })
    }
}

impl<S: RenderSurface, B: ChartBackend, R: Rng> std::fmt::Debug for Visualizer<S, B, R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Visualizer")
            .field("order", &self.order)
            .field("noise", &self.noise)
            .field("samples_per_symbol", &self.samples_per_symbol)
            .field("canvas", &self.canvas)
            .finish_non_exhaustive()
    }
}
