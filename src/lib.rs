use num_complex::Complex;
use numpy::{IntoPyArray, PyArray1};
use pyo3::prelude::*;

pub mod chart;
pub mod config;
mod error;
pub mod iter;
pub mod noise;
pub mod qam;
pub mod render;
pub mod visualizer;
pub mod waveform;

pub use crate::{
    error::{QamError, QamResult},
    noise::{NoiseLevel, perturb, perturb_all},
    qam::{ModulationOrder, generate},
    waveform::{DEFAULT_SAMPLES_PER_SYMBOL, IqSeries, WaveformSample, synthesize},
};

use crate::{
    chart::ChartData,
    render::{Canvas, DEFAULT_CANVAS_SIZE, DEFAULT_MARKER_RADIUS},
};

/// A symbol in the I/Q plane: `re` is the in-phase axis, `im` the quadrature axis.
pub type Point = Complex<f64>;

#[inline]
pub fn linspace(start: f64, stop: f64, num: usize) -> impl Iterator<Item = f64> {
    let step = (stop - start) / ((num - 1) as f64);
    (0..num).map(move |i| start + step * (i as f64))
}

#[pymodule]
#[pyo3(name = "konstelacio")]
fn module_with_functions(m: &Bound<'_, PyModule>) -> PyResult<()> {
    /// Ideal constellation points for an order.
    #[pyfunction]
    fn generate_points(m: usize) -> PyResult<Vec<Point>> {
        Ok(generate(ModulationOrder::new(m)?))
    }

    /// One noisy copy of every point; noise is a 0-100 percentage.
    #[pyfunction]
    fn add_noise(points: Vec<Point>, noise_percent: f64) -> PyResult<Vec<Point>> {
        let noise = NoiseLevel::from_percent(noise_percent)?;
        Ok(perturb_all(&points, noise, &mut rand::rng()))
    }

    #[pyfunction]
    #[pyo3(signature = (points, noise_percent=0.0, samples_per_symbol=DEFAULT_SAMPLES_PER_SYMBOL))]
    fn synthesize_iq(
        py: Python<'_>,
        points: Vec<Point>,
        noise_percent: f64,
        samples_per_symbol: usize,
    ) -> PyResult<(
        Bound<'_, PyArray1<f64>>,
        Bound<'_, PyArray1<f64>>,
        Bound<'_, PyArray1<f64>>,
    )> {
        let noise = NoiseLevel::from_percent(noise_percent)?;
        let samples = synthesize(&points, noise, samples_per_symbol, rand::rng())?;
        let IqSeries { time, i, q } = IqSeries::from_samples(&samples);
        Ok((time.into_pyarray(py), i.into_pyarray(py), q.into_pyarray(py)))
    }

    /// Line-chart configuration for the I/Q waveform, as JSON.
    #[pyfunction]
    #[pyo3(signature = (points, noise_percent=0.0, samples_per_symbol=DEFAULT_SAMPLES_PER_SYMBOL))]
    fn chart_config(
        points: Vec<Point>,
        noise_percent: f64,
        samples_per_symbol: usize,
    ) -> PyResult<String> {
        let noise = NoiseLevel::from_percent(noise_percent)?;
        let samples = synthesize(&points, noise, samples_per_symbol, rand::rng())?;
        let data = ChartData::from_series(IqSeries::from_samples(&samples));
        Ok(data.to_config().to_string())
    }

    #[pyfunction]
    #[pyo3(signature = (points, canvas_size=DEFAULT_CANVAS_SIZE))]
    fn to_pixels(points: Vec<Point>, canvas_size: f64) -> PyResult<Vec<(f64, f64)>> {
        let canvas = Canvas::new(canvas_size, DEFAULT_MARKER_RADIUS)?;
        Ok(points
            .into_iter()
            .map(|p| {
                let px = canvas.to_pixel(p);
                (px.x, px.y)
            })
            .collect())
    }

    m.add("SUPPORTED_ORDERS", ModulationOrder::SUPPORTED.to_vec())?;
    m.add_function(wrap_pyfunction!(generate_points, m)?)?;
    m.add_function(wrap_pyfunction!(add_noise, m)?)?;
    m.add_function(wrap_pyfunction!(synthesize_iq, m)?)?;
    m.add_function(wrap_pyfunction!(chart_config, m)?)?;
    m.add_function(wrap_pyfunction!(to_pixels, m)?)?;
    Ok(())
}
