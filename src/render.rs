//! Mapping from the normalized I/Q plane to a square pixel canvas.

use num_complex::Complex;
use serde::{Deserialize, Serialize};

use crate::{QamError, QamResult};

pub const DEFAULT_CANVAS_SIZE: f64 = 400f64;
pub const DEFAULT_MARKER_RADIUS: f64 = 5f64;

/// Marker center in pixels, origin at the top-left corner.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PixelPoint {
    pub x: f64,
    pub y: f64,
}

/// Square drawing area.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Canvas {
    size: f64,
    marker_radius: f64,
}

impl Canvas {
    pub fn new(size: f64, marker_radius: f64) -> QamResult<Canvas> {
        if !(size.is_finite() && size > 0f64) {
            return Err(QamError::InvalidCanvas(size));
        }
        if !(marker_radius.is_finite() && marker_radius >= 0f64) {
            return Err(QamError::InvalidCanvas(marker_radius));
        }
        Ok(Canvas {
            size,
            marker_radius,
        })
    }

    pub fn size(&self) -> f64 {
        self.size
    }

    pub fn marker_radius(&self) -> f64 {
        self.marker_radius
    }

    /// `px = (x + 1) * size / 2`, `py = (1 - y) * size / 2`.
    #[inline]
    pub fn to_pixel(&self, point: Complex<f64>) -> PixelPoint {
        let half = self.size / 2f64;
        PixelPoint {
            x: (point.re + 1f64) * half,
            y: (1f64 - point.im) * half,
        }
    }

    /// Top-left corner of the marker box centered on `point`.
    pub fn marker_origin(&self, point: Complex<f64>) -> PixelPoint {
        let center = self.to_pixel(point);
        PixelPoint {
            x: center.x - self.marker_radius,
            y: center.y - self.marker_radius,
        }
    }

    /// Pairs every ideal point with its noisy counterpart in pixel space.
    pub fn frame(&self, ideal: &[Complex<f64>], noisy: &[Complex<f64>]) -> ConstellationFrame {
        let markers = ideal
            .iter()
            .zip(noisy.iter())
            .map(|(&ideal, &noisy)| MarkerPair {
                ideal: self.to_pixel(ideal),
                noisy: self.to_pixel(noisy),
            })
            .collect();
        ConstellationFrame {
            canvas: *self,
            markers,
        }
    }
}

impl Default for Canvas {
    fn default() -> Canvas {
        Canvas {
            size: DEFAULT_CANVAS_SIZE,
            marker_radius: DEFAULT_MARKER_RADIUS,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct MarkerPair {
    pub ideal: PixelPoint,
    pub noisy: PixelPoint,
}

/// Everything drawn on the canvas for one parameter set.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ConstellationFrame {
    pub canvas: Canvas,
    pub markers: Vec<MarkerPair>,
}

/// A drawing target for constellation markers.
pub trait RenderSurface {
    /// Removes every marker from the previous frame.
    fn clear(&mut self);

    fn draw(&mut self, frame: &ConstellationFrame);
}

/// Keeps the markers of the last frame in memory.
#[derive(Clone, Debug, Default)]
pub struct MarkerBuffer {
    frame: Option<ConstellationFrame>,
    clears: usize,
}

impl MarkerBuffer {
    pub fn new() -> MarkerBuffer {
        MarkerBuffer::default()
    }

    pub fn frame(&self) -> Option<&ConstellationFrame> {
        self.frame.as_ref()
    }

    pub fn markers(&self) -> &[MarkerPair] {
        match &self.frame {
            Some(frame) => &frame.markers,
            None => &[],
        }
    }

    /// Number of times the surface has been cleared.
    pub fn clears(&self) -> usize {
        self.clears
    }
}

impl RenderSurface for MarkerBuffer {
    fn clear(&mut self) {
        self.frame = None;
        self.clears += 1;
    }

    fn draw(&mut self, frame: &ConstellationFrame) {
        match &mut self.frame {
            Some(current) => current.markers.extend_from_slice(&frame.markers),
            None => self.frame = Some(frame.clone()),
        }
    }
}
