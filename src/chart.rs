//! I/Q line chart data and the lifecycle of the live chart instance.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{QamResult, waveform::IqSeries};

pub const I_LABEL: &str = "I component";
pub const Q_LABEL: &str = "Q component";
const I_COLOR: &str = "rgba(75, 192, 192, 1)";
const Q_COLOR: &str = "rgba(192, 75, 75, 1)";

/// One line on the chart.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dataset {
    pub label: String,
    pub data: Vec<f64>,
    pub border_color: String,
    pub border_width: u32,
    pub fill: bool,
    pub point_radius: u32,
    pub tension: f64,
}

impl Dataset {
    fn line(label: &str, color: &str, data: Vec<f64>) -> Dataset {
        Dataset {
            label: label.to_string(),
            data,
            border_color: color.to_string(),
            border_width: 1,
            fill: false,
            point_radius: 0,
            tension: 0.1,
        }
    }
}

/// The I and Q series keyed by a shared time axis.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChartData {
    pub labels: Vec<f64>,
    pub datasets: Vec<Dataset>,
    pub x_title: String,
    pub y_title: String,
}

impl ChartData {
    pub fn from_series(series: IqSeries) -> ChartData {
        let IqSeries { time, i, q } = series;
        ChartData {
            labels: time,
            datasets: vec![
                Dataset::line(I_LABEL, I_COLOR, i),
                Dataset::line(Q_LABEL, Q_COLOR, q),
            ],
            x_title: "Time".to_string(),
            y_title: "Amplitude".to_string(),
        }
    }

    pub fn dataset(&self, label: &str) -> Option<&Dataset> {
        self.datasets.iter().find(|d| d.label == label)
    }

    /// A line-chart configuration with a linear time axis.
    pub fn to_config(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "line",
            "data": {
                "labels": self.labels,
                "datasets": self.datasets,
            },
            "options": {
                "responsive": true,
                "scales": {
                    "x": {
                        "type": "linear",
                        "position": "bottom",
                        "title": { "display": true, "text": self.x_title },
                    },
                    "y": {
                        "title": { "display": true, "text": self.y_title },
                    },
                },
            },
        })
    }
}

/// A charting library that owns rendered chart instances.
pub trait ChartBackend {
    type Handle;

    fn create(&mut self, data: &ChartData) -> QamResult<Self::Handle>;

    /// Releases every resource held by `handle`.
    fn destroy(&mut self, handle: Self::Handle);
}

/// Owner of at most one live chart.
pub struct SignalChart<B: ChartBackend> {
    backend: B,
    live: Option<B::Handle>,
}

impl<B: ChartBackend> SignalChart<B> {
    pub fn new(backend: B) -> SignalChart<B> {
        SignalChart {
            backend,
            live: None,
        }
    }

    /// Destroys the current chart, if any, then creates its replacement.
    pub fn redraw(&mut self, data: &ChartData) -> QamResult<&B::Handle> {
        if let Some(old) = self.live.take() {
            tracing::trace!("destroying previous chart");
            self.backend.destroy(old);
        }
        let handle = self.backend.create(data)?;
        Ok(self.live.insert(handle))
    }

    pub fn handle(&self) -> Option<&B::Handle> {
        self.live.as_ref()
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }
}

impl<B: ChartBackend> Drop for SignalChart<B> {
    fn drop(&mut self) {
        if let Some(handle) = self.live.take() {
            self.backend.destroy(handle);
        }
    }
}

/// In-memory chart backend keyed by chart id.
#[derive(Debug, Default)]
pub struct RetainedCharts {
    next_id: usize,
    live: BTreeMap<usize, ChartData>,
    destroyed: usize,
}

impl RetainedCharts {
    pub fn new() -> RetainedCharts {
        RetainedCharts::default()
    }

    pub fn get(&self, id: usize) -> Option<&ChartData> {
        self.live.get(&id)
    }

    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    pub fn destroyed(&self) -> usize {
        self.destroyed
    }
}

impl ChartBackend for RetainedCharts {
    type Handle = usize;

    fn create(&mut self, data: &ChartData) -> QamResult<usize> {
        let id = self.next_id;
        self.next_id += 1;
        self.live.insert(id, data.clone());
        Ok(id)
    }

    fn destroy(&mut self, handle: usize) {
        if self.live.remove(&handle).is_some() {
            self.destroyed += 1;
        }
    }
}

impl<B: ChartBackend> ChartBackend for &mut B {
    type Handle = B::Handle;

    fn create(&mut self, data: &ChartData) -> QamResult<B::Handle> {
        (**self).create(data)
    }

    fn destroy(&mut self, handle: B::Handle) {
        (**self).destroy(handle)
    }
}
