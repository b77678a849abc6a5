#![allow(dead_code, unused_macros)]
use konstelacio::QamResult;
use konstelacio::chart::{ChartBackend, ChartData};
use konstelacio::render::{ConstellationFrame, RenderSurface};

macro_rules! assert_points_approx {
    ($actual:expr, $expected:expr) => {{
        let actual: Vec<num_complex::Complex<f64>> = $actual.iter().cloned().collect();
        let expected: Vec<num_complex::Complex<f64>> = $expected.iter().cloned().collect();
        assert_eq!(actual.len(), expected.len(), "point counts differ");
        for (idx, (a, e)) in actual.iter().zip(expected.iter()).enumerate() {
            assert!(
                (a - e).norm() < 1e-9,
                "point {} differs: got {}, expected {}",
                idx,
                a,
                e
            );
        }
    }};
}

/// Calls seen by the collaborators, in order.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    Clear,
    Draw(usize),
    Create(usize),
    Destroy(usize),
}

/// A surface that only records what it was asked to do.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    pub events: Vec<Event>,
    pub last: Option<ConstellationFrame>,
}

impl RenderSurface for RecordingSurface {
    fn clear(&mut self) {
        self.events.push(Event::Clear);
        self.last = None;
    }

    fn draw(&mut self, frame: &ConstellationFrame) {
        self.events.push(Event::Draw(frame.markers.len()));
        self.last = Some(frame.clone());
    }
}

/// A chart backend that records every create and destroy.
#[derive(Debug, Default)]
pub struct RecordingCharts {
    pub events: Vec<Event>,
    pub live: Vec<usize>,
    pub last: Option<ChartData>,
    next: usize,
}

impl ChartBackend for RecordingCharts {
    type Handle = usize;

    fn create(&mut self, data: &ChartData) -> QamResult<usize> {
        let id = self.next;
        self.next += 1;
        self.events.push(Event::Create(id));
        self.live.push(id);
        self.last = Some(data.clone());
        Ok(id)
    }

    fn destroy(&mut self, handle: usize) {
        self.events.push(Event::Destroy(handle));
        self.live.retain(|&id| id != handle);
    }
}
