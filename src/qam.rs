use std::fmt;

use crate::{QamError, QamResult, linspace};
use num_complex::Complex;
use serde::{Deserialize, Serialize};

/// The only non-square order with a hand-authored layout.
pub const CROSS_ORDER: usize = 32;

/// Largest accepted grid side, so at most 1024 x 1024 points.
pub const MAX_GRID_SIDE: usize = 1 << 10;

/// Cross-like 32-QAM layout on a ±3 lattice. Divided by 3 when generated.
const CROSS_32: [(f64, f64); 32] = [
    // Outer 4x4 grid.
    (-3f64, -3f64),
    (-1f64, -3f64),
    (1f64, -3f64),
    (3f64, -3f64),
    (-3f64, -1f64),
    (-1f64, -1f64),
    (1f64, -1f64),
    (3f64, -1f64),
    (-3f64, 1f64),
    (-1f64, 1f64),
    (1f64, 1f64),
    (3f64, 1f64),
    (-3f64, 3f64),
    (-1f64, 3f64),
    (1f64, 3f64),
    (3f64, 3f64),
    // Inner 3x3 grid.
    (-2f64, -2f64),
    (0f64, -2f64),
    (2f64, -2f64),
    (-2f64, 0f64),
    (0f64, 0f64),
    (2f64, 0f64),
    (-2f64, 2f64),
    (0f64, 2f64),
    (2f64, 2f64),
    // Intermediate ring.
    (-1.5, -1.5),
    (1.5, -1.5),
    (-1.5, 1.5),
    (1.5, 1.5),
    (0f64, -1.5),
    (0f64, 1.5),
    (1.5, 0f64),
];

/// A validated modulation order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "usize", into = "usize")]
pub struct ModulationOrder(usize);

impl ModulationOrder {
    /// Orders offered by the order selector.
    pub const SUPPORTED: [usize; 5] = [4, 16, 32, 64, 256];

    pub fn new(m: usize) -> QamResult<Self> {
        if m == CROSS_ORDER || square_side(m).is_some() {
            Ok(Self(m))
        } else {
            Err(QamError::UnsupportedOrder(m))
        }
    }

    /// Number of constellation points.
    pub fn points(self) -> usize {
        self.0
    }

    pub fn bits_per_symbol(self) -> f64 {
        (self.0 as f64).log2()
    }

    /// Side of the square grid, or `None` for the cross layout.
    pub fn grid_side(self) -> Option<usize> {
        square_side(self.0)
    }
}

impl Default for ModulationOrder {
    fn default() -> Self {
        Self(16)
    }
}

impl TryFrom<usize> for ModulationOrder {
    type Error = QamError;

    fn try_from(m: usize) -> QamResult<Self> {
        Self::new(m)
    }
}

impl From<ModulationOrder> for usize {
    fn from(order: ModulationOrder) -> usize {
        order.0
    }
}

impl fmt::Display for ModulationOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-QAM", self.0)
    }
}

fn square_side(m: usize) -> Option<usize> {
    // A 1x1 grid has no spacing to spread over [-1, 1].
    if m < 4 {
        return None;
    }
    let side = m.isqrt();
    (side <= MAX_GRID_SIDE && side * side == m).then_some(side)
}

/// Ideal constellation points for `order`, normalized to [-1, 1] on both axes.
///
/// Square orders are enumerated row-major: the outer loop walks the in-phase
/// axis and the inner loop the quadrature axis.
pub fn generate(order: ModulationOrder) -> Vec<Complex<f64>> {
    match order.grid_side() {
        Some(n) => get_grid_symbols(n),
        None => get_cross_symbols(),
    }
}

fn get_grid_symbols(n: usize) -> Vec<Complex<f64>> {
    linspace(-1f64, 1f64, n)
        .flat_map(|re| linspace(-1f64, 1f64, n).map(move |im| Complex::new(re, im)))
        .collect()
}

fn get_cross_symbols() -> Vec<Complex<f64>> {
    CROSS_32
        .iter()
        .map(|&(re, im)| Complex::new(re / 3f64, im / 3f64))
        .collect()
}
