use crate::error::{Error, Result};

/// Uniform discretization of a 1-D continuous state into a fixed number of bins
///
/// A state `x` maps to `clamp(round(x * (bins - 1) / range), 0, bins - 1)`, so `0`
/// lands in the first bin and `range` in the last.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StateBins {
    bins: usize,
    range: f64,
}

impl StateBins {
    /// **Errors** if `bins` is zero or `range` is not finite and positive
    pub fn new(bins: usize, range: f64) -> Result<Self> {
        if bins == 0 {
            return Err(Error::EmptySpace("state"));
        }
        if !(range.is_finite() && range > 0.0) {
            return Err(Error::InvalidStateRange(range));
        }
        Ok(Self { bins, range })
    }

    /// Map a continuous state to its bin index
    ///
    /// NaN states map to bin `0`.
    pub fn index(&self, state: f64) -> usize {
        let last = (self.bins - 1) as f64;
        // `as` saturates and sends NaN to 0
        (state * last / self.range).round().clamp(0.0, last) as usize
    }

    pub fn len(&self) -> usize {
        self.bins
    }

    pub fn is_empty(&self) -> bool {
        self.bins == 0
    }

    pub fn range(&self) -> f64 {
        self.range
    }
}

/// A finite set of real-valued actions addressed by index
#[derive(Debug, Clone, PartialEq)]
pub struct ActionGrid {
    values: Vec<f64>,
}

impl ActionGrid {
    /// `n` evenly spaced values over `[start, end]`, both endpoints included
    pub fn linspace(start: f64, end: f64, n: usize) -> Result<Self> {
        if n == 0 {
            return Err(Error::EmptySpace("action"));
        }
        if !(start.is_finite() && end.is_finite()) {
            return Err(Error::InvalidGrid { start, end });
        }
        let values = match n {
            1 => vec![start],
            _ => {
                let step = (end - start) / (n - 1) as f64;
                (0..n)
                    .map(|i| if i == n - 1 { end } else { start + step * i as f64 })
                    .collect()
            }
        };
        Ok(Self { values })
    }

    /// The action value at `index`
    ///
    /// **Panics** if `index` is out of bounds
    pub fn value(&self, index: usize) -> f64 {
        self.values[index]
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Spacing between neighbouring values, `0` for a single-value grid
    pub fn resolution(&self) -> f64 {
        match self.values.as_slice() {
            [first, second, ..] => (second - first).abs(),
            _ => 0.0,
        }
    }
}
