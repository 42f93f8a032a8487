//! Time series segmentation
//!
//! Reduces a raw series to an ordered partition of contiguous segments
//! that approximate it. Each segment later becomes one musical event.

mod bottom_up;

pub use bottom_up::{regression_error, segment};

/// A contiguous run of samples borrowed from a series
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment<'a> {
    offset: usize,
    samples: &'a [f64],
}

impl<'a> Segment<'a> {
    /// Create a segment covering `series[offset..offset + len]`
    fn new(series: &'a [f64], offset: usize, len: usize) -> Self {
        Self {
            offset,
            samples: &series[offset..offset + len],
        }
    }

    /// Index of the first sample within the original series
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Index one past the last sample within the original series
    pub fn end(&self) -> usize {
        self.offset + self.samples.len()
    }

    /// Number of samples in this segment
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Always false for segments produced by [`segment`]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// The samples of this segment
    pub fn samples(&self) -> &'a [f64] {
        self.samples
    }
}

/// Number of segments a series of length `n` should be reduced to
///
/// Shorter series keep a larger share of their resolution:
/// half below 100 samples, 35% below 200, a quarter beyond that.
/// Rounds half away from zero and never returns less than 1.
pub fn target_segment_count(n: usize) -> usize {
    let ratio = if n < 100 {
        0.50
    } else if n < 200 {
        0.35
    } else {
        0.25
    };

    ((ratio * n as f64).round() as usize).max(1)
}
