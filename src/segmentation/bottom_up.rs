//! Bottom-up segmentation
//!
//! Starts from a fine partition of two-sample segments and repeatedly merges
//! the adjacent pair whose union is best approximated by a straight line,
//! until the target segment count is reached.

use super::{target_segment_count, Segment};
use crate::error::{Result, SonifyError};
use crate::stats::{argmin, mean, sum};

/// Mean squared error of the least squares line through `samples`
///
/// Sample indices are used as X. A single sample fits any line exactly.
pub fn regression_error(samples: &[f64]) -> f64 {
    let n = samples.len();
    if n < 2 {
        return 0.0;
    }

    let x_bar = (n - 1) as f64 / 2.0;
    let y_bar = sum(samples) / n as f64;

    let (sxy, sxx) = samples
        .iter()
        .enumerate()
        .fold((0.0, 0.0), |(sxy, sxx), (x, &y)| {
            let dx = x as f64 - x_bar;
            (sxy + dx * (y - y_bar), sxx + dx * dx)
        });

    let slope = sxy / sxx;
    let intercept = y_bar - slope * x_bar;

    let squared: Vec<f64> = samples
        .iter()
        .enumerate()
        .map(|(x, &y)| {
            let residual = y - (slope * x as f64 + intercept);
            residual * residual
        })
        .collect();

    mean(&squared).unwrap_or(0.0)
}

/// Segment a series into an ordered partition of contiguous runs
///
/// The series needs at least two samples, all finite. When its length is odd
/// the trailing sample joins the last two-sample segment, so the result always
/// covers every sample exactly once.
pub fn segment(series: &[f64]) -> Result<Vec<Segment<'_>>> {
    if series.len() < 2 {
        return Err(SonifyError::InvalidSeries(format!(
            "need at least 2 samples, got {}",
            series.len()
        )));
    }
    if let Some(i) = series.iter().position(|v| !v.is_finite()) {
        return Err(SonifyError::InvalidSeries(format!(
            "sample {} is not a finite number",
            i
        )));
    }

    let target = target_segment_count(series.len());
    let mut segments = initial_partition(series);

    let mut costs: Vec<f64> = (0..segments.len().saturating_sub(1))
        .map(|i| merge_cost(series, &segments, i))
        .collect();

    while segments.len() > target {
        let Some(index) = argmin(&costs) else {
            break;
        };

        let merged = Segment::new(
            series,
            segments[index].offset(),
            segments[index].len() + segments[index + 1].len(),
        );
        segments[index] = merged;
        segments.remove(index + 1);
        costs.remove(index);

        if index > 0 {
            costs[index - 1] = merge_cost(series, &segments, index - 1);
        }
        if index + 1 < segments.len() {
            costs[index] = merge_cost(series, &segments, index);
        }
    }

    Ok(segments)
}

/// Two-sample segments; an odd trailing sample extends the last one
fn initial_partition(series: &[f64]) -> Vec<Segment<'_>> {
    let pairs = series.len() / 2;
    (0..pairs)
        .map(|i| {
            let len = if i + 1 == pairs { series.len() - 2 * i } else { 2 };
            Segment::new(series, 2 * i, len)
        })
        .collect()
}

/// Cost of merging `segments[i]` with `segments[i + 1]`
fn merge_cost(series: &[f64], segments: &[Segment<'_>], i: usize) -> f64 {
    regression_error(&series[segments[i].offset()..segments[i + 1].end()])
}
