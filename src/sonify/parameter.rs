//! Sonification of a single parameter

use super::{EventSequence, MeasurementType, MusicalEvent, ParameterKind};
use crate::config::SonificationConfig;
use crate::error::{Result, SonifyError};
use crate::mapping::{LinearMapper, MappingPipeline, QuantizeMapper, RoundMapper};
use crate::segmentation::segment;
use crate::stats;
use tracing::debug;

/// Range of the segment values of one series
///
/// This is the domain every segment value is remapped from, so the
/// quietest segment lands on the bottom of the output range and the loudest
/// on the top.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentStatistics {
    pub min: f64,
    pub max: f64,
}

impl SegmentStatistics {
    /// Bounds of `values`, or `None` when there are none
    pub fn of(values: &[f64]) -> Option<Self> {
        Some(Self {
            min: stats::min(values)?,
            max: stats::max(values)?,
        })
    }

    /// True when every segment had the same value
    pub fn is_degenerate(&self) -> bool {
        self.min == self.max
    }
}

/// Turn one series into one event per segment
pub fn sonify_parameter(
    series: &[f64],
    measurement: MeasurementType,
    kind: ParameterKind,
    config: &SonificationConfig,
) -> Result<EventSequence> {
    config.validate()?;

    let segments = segment(series)?;
    let values: Vec<f64> = segments.iter().map(|s| measurement.measure(s)).collect();
    let statistics = SegmentStatistics::of(&values)
        .ok_or_else(|| SonifyError::InvalidSeries("segmentation produced no segments".to_string()))?;

    debug!(
        "{} ({}): {} samples -> {} segments, values {}..{}{}",
        kind,
        measurement,
        series.len(),
        segments.len(),
        statistics.min,
        statistics.max,
        if statistics.is_degenerate() { " (flat)" } else { "" }
    );

    let events = match kind.controller() {
        None => {
            let pipeline = pitch_pipeline(&statistics, config)?;
            segments
                .iter()
                .zip(&values)
                .map(|(seg, &value)| -> Result<MusicalEvent> {
                    Ok(MusicalEvent::Note {
                        pitch: pipeline.apply(value) as u8,
                        duration: note_duration(seg.len(), config.ticks_per_samp)?,
                    })
                })
                .collect::<Result<EventSequence>>()?
        }
        Some(controller) => {
            let pipeline = controller_pipeline(&statistics, config);
            values
                .iter()
                .map(|&value| MusicalEvent::ControllerChange {
                    controller,
                    value: pipeline.apply(value) as u8,
                })
                .collect()
        }
    };

    Ok(events)
}

/// Segment value -> note range -> nearest tonal note
fn pitch_pipeline(statistics: &SegmentStatistics, config: &SonificationConfig) -> Result<MappingPipeline> {
    Ok(MappingPipeline::new()
        .with(LinearMapper::new(
            "pitch",
            statistics.min,
            statistics.max,
            config.low as f64,
            config.high() as f64,
        ))
        .with(QuantizeMapper::new("scale", config.scale.resolve()?)))
}

/// Segment value -> controller range, rounded
fn controller_pipeline(statistics: &SegmentStatistics, config: &SonificationConfig) -> MappingPipeline {
    MappingPipeline::new()
        .with(LinearMapper::new(
            "controller",
            statistics.min,
            statistics.max,
            config.volume_low as f64,
            config.volume_high as f64,
        ))
        .with(RoundMapper::new("round"))
}

fn note_duration(samples: usize, ticks_per_samp: i64) -> Result<u32> {
    (samples as i64)
        .checked_mul(ticks_per_samp)
        .and_then(|ticks| u32::try_from(ticks).ok())
        .ok_or_else(|| {
            SonifyError::InvalidConfig(format!(
                "ticks_per_samp {} overflows the note duration of a {}-sample segment",
                ticks_per_samp, samples
            ))
        })
}
