//! Sonification of segmented time series
//!
//! Each series is segmented, every segment is reduced to one value, and the
//! values are voiced as notes or controller changes. Parameters are then
//! interleaved step by step into a single event sequence.

mod orchestrator;
mod parameter;

pub use orchestrator::{interleave, sonify_all, sonify_request};
pub use parameter::{sonify_parameter, SegmentStatistics};

use crate::error::SonifyError;
use crate::segmentation::Segment;
use crate::stats;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// MIDI controller number for channel volume
pub const VOLUME_CONTROLLER: u8 = 7;

/// MIDI controller number for pan
pub const PAN_CONTROLLER: u8 = 10;

/// How a segment is reduced to a single value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MeasurementType {
    /// Arithmetic mean of the samples
    Mean,
    /// Smallest sample
    Min,
    /// Largest sample
    Max,
    /// Number of samples
    Length,
}

impl MeasurementType {
    /// Reduce a segment to its value
    pub fn measure(&self, segment: &Segment<'_>) -> f64 {
        let samples = segment.samples();
        let value = match self {
            MeasurementType::Mean => stats::mean(samples),
            MeasurementType::Min => stats::min(samples),
            MeasurementType::Max => stats::max(samples),
            MeasurementType::Length => Some(samples.len() as f64),
        };
        value.unwrap_or(0.0)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MeasurementType::Mean => "mean",
            MeasurementType::Min => "min",
            MeasurementType::Max => "max",
            MeasurementType::Length => "length",
        }
    }
}

impl FromStr for MeasurementType {
    type Err = SonifyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "mean" => Ok(MeasurementType::Mean),
            "min" => Ok(MeasurementType::Min),
            "max" => Ok(MeasurementType::Max),
            "length" => Ok(MeasurementType::Length),
            other => Err(SonifyError::UnknownMeasurementType(other.to_string())),
        }
    }
}

impl fmt::Display for MeasurementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Musical parameter a series drives
///
/// Ordering is the firing order within one time step: controller changes
/// come before the note they shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ParameterKind {
    /// Channel volume (controller 7)
    Volume,
    /// Stereo position (controller 10)
    Pan,
    /// Note pitch
    Pitch,
}

impl ParameterKind {
    /// Controller number for continuous parameters, `None` for pitch
    pub fn controller(&self) -> Option<u8> {
        match self {
            ParameterKind::Volume => Some(VOLUME_CONTROLLER),
            ParameterKind::Pan => Some(PAN_CONTROLLER),
            ParameterKind::Pitch => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ParameterKind::Volume => "volume",
            ParameterKind::Pan => "pan",
            ParameterKind::Pitch => "pitch",
        }
    }
}

impl FromStr for ParameterKind {
    type Err = SonifyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pitch" => Ok(ParameterKind::Pitch),
            "volume" => Ok(ParameterKind::Volume),
            "pan" => Ok(ParameterKind::Pan),
            other => Err(SonifyError::UnknownParameter(other.to_string())),
        }
    }
}

impl fmt::Display for ParameterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One event of the generated stream
///
/// Events carry no timestamp: their position in the sequence is their
/// firing order, and only notes advance time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MusicalEvent {
    /// A note held for `duration` ticks
    Note { pitch: u8, duration: u32 },
    /// A controller change that takes effect immediately
    ControllerChange { controller: u8, value: u8 },
}

impl MusicalEvent {
    /// Ticks this event occupies (zero for controller changes)
    pub fn duration(&self) -> u32 {
        match self {
            MusicalEvent::Note { duration, .. } => *duration,
            MusicalEvent::ControllerChange { .. } => 0,
        }
    }

    pub fn is_note(&self) -> bool {
        matches!(self, MusicalEvent::Note { .. })
    }
}

/// Ordered events of one parameter, or of a whole request once merged
pub type EventSequence = Vec<MusicalEvent>;

/// Total length of a sequence in ticks
pub fn total_ticks(events: &[MusicalEvent]) -> u64 {
    events.iter().map(|e| e.duration() as u64).sum()
}
