//! Multi-parameter sonification
//!
//! Sonifies every parameter of a request and merges the results so that
//! events of the same time step fire together.

use super::{sonify_parameter, EventSequence, MeasurementType, ParameterKind};
use crate::config::{SonificationConfig, SonificationRequest};
use crate::error::{Result, SonifyError};
use std::collections::BTreeMap;
use tracing::info;

/// Sonify a parsed request
pub fn sonify_request(request: &SonificationRequest) -> Result<EventSequence> {
    let measurements = request.measurements()?;
    sonify_all(&request.parameter_map, &measurements, &request.config)
}

/// Sonify every parameter and interleave the results by segment index
///
/// Parameters fire in `ParameterKind` order within each step. Every
/// parameter must produce the same number of segments.
pub fn sonify_all(
    parameter_map: &BTreeMap<String, Vec<f64>>,
    measurement_types: &BTreeMap<String, MeasurementType>,
    config: &SonificationConfig,
) -> Result<EventSequence> {
    config.validate()?;
    if parameter_map.is_empty() {
        return Err(SonifyError::InvalidRequest(
            "parameter_map must name at least one parameter".to_string(),
        ));
    }

    let mut voices: BTreeMap<ParameterKind, (&str, EventSequence)> = BTreeMap::new();
    for (name, series) in parameter_map {
        let kind: ParameterKind = name.parse()?;
        let measurement = *measurement_types
            .get(name)
            .ok_or_else(|| SonifyError::MissingMeasurement(name.clone()))?;

        let events = sonify_parameter(series, measurement, kind, config)?;
        voices.insert(kind, (name.as_str(), events));
    }

    let names: Vec<&str> = voices.values().map(|(name, _)| *name).collect();
    let mut voices = voices.into_values();
    let Some((_, first)) = voices.next() else {
        return Ok(Vec::new());
    };
    let expected = first.len();

    let mut sequences = vec![first];
    for (name, events) in voices {
        if events.len() != expected {
            return Err(SonifyError::MismatchedSegmentCounts {
                parameter: name.to_string(),
                expected,
                found: events.len(),
            });
        }
        sequences.push(events);
    }

    let merged = interleave(&sequences);
    info!(
        "sonified [{}]: {} steps, {} events",
        names.join(", "),
        expected,
        merged.len()
    );

    Ok(merged)
}

/// Merge sequences step by step: every sequence's event `t`, then `t + 1`
///
/// Steps run to the length of the first sequence; a shorter sequence simply
/// contributes nothing to the steps it lacks.
pub fn interleave(sequences: &[EventSequence]) -> EventSequence {
    let steps = sequences.first().map_or(0, Vec::len);
    let mut merged = Vec::with_capacity(steps * sequences.len());

    for t in 0..steps {
        for sequence in sequences {
            if let Some(event) = sequence.get(t) {
                merged.push(*event);
            }
        }
    }

    merged
}
