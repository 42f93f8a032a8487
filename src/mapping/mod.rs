//! Mapping system for transforming segment values to MIDI parameters
//!
//! Segment values are remapped linearly into a note or controller range,
//! rounded, and (for pitch) snapped onto a scale.

mod linear;
mod mapper;
mod quantize;

pub use linear::LinearMapper;
pub use mapper::{Mapper, MappingPipeline, RoundMapper};
pub use quantize::{QuantizeMapper, Scale};
