//! contour - Sonify time series as MIDI
//!
//! Each series is reduced by bottom-up segmentation to a handful of
//! piecewise-constant regions. Every region becomes one note or controller
//! change, and the parameters are interleaved into a single event stream
//! that can be written as a Standard MIDI File.

pub mod config;
pub mod error;
pub mod mapping;
pub mod midi;
pub mod segmentation;
pub mod server;
pub mod sonify;
pub mod stats;

pub use config::{SonificationConfig, SonificationRequest};
pub use error::SonifyError;
pub use sonify::{sonify_all, sonify_request, MusicalEvent};
