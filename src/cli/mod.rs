//! CLI interface for contour

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Sonify time series as MIDI
#[derive(Parser)]
#[command(name = "contour")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Render a request to a MIDI file or data URI
    Render {
        /// Request file path (JSON, or YAML with a .yaml/.yml extension)
        #[arg(short, long, default_value = "contour.yaml")]
        request: PathBuf,

        /// Output MIDI file path
        #[arg(short, long, default_value = "contour.mid")]
        output: PathBuf,

        /// Print a data URI instead of writing a file
        #[arg(long)]
        data_uri: bool,

        /// MIDI ticks per quarter note
        #[arg(long, default_value = "128")]
        ticks_per_beat: u16,

        /// Tempo written at the start of the track
        #[arg(short, long)]
        bpm: Option<f64>,

        /// Note velocity (0-127)
        #[arg(long, default_value = "64")]
        velocity: u8,

        /// MIDI channel (0-15)
        #[arg(long, default_value = "0")]
        channel: u8,
    },

    /// Play a request through a MIDI output port
    Play {
        /// Request file path
        #[arg(short, long, default_value = "contour.yaml")]
        request: PathBuf,

        /// Substring of the MIDI port name (default: first port)
        #[arg(short, long)]
        port: Option<String>,

        /// Tempo in beats per minute
        #[arg(short, long, default_value = "120")]
        bpm: f64,

        /// Note velocity (0-127)
        #[arg(long, default_value = "64")]
        velocity: u8,

        /// MIDI channel (0-15)
        #[arg(long, default_value = "0")]
        channel: u8,
    },

    /// List available MIDI output ports
    Ports,

    /// Validate a request file
    Check {
        /// Request file path
        #[arg(short, long, default_value = "contour.yaml")]
        request: PathBuf,
    },

    /// Serve sonification over HTTP
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "80", env = "CONTOUR_PORT")]
        port: u16,
    },

    /// Generate an example request file
    Init,
}
