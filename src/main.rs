//! contour - Sonify time series as MIDI

use anyhow::{Context, Result};
use clap::Parser;
use contour::config::{self, SonificationRequest};
use contour::midi::{self, MidiPlayer, MidiWriter};
use contour::sonify::{self, MeasurementType, ParameterKind};
use contour::{segmentation, server};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod cli;

use cli::{Cli, Commands};

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "contour=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Render {
            request: request_path,
            output,
            data_uri,
            ticks_per_beat,
            bpm,
            velocity,
            channel,
        } => {
            let request = config::load_request(&request_path)?;
            let events = sonify::sonify_request(&request)?;
            let mut writer = MidiWriter::new()
                .with_ticks_per_beat(ticks_per_beat)
                .with_velocity(velocity)
                .with_channel(channel);
            if let Some(bpm) = bpm {
                writer = writer.with_tempo(bpm);
            }

            if data_uri {
                println!("{}", writer.encode_data_uri(&events)?);
            } else {
                let bytes = writer.encode(&events)?;
                std::fs::write(&output, &bytes)
                    .with_context(|| format!("failed to write MIDI file: {:?}", output))?;
                println!(
                    "Wrote {} events ({} ticks) to {:?}",
                    events.len(),
                    sonify::total_ticks(&events),
                    output
                );
            }
        }

        Commands::Play {
            request: request_path,
            port,
            bpm,
            velocity,
            channel,
        } => {
            let request = config::load_request(&request_path)?;
            let events = sonify::sonify_request(&request)?;

            let player = MidiPlayer::new(port.as_deref())?;
            let tick = midi::tick_duration(bpm, midi::DEFAULT_TICKS_PER_BEAT);
            println!(
                "Playing {} events on {} at {} BPM...",
                events.len(),
                player.port_name(),
                bpm
            );
            player.play(&events, channel.min(15), velocity.min(127), tick)?;
            println!("Done.");
        }

        Commands::Ports => {
            println!("MIDI output ports:");
            match midi::list_midi_ports() {
                Ok(ports) if ports.is_empty() => println!("  (none)"),
                Ok(ports) => {
                    for name in ports {
                        println!("  - {}", name);
                    }
                }
                Err(e) => println!("  Error listing ports: {}", e),
            }
        }

        Commands::Check {
            request: request_path,
        } => {
            println!("Checking request at {:?}...", request_path);

            match config::load_request(&request_path).and_then(|r| summarize(&r)) {
                Ok(()) => {}
                Err(e) => {
                    println!("Request is invalid: {:#}", e);
                    std::process::exit(1);
                }
            }
        }

        Commands::Serve { port } => {
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(server::serve(port))?;
        }

        Commands::Init => {
            let example = include_str!("../contour.example.yaml");

            let path = "contour.yaml";
            if std::path::Path::new(path).exists() {
                println!("contour.yaml already exists. Not overwriting.");
            } else {
                std::fs::write(path, example)?;
                println!("Created contour.yaml with an example request.");
            }
        }
    }

    Ok(())
}

/// Print what a request would produce, failing like `render` would
fn summarize(request: &SonificationRequest) -> Result<()> {
    let measurements = request.measurements()?;
    let cfg = &request.config;

    println!("Request is valid!");
    println!("  Scale: {:?}", cfg.scale.resolve()?.intervals());
    println!("  Notes: {}..={}", cfg.low, cfg.high());
    println!("  Controller range: {}..={}", cfg.volume_low, cfg.volume_high);
    println!("  Ticks per sample: {}", cfg.ticks_per_samp);
    println!("  Parameters: {}", request.parameter_map.len());

    for (name, series) in &request.parameter_map {
        let kind: ParameterKind = name.parse()?;
        let measurement: MeasurementType = *measurements
            .get(name)
            .ok_or_else(|| contour::SonifyError::MissingMeasurement(name.clone()))?;
        let segments = segmentation::segment(series)?;
        println!(
            "    - {} ({}): {} samples -> {} segments",
            kind,
            measurement,
            series.len(),
            segments.len()
        );
    }

    let events = sonify::sonify_request(request)?;
    println!(
        "  Events: {} ({} notes, {} ticks)",
        events.len(),
        events.iter().filter(|e| e.is_note()).count(),
        sonify::total_ticks(&events)
    );

    Ok(())
}
