//! Live MIDI playback through a system output port.

use std::sync::mpsc::{self, Sender};
use std::thread;
use std::time::Duration;

use anyhow::{anyhow, Result};
use midir::MidiOutput;
use tracing::{debug, info};

use super::{timeline, MidiMessage};
use crate::sonify::MusicalEvent;

/// MIDI output player.
pub struct MidiPlayer {
    sender: Sender<MidiPlayerCommand>,
    port_name: String,
}

enum MidiPlayerCommand {
    Send(MidiMessage),
    Stop,
}

impl MidiPlayer {
    /// Create a new MIDI player connected to the given port.
    ///
    /// Without a name the first available port is used; with one, the first
    /// port whose name contains it.
    pub fn new(port_name: Option<&str>) -> Result<Self> {
        let midi_out = MidiOutput::new("contour output")?;
        let ports = midi_out.ports();

        if ports.is_empty() {
            return Err(anyhow!("No MIDI output ports available"));
        }

        let port = if let Some(name) = port_name {
            ports
                .iter()
                .find(|p| {
                    midi_out
                        .port_name(p)
                        .map(|n| n.contains(name))
                        .unwrap_or(false)
                })
                .ok_or_else(|| anyhow!("MIDI port '{}' not found", name))?
                .clone()
        } else {
            ports[0].clone()
        };

        let port_name_actual = midi_out.port_name(&port)?;
        let conn = midi_out
            .connect(&port, "contour-output")
            .map_err(|e| anyhow!("failed to connect to '{}': {}", port_name_actual, e))?;

        let (sender, receiver) = mpsc::channel::<MidiPlayerCommand>();

        // Spawn thread to handle MIDI messages
        thread::spawn(move || {
            let mut conn = conn;
            while let Ok(cmd) = receiver.recv() {
                match cmd {
                    MidiPlayerCommand::Send(msg) => {
                        let _ = conn.send(&msg.to_bytes());
                    }
                    MidiPlayerCommand::Stop => break,
                }
            }
        });

        info!("MIDI output connected to: {}", port_name_actual);

        Ok(Self {
            sender,
            port_name: port_name_actual,
        })
    }

    /// Name of the connected port.
    pub fn port_name(&self) -> &str {
        &self.port_name
    }

    /// Send a raw MIDI message.
    pub fn send(&self, msg: MidiMessage) -> Result<()> {
        self.sender.send(MidiPlayerCommand::Send(msg))?;
        Ok(())
    }

    /// Play an event sequence in real time, blocking until it ends.
    pub fn play(&self, events: &[MusicalEvent], channel: u8, velocity: u8, tick: Duration) -> Result<()> {
        let messages = timeline(events, channel, velocity);
        debug!("playing {} messages at {:?} per tick", messages.len(), tick);

        for timed in messages {
            if timed.delta > 0 {
                thread::sleep(tick * timed.delta);
            }
            self.send(timed.message)?;
        }

        Ok(())
    }

    /// Stop the MIDI player.
    pub fn stop(&self) {
        let _ = self.sender.send(MidiPlayerCommand::Stop);
    }
}

impl Drop for MidiPlayer {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Wall-clock length of one tick at the given tempo and resolution.
pub fn tick_duration(bpm: f64, ticks_per_beat: u16) -> Duration {
    let bpm = if bpm > 0.0 { bpm } else { 120.0 };
    Duration::from_secs_f64(60.0 / (bpm * ticks_per_beat.max(1) as f64))
}

/// List available MIDI output ports.
pub fn list_midi_ports() -> Result<Vec<String>> {
    let midi_out = MidiOutput::new("contour port list")?;
    let ports = midi_out.ports();

    let names: Vec<String> = ports
        .iter()
        .filter_map(|p| midi_out.port_name(p).ok())
        .collect();

    Ok(names)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tick_duration() {
        // 120 bpm, 128 ticks per beat: half a second per beat
        let tick = tick_duration(120.0, 128);
        assert!((tick.as_secs_f64() * 128.0 - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_tick_duration_guards_zero() {
        assert!(tick_duration(0.0, 0).as_secs_f64() > 0.0);
    }
}
