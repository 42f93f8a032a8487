//! Standard MIDI File encoding

use super::{timeline, MidiMessage};
use crate::sonify::MusicalEvent;
use anyhow::{ensure, Context, Result};
use base64::{engine::general_purpose, Engine as _};
use midly::num::{u15, u24, u28, u4, u7};
use midly::{Format, Header, MetaMessage, Smf, Timing, TrackEvent, TrackEventKind};

/// Ticks per quarter note unless configured otherwise
pub const DEFAULT_TICKS_PER_BEAT: u16 = 128;

/// Note velocity unless configured otherwise
pub const DEFAULT_VELOCITY: u8 = 64;

/// Largest delta time a variable-length quantity can hold
const MAX_DELTA: u32 = 0x0FFF_FFFF;

/// Writes event sequences as single-track MIDI files
#[derive(Debug, Clone)]
pub struct MidiWriter {
    ticks_per_beat: u16,
    velocity: u8,
    channel: u8,
    tempo_bpm: Option<f64>,
}

impl MidiWriter {
    /// Create a writer with 128 ticks per beat, velocity 64, channel 0
    pub fn new() -> Self {
        Self {
            ticks_per_beat: DEFAULT_TICKS_PER_BEAT,
            velocity: DEFAULT_VELOCITY,
            channel: 0,
            tempo_bpm: None,
        }
    }

    /// Set the tick resolution (1..=32767)
    pub fn with_ticks_per_beat(mut self, ticks_per_beat: u16) -> Self {
        self.ticks_per_beat = ticks_per_beat.clamp(1, 0x7FFF);
        self
    }

    /// Set the note velocity
    pub fn with_velocity(mut self, velocity: u8) -> Self {
        self.velocity = velocity.min(127);
        self
    }

    /// Set the MIDI channel (0-15)
    pub fn with_channel(mut self, channel: u8) -> Self {
        self.channel = channel.min(15);
        self
    }

    /// Write a tempo event at the start of the track
    pub fn with_tempo(mut self, bpm: f64) -> Self {
        self.tempo_bpm = Some(bpm);
        self
    }

    pub fn ticks_per_beat(&self) -> u16 {
        self.ticks_per_beat
    }

    /// Encode events as Standard MIDI File bytes
    pub fn encode(&self, events: &[MusicalEvent]) -> Result<Vec<u8>> {
        let header = Header::new(
            Format::SingleTrack,
            Timing::Metrical(u15::new(self.ticks_per_beat)),
        );

        let mut track: Vec<TrackEvent<'static>> = Vec::new();

        if let Some(bpm) = self.tempo_bpm.filter(|bpm| *bpm > 0.0) {
            let micros_per_beat = (60_000_000.0 / bpm).round().clamp(1.0, 0xFF_FFFF as f64) as u32;
            track.push(TrackEvent {
                delta: u28::new(0),
                kind: TrackEventKind::Meta(MetaMessage::Tempo(u24::new(micros_per_beat))),
            });
        }

        for timed in timeline(events, self.channel, self.velocity) {
            ensure!(
                timed.delta <= MAX_DELTA,
                "note of {} ticks exceeds the longest MIDI delta time ({})",
                timed.delta,
                MAX_DELTA
            );
            track.push(TrackEvent {
                delta: u28::new(timed.delta),
                kind: track_event_kind(timed.message),
            });
        }

        track.push(TrackEvent {
            delta: u28::new(0),
            kind: TrackEventKind::Meta(MetaMessage::EndOfTrack),
        });

        let mut smf = Smf::new(header);
        smf.tracks.push(track);

        let mut bytes = Vec::new();
        smf.write_std(&mut bytes)
            .context("failed to encode MIDI file")?;
        Ok(bytes)
    }

    /// Encode events and wrap them in a `data:` URI
    pub fn encode_data_uri(&self, events: &[MusicalEvent]) -> Result<String> {
        Ok(to_data_uri(&self.encode(events)?))
    }
}

impl Default for MidiWriter {
    fn default() -> Self {
        Self::new()
    }
}

/// `data:audio/midi;base64,...` for the given file bytes
pub fn to_data_uri(bytes: &[u8]) -> String {
    format!("data:audio/midi;base64,{}", general_purpose::STANDARD.encode(bytes))
}

fn track_event_kind(message: MidiMessage) -> TrackEventKind<'static> {
    let (channel, message) = match message {
        MidiMessage::NoteOn(ch, key, vel) => (
            ch,
            midly::MidiMessage::NoteOn {
                key: u7::new(key),
                vel: u7::new(vel),
            },
        ),
        MidiMessage::NoteOff(ch, key, vel) => (
            ch,
            midly::MidiMessage::NoteOff {
                key: u7::new(key),
                vel: u7::new(vel),
            },
        ),
        MidiMessage::ControlChange(ch, controller, value) => (
            ch,
            midly::MidiMessage::Controller {
                controller: u7::new(controller),
                value: u7::new(value),
            },
        ),
    };

    TrackEventKind::Midi {
        channel: u4::new(channel),
        message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_events() -> Vec<MusicalEvent> {
        vec![
            MusicalEvent::ControllerChange { controller: 7, value: 100 },
            MusicalEvent::Note { pitch: 60, duration: 8 },
            MusicalEvent::ControllerChange { controller: 7, value: 50 },
            MusicalEvent::Note { pitch: 67, duration: 16 },
        ]
    }

    #[test]
    fn test_encode_header() {
        let bytes = MidiWriter::new().encode(&sample_events()).unwrap();
        assert_eq!(&bytes[0..4], b"MThd");

        let smf = Smf::parse(&bytes).unwrap();
        assert_eq!(smf.header.format, Format::SingleTrack);
        assert_eq!(smf.header.timing, Timing::Metrical(u15::new(128)));
        assert_eq!(smf.tracks.len(), 1);
    }

    #[test]
    fn test_encode_events_in_order() {
        let bytes = MidiWriter::new().encode(&sample_events()).unwrap();
        let smf = Smf::parse(&bytes).unwrap();
        let track = &smf.tracks[0];

        // 2 controllers + 2 notes (on/off) + end of track
        assert_eq!(track.len(), 7);

        assert_eq!(
            track[0].kind,
            TrackEventKind::Midi {
                channel: u4::new(0),
                message: midly::MidiMessage::Controller {
                    controller: u7::new(7),
                    value: u7::new(100),
                },
            }
        );
        assert_eq!(
            track[1].kind,
            TrackEventKind::Midi {
                channel: u4::new(0),
                message: midly::MidiMessage::NoteOn {
                    key: u7::new(60),
                    vel: u7::new(DEFAULT_VELOCITY),
                },
            }
        );
        assert_eq!(track[2].delta.as_int(), 8);
        assert_eq!(track[6].kind, TrackEventKind::Meta(MetaMessage::EndOfTrack));

        let total: u32 = track.iter().map(|e| e.delta.as_int()).sum();
        assert_eq!(total, 24);
    }

    #[test]
    fn test_encode_with_tempo_and_resolution() {
        let writer = MidiWriter::new().with_ticks_per_beat(480).with_tempo(120.0).with_channel(3);
        let bytes = writer.encode(&sample_events()).unwrap();
        let smf = Smf::parse(&bytes).unwrap();

        assert_eq!(smf.header.timing, Timing::Metrical(u15::new(480)));
        assert_eq!(
            smf.tracks[0][0].kind,
            TrackEventKind::Meta(MetaMessage::Tempo(u24::new(500_000)))
        );
        assert!(matches!(
            smf.tracks[0][1].kind,
            TrackEventKind::Midi { channel, .. } if channel.as_int() == 3
        ));
    }

    #[test]
    fn test_encode_with_velocity() {
        let bytes = MidiWriter::new().with_velocity(100).encode(&sample_events()).unwrap();
        let smf = Smf::parse(&bytes).unwrap();
        assert!(matches!(
            smf.tracks[0][1].kind,
            TrackEventKind::Midi { message: midly::MidiMessage::NoteOn { vel, .. }, .. } if vel.as_int() == 100
        ));

        // Out-of-range values are capped to what MIDI can carry
        let writer = MidiWriter::new().with_velocity(200).with_channel(20);
        let smf_bytes = writer.encode(&sample_events()).unwrap();
        let smf = Smf::parse(&smf_bytes).unwrap();
        assert!(matches!(
            smf.tracks[0][1].kind,
            TrackEventKind::Midi { channel, message: midly::MidiMessage::NoteOn { vel, .. } }
                if channel.as_int() == 15 && vel.as_int() == 127
        ));
    }

    #[test]
    fn test_encode_empty_sequence() {
        let bytes = MidiWriter::new().encode(&[]).unwrap();
        let smf = Smf::parse(&bytes).unwrap();
        assert_eq!(smf.tracks[0].len(), 1);
    }

    #[test]
    fn test_encode_rejects_overlong_note() {
        let events = [MusicalEvent::Note { pitch: 60, duration: u32::MAX }];
        assert!(MidiWriter::new().encode(&events).is_err());
    }

    #[test]
    fn test_data_uri() {
        let uri = to_data_uri(b"MThd");
        assert_eq!(uri, "data:audio/midi;base64,TVRoZA==");

        let uri = MidiWriter::new().encode_data_uri(&sample_events()).unwrap();
        assert!(uri.starts_with("data:audio/midi;base64,TVRoZA"));
    }
}
