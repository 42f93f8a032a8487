//! MIDI output for contour.
//!
//! Turns an event sequence into timed MIDI messages, which are either written
//! to a Standard MIDI File or sent to a live output port.

mod file;
mod player;

pub use file::{to_data_uri, MidiWriter, DEFAULT_TICKS_PER_BEAT, DEFAULT_VELOCITY};
pub use player::{list_midi_ports, tick_duration, MidiPlayer};

use crate::sonify::MusicalEvent;

/// MIDI message types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MidiMessage {
    /// Note on: channel (0-15), note (0-127), velocity (0-127)
    NoteOn(u8, u8, u8),
    /// Note off: channel (0-15), note (0-127), velocity (0-127)
    NoteOff(u8, u8, u8),
    /// Control change: channel (0-15), controller (0-127), value (0-127)
    ControlChange(u8, u8, u8),
}

impl MidiMessage {
    /// Convert to raw MIDI bytes.
    pub fn to_bytes(&self) -> Vec<u8> {
        match *self {
            MidiMessage::NoteOn(ch, note, vel) => vec![0x90 | (ch & 0x0F), note & 0x7F, vel & 0x7F],
            MidiMessage::NoteOff(ch, note, vel) => {
                vec![0x80 | (ch & 0x0F), note & 0x7F, vel & 0x7F]
            }
            MidiMessage::ControlChange(ch, ctrl, val) => {
                vec![0xB0 | (ch & 0x0F), ctrl & 0x7F, val & 0x7F]
            }
        }
    }
}

/// A message preceded by a wait, in ticks, since the previous message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimedMessage {
    pub delta: u32,
    pub message: MidiMessage,
}

/// Lay an event sequence out on a single channel
///
/// A note starts immediately and ends `duration` ticks later; the next event
/// follows its note off. Controller changes take no time.
pub fn timeline(events: &[MusicalEvent], channel: u8, velocity: u8) -> Vec<TimedMessage> {
    let mut messages = Vec::with_capacity(events.len() * 2);

    for event in events {
        match *event {
            MusicalEvent::Note { pitch, duration } => {
                messages.push(TimedMessage {
                    delta: 0,
                    message: MidiMessage::NoteOn(channel, pitch, velocity),
                });
                messages.push(TimedMessage {
                    delta: duration,
                    message: MidiMessage::NoteOff(channel, pitch, velocity),
                });
            }
            MusicalEvent::ControllerChange { controller, value } => {
                messages.push(TimedMessage {
                    delta: 0,
                    message: MidiMessage::ControlChange(channel, controller, value),
                });
            }
        }
    }

    messages
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_midi_message_note_on() {
        let msg = MidiMessage::NoteOn(0, 60, 100);
        assert_eq!(msg.to_bytes(), vec![0x90, 60, 100]);
    }

    #[test]
    fn test_midi_message_note_on_channel() {
        let msg = MidiMessage::NoteOn(5, 72, 80);
        assert_eq!(msg.to_bytes(), vec![0x95, 72, 80]);
    }

    #[test]
    fn test_midi_message_note_off() {
        let msg = MidiMessage::NoteOff(0, 60, 0);
        assert_eq!(msg.to_bytes(), vec![0x80, 60, 0]);
    }

    #[test]
    fn test_midi_message_cc() {
        let msg = MidiMessage::ControlChange(0, 7, 64);
        assert_eq!(msg.to_bytes(), vec![0xB0, 7, 64]);
    }

    #[test]
    fn test_timeline_note_and_controller() {
        let events = [
            MusicalEvent::ControllerChange { controller: 7, value: 90 },
            MusicalEvent::Note { pitch: 60, duration: 8 },
            MusicalEvent::ControllerChange { controller: 10, value: 0 },
            MusicalEvent::Note { pitch: 64, duration: 12 },
        ];

        let messages = timeline(&events, 0, 64);
        assert_eq!(
            messages,
            vec![
                TimedMessage { delta: 0, message: MidiMessage::ControlChange(0, 7, 90) },
                TimedMessage { delta: 0, message: MidiMessage::NoteOn(0, 60, 64) },
                TimedMessage { delta: 8, message: MidiMessage::NoteOff(0, 60, 64) },
                TimedMessage { delta: 0, message: MidiMessage::ControlChange(0, 10, 0) },
                TimedMessage { delta: 0, message: MidiMessage::NoteOn(0, 64, 64) },
                TimedMessage { delta: 12, message: MidiMessage::NoteOff(0, 64, 64) },
            ]
        );
    }
}
