//! Quantize mapper for snapping MIDI notes to musical scales

use super::Mapper;
use crate::error::{Result, SonifyError};

/// Highest MIDI note number
const MAX_NOTE: u8 = 127;

/// Musical scale definition (pitch classes in semitones from C)
#[derive(Debug, Clone, PartialEq)]
pub struct Scale {
    name: String,
    intervals: Vec<u8>,
}

impl Scale {
    /// Create a new scale
    pub fn new(name: &str, intervals: Vec<u8>) -> Self {
        Self {
            name: name.to_string(),
            intervals,
        }
    }

    /// Build a scale from user-supplied pitch classes
    ///
    /// Rejects an empty set and anything outside 0..=11. Duplicates are dropped.
    pub fn from_pitch_classes(classes: &[i64]) -> Result<Self> {
        if classes.is_empty() {
            return Err(SonifyError::InvalidConfig("scale must not be empty".to_string()));
        }

        let mut intervals = Vec::with_capacity(classes.len());
        for &class in classes {
            if !(0..12).contains(&class) {
                return Err(SonifyError::InvalidConfig(format!(
                    "scale pitch class {} is outside 0..=11",
                    class
                )));
            }
            intervals.push(class as u8);
        }
        intervals.sort_unstable();
        intervals.dedup();

        Ok(Self::new("custom", intervals))
    }

    /// Minor pentatonic scale (root, m3, P4, P5, m7)
    pub fn minor_pentatonic() -> Self {
        Self::new("minor_pentatonic", vec![0, 3, 5, 7, 10])
    }

    /// Major pentatonic scale (root, M2, M3, P5, M6)
    pub fn major_pentatonic() -> Self {
        Self::new("major_pentatonic", vec![0, 2, 4, 7, 9])
    }

    /// Natural minor scale
    pub fn minor() -> Self {
        Self::new("minor", vec![0, 2, 3, 5, 7, 8, 10])
    }

    /// Major scale
    pub fn major() -> Self {
        Self::new("major", vec![0, 2, 4, 5, 7, 9, 11])
    }

    /// Dorian mode
    pub fn dorian() -> Self {
        Self::new("dorian", vec![0, 2, 3, 5, 7, 9, 10])
    }

    /// Whole tone scale
    pub fn whole_tone() -> Self {
        Self::new("whole_tone", vec![0, 2, 4, 6, 8, 10])
    }

    /// Chromatic scale (every note is tonal)
    pub fn chromatic() -> Self {
        Self::new("chromatic", (0..12).collect())
    }

    /// Get scale by name
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "pentatonic" | "minor_pentatonic" | "minorpentatonic" => Some(Self::minor_pentatonic()),
            "major_pentatonic" | "majorpentatonic" => Some(Self::major_pentatonic()),
            "minor" | "natural_minor" => Some(Self::minor()),
            "major" => Some(Self::major()),
            "dorian" => Some(Self::dorian()),
            "whole_tone" | "wholetone" => Some(Self::whole_tone()),
            "chromatic" => Some(Self::chromatic()),
            _ => None,
        }
    }

    /// Get the name of this scale
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the intervals
    pub fn intervals(&self) -> &[u8] {
        &self.intervals
    }

    /// Whether the note's pitch class belongs to this scale
    pub fn is_tonal(&self, note: u8) -> bool {
        self.intervals.contains(&(note % 12))
    }

    /// Snap a MIDI note to the nearest tonal note
    ///
    /// Walks down and up one semitone at a time; the lower candidate wins
    /// when both become tonal at the same distance. Never leaves 0..=127.
    pub fn quantize(&self, note: u8) -> u8 {
        let note = note.min(MAX_NOTE);
        if self.is_tonal(note) {
            return note;
        }

        for step in 1..=MAX_NOTE {
            let lower = note.checked_sub(step);
            let upper = Some(note + step).filter(|&n| n <= MAX_NOTE);

            if let Some(n) = lower.filter(|&n| self.is_tonal(n)) {
                return n;
            }
            if let Some(n) = upper.filter(|&n| self.is_tonal(n)) {
                return n;
            }
        }

        // Only reachable with an empty scale
        note
    }
}

/// A mapper that quantizes MIDI note numbers to a musical scale
pub struct QuantizeMapper {
    name: String,
    scale: Scale,
}

impl QuantizeMapper {
    /// Create a new quantize mapper
    ///
    /// # Arguments
    /// * `name` - Name for this mapper
    /// * `scale` - The scale to quantize to
    pub fn new(name: &str, scale: Scale) -> Self {
        Self {
            name: name.to_string(),
            scale,
        }
    }
}

impl Mapper for QuantizeMapper {
    fn name(&self) -> &str {
        &self.name
    }

    fn map(&self, input: f64) -> f64 {
        // Input is a (possibly fractional) MIDI note number
        let note = input.round().clamp(0.0, MAX_NOTE as f64) as u8;
        self.scale.quantize(note) as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scale_creation() {
        let scale = Scale::minor_pentatonic();
        assert_eq!(scale.name(), "minor_pentatonic");
        assert_eq!(scale.intervals(), &[0, 3, 5, 7, 10]);
    }

    #[test]
    fn test_scale_from_name() {
        assert!(Scale::from_name("minor_pentatonic").is_some());
        assert!(Scale::from_name("Major").is_some());
        assert!(Scale::from_name("dorian").is_some());
        assert!(Scale::from_name("unknown").is_none());
    }

    #[test]
    fn test_scale_from_pitch_classes() {
        let scale = Scale::from_pitch_classes(&[7, 0, 4, 0]).unwrap();
        assert_eq!(scale.intervals(), &[0, 4, 7]);

        assert!(Scale::from_pitch_classes(&[]).is_err());
        assert!(Scale::from_pitch_classes(&[0, 12]).is_err());
        assert!(Scale::from_pitch_classes(&[-1]).is_err());
    }

    #[test]
    fn test_tonal_note_unchanged() {
        let scale = Scale::major();
        assert_eq!(scale.quantize(60), 60); // C4
        assert_eq!(scale.quantize(71), 71); // B4
    }

    #[test]
    fn test_prefers_lower_neighbour() {
        let scale = Scale::major();
        // C#4 sits between C4 and D4
        assert_eq!(scale.quantize(61), 60);
        // F#4 sits between F4 and G4
        assert_eq!(scale.quantize(66), 65);
    }

    #[test]
    fn test_takes_upper_when_closer() {
        // C minor triad: C, Eb, G
        let scale = Scale::from_pitch_classes(&[0, 3, 7]).unwrap();
        // D4 (62): down 2 to C, up 1 to Eb
        assert_eq!(scale.quantize(62), 63);
    }

    #[test]
    fn test_quantize_idempotent() {
        let scale = Scale::major();
        for note in 0..=127u8 {
            let once = scale.quantize(note);
            assert_eq!(scale.quantize(once), once, "note {}", note);
        }
    }

    #[test]
    fn test_quantize_within_six_semitones() {
        let scales = [
            Scale::major(),
            Scale::minor_pentatonic(),
            Scale::whole_tone(),
            Scale::from_pitch_classes(&[0]).unwrap(),
            Scale::from_pitch_classes(&[11]).unwrap(),
            Scale::from_pitch_classes(&[5, 6]).unwrap(),
        ];
        for scale in &scales {
            for note in 6..=121u8 {
                let q = scale.quantize(note);
                assert!(scale.is_tonal(q));
                assert!((q as i32 - note as i32).abs() <= 6, "{} -> {}", note, q);
            }
        }
    }

    #[test]
    fn test_quantize_stays_in_midi_range() {
        // Only B is tonal: 127 is G9, the nearest B above would be 131
        let scale = Scale::from_pitch_classes(&[11]).unwrap();
        assert_eq!(scale.quantize(127), 119);

        // Only C is tonal and the note is 0
        let scale = Scale::from_pitch_classes(&[0]).unwrap();
        assert_eq!(scale.quantize(0), 0);
        // Only B: 1 has no tonal note below, so it climbs to 11
        let scale = Scale::from_pitch_classes(&[11]).unwrap();
        assert_eq!(scale.quantize(1), 11);
    }

    #[test]
    fn test_quantize_mapper_rounds_first() {
        let mapper = QuantizeMapper::new("pitch", Scale::major());

        assert_eq!(mapper.map(60.4), 60.0);
        // 60.6 rounds to 61 (C#), which snaps down to C
        assert_eq!(mapper.map(60.6), 60.0);
        assert_eq!(mapper.map(63.5), 64.0);
        assert_eq!(mapper.name(), "pitch");
    }
}
