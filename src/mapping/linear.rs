//! Linear mapper implementation

use super::Mapper;

/// Linear interpolation mapper
///
/// When the input range is empty (every segment had the same value) there is
/// nothing to interpolate, and the output is the midpoint of the output range.
pub struct LinearMapper {
    name: String,
    in_min: f64,
    in_max: f64,
    out_min: f64,
    out_max: f64,
}

impl LinearMapper {
    /// Create a new linear mapper
    pub fn new(
        name: impl Into<String>,
        in_min: f64,
        in_max: f64,
        out_min: f64,
        out_max: f64,
    ) -> Self {
        Self {
            name: name.into(),
            in_min,
            in_max,
            out_min,
            out_max,
        }
    }

    /// True when the input range has zero width
    pub fn is_degenerate(&self) -> bool {
        self.in_max == self.in_min
    }
}

impl Mapper for LinearMapper {
    fn name(&self) -> &str {
        &self.name
    }

    fn map(&self, input: f64) -> f64 {
        // Normalize input to 0..1
        let normalized = if self.is_degenerate() {
            0.5
        } else {
            (input - self.in_min) / (self.in_max - self.in_min)
        };

        // Scale to output range
        let out_range = self.out_max - self.out_min;
        let output = self.out_min + normalized * out_range;

        output.clamp(self.out_min.min(self.out_max), self.out_min.max(self.out_max))
    }
}
