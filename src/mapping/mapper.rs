//! Mapper trait and pipeline

/// Trait for mapping functions
pub trait Mapper: Send + Sync {
    /// Get the name of this mapper
    fn name(&self) -> &str;

    /// Map an input value to an output value
    fn map(&self, input: f64) -> f64;
}

/// A pipeline of mappers applied in sequence
pub struct MappingPipeline {
    mappers: Vec<Box<dyn Mapper>>,
}

impl MappingPipeline {
    /// Create an empty pipeline
    pub fn new() -> Self {
        Self { mappers: Vec::new() }
    }

    /// Add a mapper to the pipeline (builder pattern)
    pub fn with<M: Mapper + 'static>(mut self, mapper: M) -> Self {
        self.mappers.push(Box::new(mapper));
        self
    }

    /// Apply all mappers in sequence
    pub fn apply(&self, mut value: f64) -> f64 {
        for mapper in &self.mappers {
            value = mapper.map(value);
        }
        value
    }

    /// Names of the mappers, in application order
    pub fn names(&self) -> Vec<&str> {
        self.mappers.iter().map(|m| m.name()).collect()
    }

    /// Check if the pipeline is empty
    pub fn is_empty(&self) -> bool {
        self.mappers.is_empty()
    }
}

impl Default for MappingPipeline {
    fn default() -> Self {
        Self::new()
    }
}

/// Rounds to the nearest integer, halves away from zero
pub struct RoundMapper {
    name: String,
}

impl RoundMapper {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl Mapper for RoundMapper {
    fn name(&self) -> &str {
        &self.name
    }

    fn map(&self, input: f64) -> f64 {
        input.round()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapping::LinearMapper;

    #[test]
    fn test_pipeline_single_mapper() {
        let pipeline = MappingPipeline::new()
            .with(LinearMapper::new("test", 0.0, 100.0, 0.0, 1.0));

        assert!(!pipeline.is_empty());
        assert_eq!(pipeline.apply(0.0), 0.0);
        assert_eq!(pipeline.apply(50.0), 0.5);
        assert_eq!(pipeline.apply(100.0), 1.0);
    }

    #[test]
    fn test_pipeline_remap_then_round() {
        let pipeline = MappingPipeline::new()
            .with(LinearMapper::new("cc", 0.0, 10.0, 0.0, 127.0))
            .with(RoundMapper::new("round"));

        // 5 -> 63.5 -> 64
        assert_eq!(pipeline.apply(5.0), 64.0);
        assert_eq!(pipeline.names(), vec!["cc", "round"]);
    }

    #[test]
    fn test_round_half_away_from_zero() {
        let round = RoundMapper::new("round");
        assert_eq!(round.map(2.5), 3.0);
        assert_eq!(round.map(2.49), 2.0);
        assert_eq!(round.map(-2.5), -3.0);
    }
}
