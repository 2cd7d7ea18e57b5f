//! Declarative stage plan for the enrichment pipeline.
//!
//! The orchestration shell itself is an external collaborator; this
//! module only declares the directed stage list with named input and
//! output datasets, so stage wiring is validated up front and a future
//! scheduler can skip up-to-date stages.

use thiserror::Error;

/// Name of the pipeline's source dataset, the location catalog.
pub const SOURCE_DATASET: &str = "locations";

#[derive(Debug, Error)]
pub enum StagePlanError {
    #[error("Stage plan contains no stages")]
    Empty,

    #[error("Stage '{stage}' reads '{input}', which no prior stage produces")]
    UnknownInput { stage: String, input: String },

    #[error("Dataset '{output}' is produced by more than one stage")]
    DuplicateOutput { output: String },
}

/// One pipeline stage: a named transformation from one dataset to the
/// next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stage {
    pub name: String,
    pub input: String,
    pub output: String,
}

impl Stage {
    pub fn new(name: &str, input: &str, output: &str) -> Self {
        Self {
            name: name.to_string(),
            input: input.to_string(),
            output: output.to_string(),
        }
    }
}

/// An ordered list of stages forming one directed enrichment chain.
#[derive(Debug, Clone)]
pub struct StagePlan {
    stages: Vec<Stage>,
}

impl StagePlan {
    pub fn new(stages: Vec<Stage>) -> Self {
        Self { stages }
    }

    /// The stage order the original deployment runs: elevation,
    /// weather, vegetation index, then air quality, each reading the
    /// previous stage's output.
    pub fn default_plan() -> Self {
        Self::new(vec![
            Stage::new("elevation", SOURCE_DATASET, "locations_elevation"),
            Stage::new("weather", "locations_elevation", "locations_weather"),
            Stage::new("ndvi", "locations_weather", "locations_ndvi"),
            Stage::new("air_quality", "locations_ndvi", "locations_airquality"),
        ])
    }

    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    /// Name of the dataset the final stage produces. The orchestration
    /// driver snapshots this one.
    pub fn final_output(&self) -> Option<&str> {
        self.stages.last().map(|s| s.output.as_str())
    }

    /// Checks that the plan forms a usable chain: every stage reads
    /// either the source catalog or a dataset some earlier stage
    /// produced, and no two stages produce the same dataset.
    pub fn validate(&self) -> Result<(), StagePlanError> {
        if self.stages.is_empty() {
            return Err(StagePlanError::Empty);
        }
        let mut produced: Vec<&str> = vec![SOURCE_DATASET];
        for stage in &self.stages {
            if !produced.iter().any(|p| *p == stage.input) {
                return Err(StagePlanError::UnknownInput {
                    stage: stage.name.clone(),
                    input: stage.input.clone(),
                });
            }
            if produced.iter().any(|p| *p == stage.output) {
                return Err(StagePlanError::DuplicateOutput {
                    output: stage.output.clone(),
                });
            }
            produced.push(&stage.output);
        }
        Ok(())
    }
}
