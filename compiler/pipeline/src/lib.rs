#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::unwrap_used)]

//! High-level pipeline that turns one schema file into generated artifacts.
//!
//! ## Module Organization
//!
//! - `sink` - where finished artifacts go (filesystem or memory)
//! - `driver` - executes an output plan slot by slot
//! - `generator` - resolve options, apply the bootstrap guard, plan, drive

use thiserror::Error;

pub mod driver;
pub mod generator;
pub mod sink;

pub use driver::{EmissionDriver, EmissionSummary};
pub use generator::{GenerateOutcome, GenerationReport, Generator};
pub use sink::{ArtifactSink, FsSink, MemorySink, SinkError};

/// Convenient result type for pipeline operations.
pub type Result<T> = std::result::Result<T, PipelineError>;

/// Errors that can occur while running the generation pipeline.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The parameter string could not be resolved.
    #[error(transparent)]
    Config(#[from] config::ConfigError),
    /// The output plan could not be computed.
    #[error(transparent)]
    Plan(#[from] planner::PlanError),
    /// An engine failed while rendering an artifact.
    #[error("Failed to emit {artifact}: {source}")]
    Emit {
        /// Artifact being rendered
        artifact: String,
        /// Underlying codegen failure
        #[source]
        source: codegen::CodegenError,
    },
    /// The sink rejected an artifact.
    #[error(transparent)]
    Sink(#[from] SinkError),
}
