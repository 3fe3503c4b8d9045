#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::unwrap_used)]

//! Artifact emission building blocks.
//!
//! This crate holds everything an artifact is printed with: the fixed
//! substitution table, the [`Printer`](printer::Printer), annotation capture,
//! and the [`EmissionEngine`] seam that turns one planned slot into text.
//! Rendering rules for individual declarations belong to engines; the
//! [`SkeletonEngine`](skeleton::SkeletonEngine) shipped here renders a compact
//! outline and is what the CLI uses.

use config::GeneratorConfiguration;
use planner::SlotKind;
use schema::SchemaFile;
use thiserror::Error;

pub mod annotation;
pub mod forwarding;
pub mod printer;
pub mod skeleton;
pub mod variables;

pub use annotation::{with_capture, AnnotationCapture, AnnotationRecord, AnnotationSidecar};
pub use printer::Printer;
pub use skeleton::SkeletonEngine;
pub use variables::{common_vars, SubstitutionTable};

/// Error type for code generation operations in this crate.
#[derive(Debug, Error)]
pub enum CodegenError {
    /// A template referenced a variable that is not defined.
    #[error("Undefined substitution variable: ${0}$")]
    UndefinedVariable(String),
    /// A slot referenced a unit the schema does not declare.
    #[error("{slot:?} refers to {unit} but the schema declares only {available}")]
    UnitOutOfRange {
        /// Slot being emitted
        slot: SlotKind,
        /// Missing unit
        unit: planner::LogicalUnit,
        /// Units of that category in the schema
        available: usize,
    },
    /// JSON serialization error (annotation sidecars).
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Convenient result type for codegen functions in this crate.
pub type Result<T> = std::result::Result<T, CodegenError>;

/// Everything an engine needs to render one slot.
#[derive(Debug, Clone, Copy)]
pub struct EmissionRequest<'a> {
    /// Schema being compiled
    pub schema: &'a SchemaFile,
    /// Resolved configuration
    pub config: &'a GeneratorConfiguration,
    /// Basename artifacts are written under
    pub basename: &'a str,
    /// Slot to render, including its assigned unit
    pub slot: SlotKind,
    /// Name of the annotation sidecar for this artifact, when one is written
    pub annotation_sidecar: Option<&'a str>,
}

/// Renders the text of one planned artifact.
///
/// Engines receive the substitution table through the printer and must not
/// keep state between calls; the driver may call them in any plan order.
pub trait EmissionEngine {
    /// Print the artifact for `request.slot` into `printer`.
    fn emit(&self, request: &EmissionRequest<'_>, printer: &mut Printer<'_>) -> Result<()>;
}

impl<E: EmissionEngine + ?Sized> EmissionEngine for &E {
    fn emit(&self, request: &EmissionRequest<'_>, printer: &mut Printer<'_>) -> Result<()> {
        (**self).emit(request, printer)
    }
}
