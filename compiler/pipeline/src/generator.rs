//! One generator invocation: resolve, guard, plan, drive.

use codegen::forwarding::forwarding_artifacts;
use codegen::EmissionEngine;
use config::{resolve_with, GeneratorConfiguration, RuntimeContext};
use planner::{plan, BootstrapDecision, BootstrapGuard, OutputPlan};
use schema::SchemaFile;
use serde::Serialize;
use tracing::{error, info};

use crate::driver::EmissionDriver;
use crate::sink::ArtifactSink;
use crate::{PipelineError, Result};

/// Result of a successful invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenerationReport {
    /// Basename artifacts were written under
    pub basename: String,
    /// Artifact names in write order
    pub written: Vec<String>,
    /// Set when forwarding artifacts were written instead of generated code
    pub forwarded_to: Option<String>,
}

/// Boolean success flag plus the first fatal message, for harness boundaries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenerateOutcome {
    /// Whether the invocation completed
    pub success: bool,
    /// First fatal condition, when `success` is false
    pub error: Option<String>,
}

impl<T> From<Result<T>> for GenerateOutcome {
    fn from(result: Result<T>) -> Self {
        match result {
            Ok(_) => GenerateOutcome { success: true, error: None },
            Err(e) => GenerateOutcome { success: false, error: Some(e.to_string()) },
        }
    }
}

/// Generator stage for one hosting runtime.
#[derive(Debug, Clone)]
pub struct Generator<E> {
    engine: E,
    runtime: RuntimeContext,
    guard: BootstrapGuard,
}

impl<E: EmissionEngine> Generator<E> {
    /// Generator rendering with `engine` for the given runtime.
    pub fn new(engine: E, runtime: RuntimeContext) -> Self {
        Self { engine, runtime, guard: BootstrapGuard::default() }
    }

    /// Runtime facts every invocation is resolved against.
    pub fn runtime(&self) -> &RuntimeContext { &self.runtime }

    /// Resolve `parameter` for this runtime.
    pub fn configure(&self, parameter: &str) -> Result<GeneratorConfiguration> {
        Ok(resolve_with(parameter, self.runtime.clone())?)
    }

    /// Plan `schema` without emitting anything. Forwarded files have no plan.
    pub fn plan(&self, schema: &SchemaFile, parameter: &str) -> Result<Option<OutputPlan>> {
        let config = self.configure(parameter)?;
        match self.guard.decide(&schema.name, &self.runtime).generation_basename() {
            Some(basename) => Ok(Some(plan(
                &config,
                basename,
                schema.message_count(),
                schema.extension_count(),
            )?)),
            None => Ok(None),
        }
    }

    /// Generate every artifact for `schema` into `sink`.
    ///
    /// Options are resolved before anything is written. In internal builds a
    /// bootstrap-sensitive file outside the bootstrap build only receives
    /// forwarding artifacts.
    pub fn generate(
        &self,
        schema: &SchemaFile,
        parameter: &str,
        sink: &mut dyn ArtifactSink,
    ) -> Result<GenerationReport> {
        let config = self.configure(parameter)?;

        let basename = match self.guard.decide(&schema.name, &self.runtime) {
            BootstrapDecision::Forward { basename, target } => {
                return forward(&basename, &target, sink)
            }
            BootstrapDecision::Redirect { basename } => {
                info!(file = %schema.name, %basename, "bootstrap build, generating under override");
                basename
            }
            BootstrapDecision::Ordinary { basename } => basename,
        };

        let plan = plan(&config, &basename, schema.message_count(), schema.extension_count())?;
        let summary = EmissionDriver::new(&config, schema, &self.engine).run(&plan, sink)?;
        Ok(GenerationReport { basename, written: summary.written, forwarded_to: None })
    }

    /// [`generate`](Self::generate), reduced to the success flag and message.
    pub fn generate_outcome(
        &self,
        schema: &SchemaFile,
        parameter: &str,
        sink: &mut dyn ArtifactSink,
    ) -> GenerateOutcome {
        let result = self.generate(schema, parameter, sink);
        if let Err(e) = &result {
            error!(file = %schema.name, "generation failed: {e}");
        }
        result.into()
    }
}

fn forward(basename: &str, target: &str, sink: &mut dyn ArtifactSink) -> Result<GenerationReport> {
    info!(%basename, %target, "bootstrap-sensitive file, writing forwarding artifacts");
    let mut written = Vec::new();
    for (name, contents) in forwarding_artifacts(basename, target) {
        sink.write_artifact(&name, contents.as_bytes()).map_err(PipelineError::from)?;
        written.push(name);
    }
    Ok(GenerationReport {
        basename: basename.to_string(),
        written,
        forwarded_to: Some(target.to_string()),
    })
}
