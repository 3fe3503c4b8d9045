//! Plan execution.
//!
//! [`EmissionDriver`] walks an [`OutputPlan`] in order. For each slot it picks
//! the annotation capture once (header slot and `annotate_headers`), prints
//! the artifact through the engine, hands it to the sink and then hands over
//! the sidecar. Placeholder slots are written empty without calling the
//! engine. The first failure stops the run; earlier artifacts stay written.

use codegen::{
    common_vars, AnnotationCapture, EmissionEngine, EmissionRequest, Printer, SubstitutionTable,
};
use config::GeneratorConfiguration;
use planner::{ArtifactSlot, OutputPlan, SlotKind};
use schema::SchemaFile;
use serde::Serialize;
use tracing::{debug, info};

use crate::sink::ArtifactSink;
use crate::{PipelineError, Result};

/// What a completed run wrote.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EmissionSummary {
    /// Artifact names in write order, sidecars included
    pub written: Vec<String>,
    /// How many of `written` are annotation sidecars
    pub sidecars: usize,
}

/// Executes output plans for one schema under one configuration.
pub struct EmissionDriver<'a, E> {
    config: &'a GeneratorConfiguration,
    schema: &'a SchemaFile,
    engine: E,
    vars: SubstitutionTable,
}

impl<'a, E: EmissionEngine> EmissionDriver<'a, E> {
    /// Driver for `schema`; the substitution table is built here, once.
    pub fn new(config: &'a GeneratorConfiguration, schema: &'a SchemaFile, engine: E) -> Self {
        Self { config, schema, engine, vars: common_vars(config) }
    }

    /// Substitution table shared by every artifact of the run.
    pub fn vars(&self) -> &SubstitutionTable { &self.vars }

    /// Emit every slot of `plan` into `sink`.
    pub fn run(&self, plan: &OutputPlan, sink: &mut dyn ArtifactSink) -> Result<EmissionSummary> {
        let mut summary = EmissionSummary::default();
        for slot in plan {
            self.emit_slot(plan.basename(), slot, sink, &mut summary)?;
        }
        info!(
            file = %self.schema.name,
            artifacts = summary.written.len() - summary.sidecars,
            sidecars = summary.sidecars,
            "emission complete"
        );
        Ok(summary)
    }

    fn emit_slot(
        &self,
        basename: &str,
        slot: &ArtifactSlot,
        sink: &mut dyn ArtifactSink,
        summary: &mut EmissionSummary,
    ) -> Result<()> {
        let capture_enabled = slot.kind.is_header() && self.config.annotates_headers();
        let mut capture = AnnotationCapture::new(&slot.name, capture_enabled);
        debug!(
            artifact = %slot.name,
            kind = ?slot.kind,
            capture = capture_enabled,
            "emitting slot"
        );

        let contents = match slot.kind {
            SlotKind::PlaceholderSource { .. } => String::new(),
            kind => {
                let sidecar_name = capture.sidecar_name();
                let request = EmissionRequest {
                    schema: self.schema,
                    config: self.config,
                    basename,
                    slot: kind,
                    annotation_sidecar: sidecar_name.as_deref(),
                };
                let mut printer = Printer::new(&self.vars, capture.sink(), &self.schema.name);
                self.engine
                    .emit(&request, &mut printer)
                    .map_err(|source| PipelineError::Emit { artifact: slot.name.clone(), source })?;
                printer.into_contents()
            }
        };

        sink.write_artifact(&slot.name, contents.as_bytes())?;
        summary.written.push(slot.name.clone());

        if let Some(sidecar) = capture.finish() {
            let bytes = sidecar
                .to_bytes()
                .map_err(|source| PipelineError::Emit { artifact: sidecar.name(), source })?;
            let name = sidecar.name();
            sink.write_artifact(&name, &bytes)?;
            let records = sidecar.annotations.len();
            debug!(artifact = %name, records, "wrote annotation sidecar");
            summary.written.push(name);
            summary.sidecars += 1;
        }
        Ok(())
    }
}

/// Run `plan` for `schema` with `engine`, writing into `sink`.
pub fn run<E: EmissionEngine>(
    plan: &OutputPlan,
    config: &GeneratorConfiguration,
    schema: &SchemaFile,
    engine: E,
    sink: &mut dyn ArtifactSink,
) -> Result<EmissionSummary> {
    EmissionDriver::new(config, schema, engine).run(plan, sink)
}
