//! Output plan computation.

use std::fmt;

use config::GeneratorConfiguration;
use serde::Serialize;
use tracing::debug;

use crate::naming;
use crate::PlanError;

/// A top-level message or extension, by declaration index within its category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LogicalUnit {
    /// Top-level message `i`
    Message(usize),
    /// Top-level extension `i`
    Extension(usize),
}

impl fmt::Display for LogicalUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogicalUnit::Message(i) => write!(f, "message #{i}"),
            LogicalUnit::Extension(i) => write!(f, "extension #{i}"),
        }
    }
}

/// What one artifact carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum SlotKind {
    /// Main header, always produced
    PrimaryHeader,
    /// Forward-declaration header (`proto_h`)
    ForwardDeclHeader,
    /// All definitions in one source file
    SingleSource,
    /// Enums, services and tables that cannot be split per unit
    GlobalSource,
    /// One unit's definitions in numbered source `ordinal`
    IndexedSource {
        /// Position under `<basename>.out/`
        ordinal: usize,
        /// Unit placed in this file
        unit: LogicalUnit,
    },
    /// Empty numbered source that only pads the file count
    PlaceholderSource {
        /// Position under `<basename>.out/`
        ordinal: usize,
    },
}

impl SlotKind {
    /// Header artifacts are the only ones that can carry annotations.
    pub fn is_header(&self) -> bool {
        matches!(self, SlotKind::PrimaryHeader | SlotKind::ForwardDeclHeader)
    }

    /// Artifact name for this slot under `basename`.
    pub fn artifact_name(&self, basename: &str) -> String {
        match self {
            SlotKind::PrimaryHeader => naming::primary_header_name(basename),
            SlotKind::ForwardDeclHeader => naming::forward_decl_header_name(basename),
            SlotKind::SingleSource | SlotKind::GlobalSource => naming::source_name(basename),
            SlotKind::IndexedSource { ordinal, .. } | SlotKind::PlaceholderSource { ordinal } => {
                naming::numbered_source_name(basename, *ordinal)
            }
        }
    }
}

/// One artifact to be produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArtifactSlot {
    /// Content kind
    pub kind: SlotKind,
    /// Artifact name relative to the output root
    pub name: String,
}

/// Ordered artifact slots for one invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutputPlan {
    basename: String,
    slots: Vec<ArtifactSlot>,
}

impl OutputPlan {
    /// Basename all artifact names derive from.
    pub fn basename(&self) -> &str { &self.basename }

    /// Slots in emission order.
    pub fn slots(&self) -> &[ArtifactSlot] { &self.slots }

    /// Number of slots.
    pub fn len(&self) -> usize { self.slots.len() }

    /// Whether the plan has no slots (never true for a computed plan).
    pub fn is_empty(&self) -> bool { self.slots.is_empty() }

    /// Artifact names in emission order.
    pub fn artifact_names(&self) -> Vec<&str> {
        self.slots.iter().map(|s| s.name.as_str()).collect()
    }

    /// Number of `IndexedSource` slots.
    pub fn indexed_count(&self) -> usize {
        self.slots.iter().filter(|s| matches!(s.kind, SlotKind::IndexedSource { .. })).count()
    }

    /// Number of `PlaceholderSource` slots.
    pub fn placeholder_count(&self) -> usize {
        self.slots.iter().filter(|s| matches!(s.kind, SlotKind::PlaceholderSource { .. })).count()
    }

    fn push(&mut self, kind: SlotKind) {
        let name = kind.artifact_name(&self.basename);
        self.slots.push(ArtifactSlot { kind, name });
    }
}

impl<'a> IntoIterator for &'a OutputPlan {
    type Item = &'a ArtifactSlot;
    type IntoIter = std::slice::Iter<'a, ArtifactSlot>;

    fn into_iter(self) -> Self::IntoIter { self.slots.iter() }
}

/// Compute the artifact plan for a schema with `messages` top-level messages
/// and `extensions` top-level extensions.
///
/// Order: headers (forward-declaration header first, when enabled), then
/// either one `SingleSource`, or in weak-field mode one `GlobalSource`
/// followed by an `IndexedSource` per message and per extension and finally
/// `PlaceholderSource` padding up to the requested file count.
pub fn plan(
    config: &GeneratorConfiguration,
    basename: &str,
    messages: usize,
    extensions: usize,
) -> Result<OutputPlan, PlanError> {
    let mut out = OutputPlan { basename: basename.to_string(), slots: Vec::new() };

    if config.emit_reflection_free_header {
        out.push(SlotKind::ForwardDeclHeader);
    }
    out.push(SlotKind::PrimaryHeader);

    if !config.uses_weak_field_linking() {
        out.push(SlotKind::SingleSource);
        debug!(basename, slots = out.len(), "planned single-source output");
        return Ok(out);
    }

    let required = messages + extensions;
    let total = match config.requested_file_count {
        Some(requested) if requested < required => {
            return Err(PlanError::FileCountTooSmall { requested, required })
        }
        Some(requested) => requested,
        None => required,
    };

    out.push(SlotKind::GlobalSource);
    let units =
        (0..messages).map(LogicalUnit::Message).chain((0..extensions).map(LogicalUnit::Extension));
    for (ordinal, unit) in units.enumerate() {
        out.push(SlotKind::IndexedSource { ordinal, unit });
    }
    for ordinal in required..total {
        out.push(SlotKind::PlaceholderSource { ordinal });
    }

    debug!(
        basename,
        indexed = required,
        placeholders = total - required,
        "planned weak-field split output"
    );
    Ok(out)
}
