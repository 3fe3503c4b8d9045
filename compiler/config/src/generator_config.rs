//! Typed generator configuration produced by the resolver.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Which runtime flavour generated code targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuntimeMode {
    /// No override; the schema file's own preference applies
    #[default]
    Full,
    /// Lite runtime without reflection
    Lite,
    /// Full runtime, optimized for speed
    OptimizeSpeed,
    /// Full runtime, optimized for code size
    OptimizeCodeSize,
}

impl RuntimeMode {
    /// Whether this mode targets the lite runtime.
    pub fn is_lite(&self) -> bool { matches!(self, RuntimeMode::Lite) }

    /// Name used in diagnostics.
    pub fn as_str(&self) -> &'static str {
        match self {
            RuntimeMode::Full => "full",
            RuntimeMode::Lite => "lite",
            RuntimeMode::OptimizeSpeed => "speed",
            RuntimeMode::OptimizeCodeSize => "code_size",
        }
    }
}

impl fmt::Display for RuntimeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

/// How lazily-parsed fields are verified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LazyFieldPolicy {
    /// Runtime default
    #[default]
    Default,
    /// Lazy message sets may skip verification
    UnverifiedAllowed,
    /// Lazy fields are always verified eagerly
    ForceEagerVerification,
}

/// Table-driven parser selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TailCallTableMode {
    /// Let the emitter decide per message
    #[default]
    Auto,
    /// Never emit tail-call tables
    Never,
    /// Always emit tail-call tables
    Always,
}

/// Where field listener hooks are injected.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FieldListenerScope {
    /// Inject into every file
    pub inject_globally: bool,
    /// File identities that get injection even when not global
    pub allowed_files: BTreeSet<String>,
    /// Event names that are never injected
    pub forbidden_events: BTreeSet<String>,
}

impl FieldListenerScope {
    /// Whether listener hooks are injected for `file_name` at all.
    pub fn injects_for(&self, file_name: &str) -> bool {
        self.inject_globally || self.allowed_files.contains(file_name)
    }

    /// Whether `event` is injected for `file_name`.
    pub fn is_event_enabled(&self, file_name: &str, event: &str) -> bool {
        self.injects_for(file_name) && !self.forbidden_events.contains(event)
    }
}

/// Facts about the hosting compiler build, fixed before any parameter is read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeContext {
    /// Generating for the externally distributed runtime
    pub open_source: bool,
    /// Include prefix for runtime headers (e.g. "third_party/protobuf/")
    pub include_base: String,
    /// The compiler is building its own bootstrap schemas
    pub bootstrap: bool,
}

impl Default for RuntimeContext {
    fn default() -> Self {
        Self { open_source: true, include_base: String::new(), bootstrap: false }
    }
}

/// Fully resolved configuration for one invocation.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GeneratorConfiguration {
    /// Marker placed in front of exported symbols
    pub export_decl: String,
    /// Enforced runtime flavour
    pub runtime_mode: RuntimeMode,
    /// Split generated sources per message/extension for link-time dropping
    pub weak_field_linking: bool,
    /// Caller-declared number of numbered source files (weak-field mode only)
    pub requested_file_count: Option<usize>,
    /// Emit the forward-declaration header alongside the primary header
    pub emit_reflection_free_header: bool,
    /// Write an annotation sidecar for every header artifact
    pub capture_annotations: bool,
    /// Pragma name used to reference the sidecar from headers
    pub annotation_pragma: Option<String>,
    /// Macro guarding the sidecar pragma
    pub annotation_guard: Option<String>,
    /// Annotate individual accessors with set/alias semantics
    pub annotate_accessors: bool,
    /// Field listener injection scope
    pub field_listener_scope: FieldListenerScope,
    /// Lazy field verification policy
    pub lazy_field_policy: LazyFieldPolicy,
    /// Tail-call parse table selection
    pub tail_call_table_mode: TailCallTableMode,
    /// Extra boundary checks only available to the controlled in-house runtime
    pub restricted_internal_checks: bool,
    /// Build environment this configuration was resolved for
    pub runtime: RuntimeContext,
}

impl GeneratorConfiguration {
    /// Whether per-unit source splitting is in effect.
    ///
    /// The flag only takes effect while the enforced runtime is still lite; a
    /// later `speed` or `code_size` option switches splitting back off.
    pub fn uses_weak_field_linking(&self) -> bool {
        self.weak_field_linking && self.runtime_mode.is_lite()
    }

    /// Whether header artifacts carry an annotation sidecar.
    pub fn annotates_headers(&self) -> bool { self.capture_annotations }
}
