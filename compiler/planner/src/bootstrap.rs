//! Bootstrap guard.
//!
//! The compiler's own option and plugin schemas are written in the schema
//! language it compiles. Regenerating them in place during a self-build would
//! replace types the running compiler depends on, so those files are mapped to
//! an alternate basename here and nowhere else. The externally distributed
//! runtime ships those files as ordinary generated code, so open-source builds
//! never consult the table.

use config::RuntimeContext;

use crate::naming::strip_schema_extension;

/// Bootstrap-sensitive basenames and the basename their code is generated under.
pub const BOOTSTRAP_BASENAMES: &[(&str, &str)] = &[
    ("google/protobuf/descriptor", "google/protobuf/bootstrap/descriptor"),
    ("google/protobuf/compiler/plugin", "google/protobuf/compiler/bootstrap/plugin"),
    ("google/protobuf/cpp_features", "google/protobuf/bootstrap/cpp_features"),
    ("protogen/generator_options", "protogen/bootstrap/generator_options"),
];

/// What the pipeline should do with one input file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BootstrapDecision {
    /// Not bootstrap-sensitive; generate under the derived basename
    Ordinary {
        /// Input path without its schema extension
        basename: String,
    },
    /// Sensitive, and this is the bootstrap build: generate under the override
    Redirect {
        /// Override basename
        basename: String,
    },
    /// Sensitive, regular build: write forwarding artifacts at `basename` that
    /// point at the prebuilt output under `target`, then stop
    Forward {
        /// Input path without its schema extension
        basename: String,
        /// Override basename holding the real generated code
        target: String,
    },
}

impl BootstrapDecision {
    /// Basename the regular plan should be computed for, if generation continues.
    pub fn generation_basename(&self) -> Option<&str> {
        match self {
            BootstrapDecision::Ordinary { basename } | BootstrapDecision::Redirect { basename } => {
                Some(basename.as_str())
            }
            BootstrapDecision::Forward { .. } => None,
        }
    }
}

/// Maps bootstrap-sensitive file identities to override basenames.
#[derive(Debug, Clone, Copy)]
pub struct BootstrapGuard {
    table: &'static [(&'static str, &'static str)],
}

impl Default for BootstrapGuard {
    fn default() -> Self { Self { table: BOOTSTRAP_BASENAMES } }
}

impl BootstrapGuard {
    /// Override basename for a derived basename, if it is bootstrap-sensitive.
    pub fn override_for(&self, basename: &str) -> Option<&'static str> {
        self.table.iter().find(|(sensitive, _)| *sensitive == basename).map(|(_, alt)| *alt)
    }

    /// Decide how `file_name` is generated for `runtime`.
    pub fn decide(&self, file_name: &str, runtime: &RuntimeContext) -> BootstrapDecision {
        let basename = strip_schema_extension(file_name).to_string();
        if runtime.open_source {
            return BootstrapDecision::Ordinary { basename };
        }
        match self.override_for(&basename) {
            None => BootstrapDecision::Ordinary { basename },
            Some(alt) if runtime.bootstrap => {
                BootstrapDecision::Redirect { basename: alt.to_string() }
            }
            Some(alt) => BootstrapDecision::Forward { basename, target: alt.to_string() },
        }
    }
}

/// Basename for `file_name`: the override for bootstrap-sensitive files in
/// internal builds, the extension-stripped path otherwise.
pub fn resolve_basename(file_name: &str, runtime: &RuntimeContext) -> String {
    match BootstrapGuard::default().decide(file_name, runtime) {
        BootstrapDecision::Ordinary { basename } | BootstrapDecision::Redirect { basename } => {
            basename
        }
        BootstrapDecision::Forward { target, .. } => target,
    }
}
