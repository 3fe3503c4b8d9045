//! Fixed substitution variables shared by every artifact of one invocation.
//!
//! The table is built once from the resolved configuration and handed to each
//! printer; nothing in it changes while artifacts are emitted.

use std::collections::BTreeMap;

use config::GeneratorConfiguration;

const THICK_SEPARATOR: &str =
    "// ===================================================================\n";
const THIN_SEPARATOR: &str =
    "// -------------------------------------------------------------------\n";

/// Read-only `$name$` → text lookup.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SubstitutionTable {
    vars: BTreeMap<&'static str, String>,
}

impl SubstitutionTable {
    /// Value for `name`, if defined.
    pub fn get(&self, name: &str) -> Option<&str> { self.vars.get(name).map(String::as_str) }

    /// Whether `name` is defined.
    pub fn contains(&self, name: &str) -> bool { self.vars.contains_key(name) }

    /// Number of defined names.
    pub fn len(&self) -> usize { self.vars.len() }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool { self.vars.is_empty() }
}

/// Runtime namespace for the configured build.
pub fn runtime_namespace(config: &GeneratorConfiguration) -> &'static str {
    if config.runtime.open_source {
        "google::protobuf"
    } else {
        "proto2"
    }
}

/// Build the substitution table for `config`.
pub fn common_vars(config: &GeneratorConfiguration) -> SubstitutionTable {
    let ns = runtime_namespace(config);
    let export = if config.export_decl.is_empty() {
        String::new()
    } else {
        format!("{} ", config.export_decl)
    };

    let vars: BTreeMap<&'static str, String> = [
        ("proto_ns", ns.to_string()),
        ("pb", format!("::{ns}")),
        ("pbi", format!("::{ns}::internal")),
        ("string", "std::string".to_string()),
        ("int8", "::int8_t".to_string()),
        ("int32", "::int32_t".to_string()),
        ("int64", "::int64_t".to_string()),
        ("uint8", "::uint8_t".to_string()),
        ("uint32", "::uint32_t".to_string()),
        ("uint64", "::uint64_t".to_string()),
        ("hrule_thick", THICK_SEPARATOR.to_string()),
        ("hrule_thin", THIN_SEPARATOR.to_string()),
        (
            "GOOGLE_PROTOBUF",
            if config.runtime.open_source { "GOOGLE_PROTOBUF" } else { "PROTO2_RUNTIME" }
                .to_string(),
        ),
        ("CHK", "ABSL_CHECK".to_string()),
        ("DCHK", "ABSL_DCHECK".to_string()),
        ("dllexport_decl", export),
    ]
    .into_iter()
    .collect();

    SubstitutionTable { vars }
}
