//! Forwarding artifacts for bootstrap-sensitive schemas.
//!
//! A regular build of a bootstrap-sensitive schema must not regenerate it.
//! Instead the expected artifact names are filled with headers that include
//! the prebuilt output under the override basename, plus an empty source.

use planner::naming::{
    filename_identifier, forward_decl_header_name, primary_header_name, source_name,
};

fn forwarding_header(basename: &str, target_header: &str, tag: &str) -> String {
    let guard = format!("PROTOBUF_INCLUDED_{}_FORWARD_{}", filename_identifier(basename), tag);
    format!(
        "#ifndef {guard}\n#define {guard}\n\
         #include \"{target_header}\"  // IWYU pragma: export\n\
         #endif  // {guard}\n"
    )
}

/// `(artifact name, contents)` pairs written at `basename` that forward to `target`.
pub fn forwarding_artifacts(basename: &str, target: &str) -> Vec<(String, String)> {
    vec![
        (
            primary_header_name(basename),
            forwarding_header(basename, &primary_header_name(target), "PB_H"),
        ),
        (
            forward_decl_header_name(basename),
            forwarding_header(basename, &forward_decl_header_name(target), "PROTO_H"),
        ),
        (source_name(basename), "\n".to_string()),
    ]
}
