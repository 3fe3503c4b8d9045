//! Artifact naming.
//!
//! Every artifact name is derived from the schema basename (the input path
//! with its schema extension removed), so distinct inputs never collide.

/// Primary header: `<basename>.pb.h`
pub const PRIMARY_HEADER_SUFFIX: &str = "pb.h";
/// Forward-declaration header: `<basename>.proto.h`
pub const FORWARD_DECL_HEADER_SUFFIX: &str = "proto.h";
/// Single or global source: `<basename>.pb.cc`
pub const SOURCE_SUFFIX: &str = "pb.cc";
/// Extension of numbered sources under `<basename>.out/`
pub const NUMBERED_SOURCE_EXTENSION: &str = "cc";
/// Annotation sidecar: `<artifact>.meta`
pub const ANNOTATION_SUFFIX: &str = "meta";

const SCHEMA_EXTENSIONS: [&str; 2] = [".protodevel", ".proto"];

/// Strip the schema extension from a file identity, if present.
pub fn strip_schema_extension(file_name: &str) -> &str {
    SCHEMA_EXTENSIONS
        .iter()
        .find_map(|ext| file_name.strip_suffix(ext))
        .unwrap_or(file_name)
}

/// `<basename>.pb.h`
pub fn primary_header_name(basename: &str) -> String {
    format!("{basename}.{PRIMARY_HEADER_SUFFIX}")
}

/// `<basename>.proto.h`
pub fn forward_decl_header_name(basename: &str) -> String {
    format!("{basename}.{FORWARD_DECL_HEADER_SUFFIX}")
}

/// `<basename>.pb.cc`
pub fn source_name(basename: &str) -> String { format!("{basename}.{SOURCE_SUFFIX}") }

/// `<basename>.out/<n>.cc`
pub fn numbered_source_name(basename: &str, number: usize) -> String {
    format!("{basename}.out/{number}.{NUMBERED_SOURCE_EXTENSION}")
}

/// `<artifact>.meta`
pub fn annotation_sidecar_name(artifact: &str) -> String {
    format!("{artifact}.{ANNOTATION_SUFFIX}")
}

/// Identifier-safe spelling of a file name, for include guards and symbols.
///
/// ASCII alphanumerics pass through; every other byte becomes `_xx` with the
/// lowercase hex value, so `a/b.proto` becomes `a_2fb_2eproto`.
pub fn filename_identifier(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for byte in name.bytes() {
        if byte.is_ascii_alphanumeric() {
            out.push(byte as char);
        } else {
            out.push_str(&format!("_{byte:02x}"));
        }
    }
    out
}
