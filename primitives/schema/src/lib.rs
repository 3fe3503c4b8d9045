#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::unwrap_used)]

//! protogen schema model
//!
//! A read-only description of one parsed schema file: its top-level messages,
//! extensions, enums and services in declaration order. The planner only ever
//! refers to messages and extensions by their index within their category;
//! emission engines read the declarations themselves.

pub mod element_path;
pub mod schema_file;

pub use element_path::SchemaPath;
pub use schema_file::*;
