//! Element paths into a schema file.
//!
//! A path is the sequence of (field number, index) pairs that reaches an
//! element from the file root, using the descriptor numbering tooling expects:
//! messages are `[4, i]`, enums `[5, i]`, services `[6, i]`, extensions
//! `[7, i]`; a message field appends `[2, j]`, an enum value `[2, j]` and a
//! service method `[2, j]`. Indices beyond `i32::MAX` saturate.

use std::fmt;

use serde::{Deserialize, Serialize};

const MESSAGE_TYPE: i32 = 4;
const ENUM_TYPE: i32 = 5;
const SERVICE: i32 = 6;
const EXTENSION: i32 = 7;
const MEMBER: i32 = 2;

/// Path from the file root to one schema element.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct SchemaPath(Vec<i32>);

impl SchemaPath {
    /// Top-level message `index`.
    pub fn message(index: usize) -> Self { Self(vec![MESSAGE_TYPE, component(index)]) }

    /// Top-level enum `index`.
    pub fn enumeration(index: usize) -> Self { Self(vec![ENUM_TYPE, component(index)]) }

    /// Service `index`.
    pub fn service(index: usize) -> Self { Self(vec![SERVICE, component(index)]) }

    /// Top-level extension `index`.
    pub fn extension(index: usize) -> Self { Self(vec![EXTENSION, component(index)]) }

    /// Member `index` of this element (field, enum value or method).
    pub fn member(&self, index: usize) -> Self {
        let mut path = self.0.clone();
        path.extend([MEMBER, component(index)]);
        Self(path)
    }

    /// Raw path components.
    pub fn as_slice(&self) -> &[i32] { &self.0 }
}

fn component(index: usize) -> i32 { i32::try_from(index).unwrap_or(i32::MAX) }

impl fmt::Display for SchemaPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.0.iter().map(|c| c.to_string()).collect();
        write!(f, "[{}]", parts.join(", "))
    }
}
