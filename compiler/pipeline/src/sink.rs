//! Artifact sinks.
//!
//! The driver hands every finished artifact to an [`ArtifactSink`] exactly
//! once, under its relative artifact name. Writes are not rolled back when a
//! later artifact fails.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Component, Path, PathBuf};

use thiserror::Error;
use tracing::debug;

/// Errors raised by sinks.
#[derive(Debug, Error)]
pub enum SinkError {
    /// The artifact name would land outside the output root.
    #[error("Artifact name escapes the output directory: {0}")]
    InvalidName(String),
    /// The artifact was already written during this invocation.
    #[error("Artifact written twice: {0}")]
    Duplicate(String),
    /// Filesystem failure.
    #[error("Failed to write {path}: {source}")]
    Io {
        /// Destination path
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

/// Destination for finished artifacts.
pub trait ArtifactSink {
    /// Store `contents` under the relative artifact `name`.
    fn write_artifact(&mut self, name: &str, contents: &[u8]) -> Result<(), SinkError>;
}

impl<S: ArtifactSink + ?Sized> ArtifactSink for &mut S {
    fn write_artifact(&mut self, name: &str, contents: &[u8]) -> Result<(), SinkError> {
        (**self).write_artifact(name, contents)
    }
}

/// Writes artifacts below an output directory, creating parents as needed.
#[derive(Debug, Clone)]
pub struct FsSink {
    root: PathBuf,
}

impl FsSink {
    /// Sink rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self { Self { root: root.into() } }

    /// Output directory.
    pub fn root(&self) -> &Path { &self.root }

    /// Absolute destination for `name`, rejecting names that leave the root.
    pub fn path_for(&self, name: &str) -> Result<PathBuf, SinkError> {
        let relative = Path::new(name);
        let escapes = relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
        if name.is_empty() || escapes {
            return Err(SinkError::InvalidName(name.to_string()));
        }
        Ok(self.root.join(relative))
    }
}

impl ArtifactSink for FsSink {
    fn write_artifact(&mut self, name: &str, contents: &[u8]) -> Result<(), SinkError> {
        let path = self.path_for(name)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|source| SinkError::Io { path: parent.to_path_buf(), source })?;
        }
        fs::write(&path, contents).map_err(|source| SinkError::Io { path: path.clone(), source })?;
        debug!(path = %path.display(), bytes = contents.len(), "wrote artifact");
        Ok(())
    }
}

/// Keeps artifacts in memory, ordered by name.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    artifacts: BTreeMap<String, Vec<u8>>,
    order: Vec<String>,
}

impl MemorySink {
    /// Empty sink.
    pub fn new() -> Self { Self::default() }

    /// Contents of `name`, if written.
    pub fn get(&self, name: &str) -> Option<&[u8]> { self.artifacts.get(name).map(Vec::as_slice) }

    /// Contents of `name` as UTF-8, if written and valid.
    pub fn text(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(|bytes| std::str::from_utf8(bytes).ok())
    }

    /// Names in the order they were written.
    pub fn write_order(&self) -> &[String] { &self.order }

    /// Number of artifacts held.
    pub fn len(&self) -> usize { self.artifacts.len() }

    /// Whether nothing was written.
    pub fn is_empty(&self) -> bool { self.artifacts.is_empty() }
}

impl ArtifactSink for MemorySink {
    fn write_artifact(&mut self, name: &str, contents: &[u8]) -> Result<(), SinkError> {
        if self.artifacts.contains_key(name) {
            return Err(SinkError::Duplicate(name.to_string()));
        }
        self.artifacts.insert(name.to_string(), contents.to_vec());
        self.order.push(name.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn fs_sink_creates_nested_directories() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let mut sink = FsSink::new(dir.path());
        sink.write_artifact("acme/orders.out/3.cc", b"").expect("writes");
        sink.write_artifact("acme/orders.pb.h", b"// header\n").expect("writes");

        assert!(dir.path().join("acme/orders.out/3.cc").is_file());
        let header = fs::read_to_string(dir.path().join("acme/orders.pb.h")).expect("reads");
        assert_eq!(header, "// header\n");
    }

    #[test]
    fn fs_sink_rejects_names_outside_the_root() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let mut sink = FsSink::new(dir.path());
        for name in ["../escape.pb.h", "/abs.pb.h", ""] {
            match sink.write_artifact(name, b"x") {
                Err(SinkError::InvalidName(n)) => assert_eq!(n, name),
                other => panic!("expected InvalidName for {name:?}, got {other:?}"),
            }
        }
    }

    #[test]
    fn memory_sink_keeps_write_order_and_rejects_duplicates() {
        let mut sink = MemorySink::new();
        sink.write_artifact("b.pb.h", b"b").expect("writes");
        sink.write_artifact("a.pb.cc", b"a").expect("writes");
        assert_eq!(sink.write_order(), ["b.pb.h".to_string(), "a.pb.cc".to_string()]);
        assert_eq!(sink.text("a.pb.cc"), Some("a"));
        assert!(matches!(sink.write_artifact("a.pb.cc", b"again"), Err(SinkError::Duplicate(_))));
        assert_eq!(sink.len(), 2);
    }
}
