//! Annotation capture.
//!
//! While an artifact is printed, annotated writes report the byte range they
//! produced and the schema element they came from. [`AnnotationCapture`] is
//! chosen once per artifact: it either collects those records into a sidecar
//! or drops them.

use planner::naming::annotation_sidecar_name;
use schema::SchemaPath;
use serde::{Deserialize, Serialize};

use crate::Result;

/// How an annotated range relates to its element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnnotationSemantic {
    /// The range modifies the element (setters, mutators)
    Set,
    /// The range hands out another name for the element (mutable accessors)
    Alias,
}

/// One annotated byte range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnotationRecord {
    /// Element path within `source_file`
    pub path: SchemaPath,
    /// Schema file the element is declared in
    pub source_file: String,
    /// First byte of the range
    pub begin: usize,
    /// One past the last byte of the range
    pub end: usize,
    /// Accessor semantic, when accessor annotation is enabled
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub semantic: Option<AnnotationSemantic>,
}

/// Receiver for annotation records.
pub trait AnnotationSink {
    /// Accept one record.
    fn record(&mut self, record: AnnotationRecord);

    /// Whether records are kept. Printers skip building records otherwise.
    fn is_capturing(&self) -> bool { true }
}

/// Drops every record.
#[derive(Debug, Default)]
pub struct NoopAnnotations;

impl AnnotationSink for NoopAnnotations {
    fn record(&mut self, _record: AnnotationRecord) {}

    fn is_capturing(&self) -> bool { false }
}

/// Keeps records in emission order.
#[derive(Debug, Default)]
pub struct AnnotationCollector {
    records: Vec<AnnotationRecord>,
}

impl AnnotationCollector {
    /// Records collected so far.
    pub fn records(&self) -> &[AnnotationRecord] { &self.records }
}

impl AnnotationSink for AnnotationCollector {
    fn record(&mut self, record: AnnotationRecord) { self.records.push(record); }
}

/// Sidecar contents for one artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnotationSidecar {
    /// Artifact the ranges refer to
    pub artifact: String,
    /// Records in emission order
    pub annotations: Vec<AnnotationRecord>,
}

impl AnnotationSidecar {
    /// Sidecar artifact name, `<artifact>.meta`.
    pub fn name(&self) -> String { annotation_sidecar_name(&self.artifact) }

    /// Serialized sidecar bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut bytes = serde_json::to_vec_pretty(self)?;
        bytes.push(b'\n');
        Ok(bytes)
    }
}

/// Per-artifact capture decision.
#[derive(Debug)]
pub struct AnnotationCapture {
    artifact: String,
    collector: Option<AnnotationCollector>,
    noop: NoopAnnotations,
}

impl AnnotationCapture {
    /// Capture for `artifact`; records are only kept when `enabled`.
    pub fn new(artifact: &str, enabled: bool) -> Self {
        Self {
            artifact: artifact.to_string(),
            collector: enabled.then(AnnotationCollector::default),
            noop: NoopAnnotations,
        }
    }

    /// Whether a sidecar will be produced.
    pub fn is_enabled(&self) -> bool { self.collector.is_some() }

    /// Sidecar name when enabled, passed to emitters so headers can reference it.
    pub fn sidecar_name(&self) -> Option<String> {
        self.collector.as_ref().map(|_| annotation_sidecar_name(&self.artifact))
    }

    /// Sink printers write records into.
    pub fn sink(&mut self) -> &mut dyn AnnotationSink {
        match self.collector.as_mut() {
            Some(collector) => collector,
            None => &mut self.noop,
        }
    }

    /// Finish the artifact; yields the sidecar when enabled.
    pub fn finish(self) -> Option<AnnotationSidecar> {
        let artifact = self.artifact;
        self.collector
            .map(|collector| AnnotationSidecar { artifact, annotations: collector.records })
    }
}

/// Capture wrapper for `artifact`, collecting only when `enabled`.
pub fn with_capture(artifact: &str, enabled: bool) -> AnnotationCapture {
    AnnotationCapture::new(artifact, enabled)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(begin: usize, end: usize) -> AnnotationRecord {
        AnnotationRecord {
            path: SchemaPath::message(0),
            source_file: "a.proto".to_string(),
            begin,
            end,
            semantic: None,
        }
    }

    #[test]
    fn disabled_capture_drops_records() {
        let mut capture = with_capture("a.pb.h", false);
        assert!(!capture.sink().is_capturing());
        capture.sink().record(record(0, 3));
        assert_eq!(capture.sidecar_name(), None);
        assert!(capture.finish().is_none());
    }

    #[test]
    fn enabled_capture_keeps_order_and_names_sidecar() {
        let mut capture = with_capture("a.pb.h", true);
        capture.sink().record(record(0, 3));
        capture.sink().record(record(5, 9));
        assert_eq!(capture.sidecar_name().as_deref(), Some("a.pb.h.meta"));

        let sidecar = capture.finish().expect("enabled capture yields a sidecar");
        assert_eq!(sidecar.name(), "a.pb.h.meta");
        assert_eq!(sidecar.annotations, vec![record(0, 3), record(5, 9)]);

        let parsed: AnnotationSidecar =
            serde_json::from_slice(&sidecar.to_bytes().expect("serializes")).expect("parses");
        assert_eq!(parsed, sidecar);
    }
}
