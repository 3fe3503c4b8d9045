//! Text printer with `$var$` substitution, indentation and annotation hooks.
//!
//! `$name$` is replaced by the per-call variables first, then the invocation's
//! [`SubstitutionTable`]; `$$` prints a literal `$`. Unknown names are an
//! error rather than being copied through.

use std::sync::OnceLock;

use regex::{Captures, Regex};
use schema::SchemaPath;

use crate::annotation::{AnnotationRecord, AnnotationSemantic, AnnotationSink};
use crate::variables::SubstitutionTable;
use crate::{CodegenError, Result};

static VARIABLE: OnceLock<Regex> = OnceLock::new();

fn variable_pattern() -> &'static Regex {
    VARIABLE.get_or_init(|| {
        Regex::new(r"\$([A-Za-z_][A-Za-z0-9_]*)?\$").expect("variable pattern is a valid regex")
    })
}

const INDENT: &str = "  ";

/// Buffered writer for one artifact.
pub struct Printer<'a> {
    buf: String,
    vars: &'a SubstitutionTable,
    annotations: &'a mut dyn AnnotationSink,
    source_file: String,
    depth: usize,
    at_line_start: bool,
}

impl<'a> Printer<'a> {
    /// Printer for an artifact generated from `source_file`.
    pub fn new(
        vars: &'a SubstitutionTable,
        annotations: &'a mut dyn AnnotationSink,
        source_file: &str,
    ) -> Self {
        Self {
            buf: String::new(),
            vars,
            annotations,
            source_file: source_file.to_string(),
            depth: 0,
            at_line_start: true,
        }
    }

    /// Substitution table in effect.
    pub fn vars(&self) -> &SubstitutionTable { self.vars }

    /// Bytes written so far.
    pub fn position(&self) -> usize { self.buf.len() }

    /// Print `template` after substitution.
    pub fn print(&mut self, template: &str) -> Result<()> { self.print_with(template, &[]) }

    /// Print `template` with extra per-call variables.
    pub fn print_with(&mut self, template: &str, extra: &[(&str, &str)]) -> Result<()> {
        let text = self.substitute(template, extra)?;
        self.write_raw(&text);
        Ok(())
    }

    /// Print `template` and record the range it produced against `path`.
    pub fn print_annotated(
        &mut self,
        template: &str,
        extra: &[(&str, &str)],
        path: &SchemaPath,
        semantic: Option<AnnotationSemantic>,
    ) -> Result<()> {
        let text = self.substitute(template, extra)?;
        let body = text.trim_end_matches('\n');
        self.flush_indent(body);
        let begin = self.position();
        self.write_raw(body);
        let end = self.position();
        self.write_raw(&text[body.len()..]);

        if self.annotations.is_capturing() && end > begin {
            self.annotations.record(AnnotationRecord {
                path: path.clone(),
                source_file: self.source_file.clone(),
                begin,
                end,
                semantic,
            });
        }
        Ok(())
    }

    /// Increase indentation for subsequent lines.
    pub fn indent(&mut self) { self.depth += 1; }

    /// Decrease indentation for subsequent lines.
    pub fn outdent(&mut self) { self.depth = self.depth.saturating_sub(1); }

    /// Finished artifact text.
    pub fn into_contents(self) -> String { self.buf }

    fn substitute(&self, template: &str, extra: &[(&str, &str)]) -> Result<String> {
        let mut missing: Option<String> = None;
        let text = variable_pattern().replace_all(template, |caps: &Captures<'_>| {
            let Some(name) = caps.get(1).map(|m| m.as_str()) else {
                return "$".to_string();
            };
            let value = extra
                .iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| *value)
                .or_else(|| self.vars.get(name));
            match value {
                Some(value) => value.to_string(),
                None => {
                    missing.get_or_insert_with(|| name.to_string());
                    String::new()
                }
            }
        });
        match missing {
            Some(name) => Err(CodegenError::UndefinedVariable(name)),
            None => Ok(text.into_owned()),
        }
    }

    fn flush_indent(&mut self, next: &str) {
        if self.at_line_start && !next.is_empty() && !next.starts_with('\n') {
            for _ in 0..self.depth {
                self.buf.push_str(INDENT);
            }
            self.at_line_start = false;
        }
    }

    fn write_raw(&mut self, text: &str) {
        for line in text.split_inclusive('\n') {
            if line != "\n" {
                self.flush_indent(line);
            }
            self.buf.push_str(line);
            if line.ends_with('\n') {
                self.at_line_start = true;
            }
        }
    }
}
