//! Normalized problem records produced during diagnosis.

use crate::classify::ErrorKind;
use serde::{Deserialize, Serialize};

/// Severity of a recorded problem.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Warning,
    Error,
}

/// One classified problem, found either in the report or by the
/// independent re-scan. Transient: only ever embedded in the diagnostic
/// document, never persisted standalone.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ErrorRecord {
    /// Problem classification.
    pub kind: ErrorKind,

    /// Source file path, empty when unknown.
    pub file: String,

    /// Line number, when known.
    pub line: Option<u32>,

    /// Human-readable message.
    pub message: String,

    /// Severity level.
    pub severity: Severity,
}

impl ErrorRecord {
    /// Create a record with no location.
    pub fn new(kind: ErrorKind, message: String, severity: Severity) -> Self {
        Self {
            kind,
            file: String::new(),
            line: None,
            message,
            severity,
        }
    }

    /// Attach a source location.
    pub fn with_location(mut self, file: String, line: Option<u32>) -> Self {
        self.file = file;
        self.line = line;
        self
    }

    /// `arquivo:linha` label, or just the file, or empty.
    pub fn location_label(&self) -> String {
        match (self.file.is_empty(), self.line) {
            (true, _) => String::new(),
            (false, Some(line)) => format!("{}:{}", self.file, line),
            (false, None) => self.file.clone(),
        }
    }
}
