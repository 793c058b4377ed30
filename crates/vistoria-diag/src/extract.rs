//! Parsing of the verification report artifact.
//!
//! The report is located by its fixed section headers (see
//! `vistoria_core::report`); everything here is substring and regex work
//! over raw text, by design.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;
use vistoria_core::report::{DETAILED_ERRORS_HEADER, FILTERED_HEADER, STATUS_ERROR_MARKER};

/// Raw strings that mark a report as containing an error even when the
/// status markers are absent (e.g. a hand-edited or truncated report).
const RAW_ERROR_STRINGS: [&str; 5] = [
    "error TS",
    "ReferenceError",
    "SyntaxError",
    "TypeError",
    "Cannot find module",
];

/// Best-effort source location pulled out of report text. Never
/// guaranteed: callers must treat the absent case as first-class.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SourceLocation {
    /// File path as it appears in the report.
    pub file: String,

    /// Line number, when the matching pattern captures one.
    pub line: Option<u32>,
}

/// Whether the report text shows any failure.
pub fn has_error(text: &str) -> bool {
    if text.contains(STATUS_ERROR_MARKER) {
        return true;
    }
    if nonzero_failure_count(text) {
        return true;
    }
    RAW_ERROR_STRINGS.iter().any(|s| text.contains(s))
}

fn nonzero_failure_count(text: &str) -> bool {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"❌ Falhas: [1-9]").ok())
        .as_ref()
        .is_some_and(|re| re.is_match(text))
}

/// The detailed-errors section of a report, when present: from its header
/// up to the filtered-noise section (or the end of the text).
pub fn detailed_errors_section(text: &str) -> Option<&str> {
    let start = text.find(DETAILED_ERRORS_HEADER)?;
    let tail = &text[start..];
    match tail.find(FILTERED_HEADER) {
        Some(end) => Some(&tail[..end]),
        None => Some(tail),
    }
}

/// Descriptions of the failed checks listed in the detailed-errors
/// section, in report order.
pub fn failed_descriptions(text: &str) -> Vec<String> {
    let Some(section) = detailed_errors_section(text) else {
        return Vec::new();
    };
    section
        .lines()
        .filter_map(|line| {
            let line = line.trim();
            line.strip_prefix("❌ ")
                .and_then(|rest| rest.strip_suffix(": FALHOU"))
                .map(|desc| desc.to_string())
        })
        .collect()
}

/// Ordered file/line patterns: tsc locations, tool locations, stack-trace
/// frames, then a generic `file: message` fallback (no line).
fn location_patterns() -> &'static [(Regex, bool)] {
    static PATTERNS: OnceLock<Vec<(Regex, bool)>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        [
            (r"([\w$./\\-]+\.tsx?)\((\d+),\d+\)", true),
            (r"([\w$./\\-]+\.[jt]sx?):(\d+):\d+", true),
            (r"at [^\n(]*\(([^():\s]+):(\d+):\d+\)", true),
            (r"((?:src|pages|app)/[\w$./\\-]+\.[a-z]+):", false),
        ]
        .into_iter()
        .filter_map(|(pattern, has_line)| Regex::new(pattern).ok().map(|re| (re, has_line)))
        .collect()
    })
}

/// Search the full text with the ordered pattern list, taking the first
/// pattern that matches anywhere and using its first match only.
pub fn locate_source(text: &str) -> Option<SourceLocation> {
    for (pattern, has_line) in location_patterns() {
        if let Some(captures) = pattern.captures(text) {
            let file = captures.get(1)?.as_str().to_string();
            let line = if *has_line {
                captures.get(2).and_then(|m| m.as_str().parse().ok())
            } else {
                None
            };
            return Some(SourceLocation { file, line });
        }
    }
    None
}
