//! Check execution outcomes and battery aggregates.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Exit code recorded when the process could not start.
pub const EXIT_CODE_NOT_STARTED: i32 = -1;

/// Result of a single check execution.
///
/// Created once by the executor and never mutated in place; the noise
/// filter produces derived copies.
///
/// Invariants: `skipped` implies `!success`; `filtered` implies `!skipped`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CheckResult {
    /// Human-readable check description (unique per battery).
    pub description: String,

    /// Literal invocation string, for display only.
    pub command: String,

    /// Exit code ([`EXIT_CODE_NOT_STARTED`] when the process never ran).
    pub exit_code: i32,

    /// Whether the check passed.
    pub success: bool,

    /// Captured stdout.
    pub stdout: String,

    /// Captured stderr.
    pub stderr: String,

    /// Concatenation of stdout and stderr.
    pub output: String,

    /// Instant the result was recorded.
    pub timestamp: DateTime<Utc>,

    /// The executable could not be started at all.
    pub skipped: bool,

    /// Set only by the noise filter.
    pub filtered: bool,
}

impl CheckResult {
    /// Record a check that ran to completion.
    pub fn completed(
        description: String,
        command: String,
        exit_code: i32,
        stdout: String,
        stderr: String,
    ) -> Self {
        let output = format!("{}{}", stdout, stderr);
        Self {
            description,
            command,
            exit_code,
            success: exit_code == 0,
            stdout,
            stderr,
            output,
            timestamp: Utc::now(),
            skipped: false,
            filtered: false,
        }
    }

    /// Record a check whose executable could not be started.
    pub fn unavailable(description: String, command: String, reason: String) -> Self {
        Self {
            description,
            command,
            exit_code: EXIT_CODE_NOT_STARTED,
            success: false,
            stdout: String::new(),
            stderr: reason.clone(),
            output: reason,
            timestamp: Utc::now(),
            skipped: true,
            filtered: false,
        }
    }

    /// Whether this check passed.
    pub fn passed(&self) -> bool {
        self.success
    }

    /// A failure that actually ran (not skipped).
    pub fn real_failure(&self) -> bool {
        !self.success && !self.skipped
    }
}

/// Ordered results of one battery run, with aggregate views.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BatteryOutcome {
    /// Results in battery order.
    pub results: Vec<CheckResult>,
}

impl BatteryOutcome {
    /// Wrap an ordered result list.
    pub fn new(results: Vec<CheckResult>) -> Self {
        Self { results }
    }

    /// Overall success: every check passed or was skipped.
    pub fn overall_success(&self) -> bool {
        self.results.iter().all(|r| r.success || r.skipped)
    }

    /// Number of checks that passed.
    pub fn success_count(&self) -> usize {
        self.results.iter().filter(|r| r.success).count()
    }

    /// Number of real failures (ran and failed).
    pub fn failure_count(&self) -> usize {
        self.results.iter().filter(|r| r.real_failure()).count()
    }

    /// Number of checks whose executable was unavailable.
    pub fn skipped_count(&self) -> usize {
        self.results.iter().filter(|r| r.skipped).count()
    }

    /// Number of results touched by the noise filter.
    pub fn filtered_count(&self) -> usize {
        self.results.iter().filter(|r| r.filtered).count()
    }
}
