//! Reclassification of known-noise failures.
//!
//! The battery may end up running the legacy verifier's own script files
//! (via lint or build), and their incidental failures are not project
//! defects. The filter strips those lines and re-evaluates whether any
//! real error remains.

use crate::result::CheckResult;
use tracing::info;

/// File names whose appearance in failure output is treated as
/// self-referential noise.
pub const NOISE_ALLOWLIST: [&str; 4] = [
    "verificar-projeto.js",
    "diagnosticar-erro.js",
    "build-logger.js",
    "configurar-projeto.js",
];

/// Substrings (matched case-insensitively) that mark remaining output as
/// a genuine error.
pub const ERROR_INDICATORS: [&str; 5] = ["error", "warning", "fail", "exception", "fatal"];

/// Derives a filtered copy of a battery's results.
pub struct NoiseFilter;

impl NoiseFilter {
    /// Filter every failed, non-skipped result against the allowlist.
    ///
    /// Results that are already successful or skipped pass through
    /// unchanged. A failed result with allowlisted lines gets those lines
    /// stripped from all text fields; if no error indicator remains it is
    /// promoted to success with cleared output, otherwise the stripped
    /// text replaces the original and the failure stands.
    pub fn apply(results: &[CheckResult]) -> Vec<CheckResult> {
        results.iter().map(Self::filter_one).collect()
    }

    fn filter_one(result: &CheckResult) -> CheckResult {
        if result.success || result.skipped {
            return result.clone();
        }
        if !contains_noise(&result.output)
            && !contains_noise(&result.stdout)
            && !contains_noise(&result.stderr)
        {
            return result.clone();
        }

        let stdout = strip_noise_lines(&result.stdout);
        let stderr = strip_noise_lines(&result.stderr);
        let output = strip_noise_lines(&result.output);

        let mut filtered = result.clone();
        filtered.filtered = true;

        let still_failing = has_error_indicator(&stdout)
            || has_error_indicator(&stderr)
            || has_error_indicator(&output);

        if still_failing {
            filtered.stdout = stdout;
            filtered.stderr = stderr;
            filtered.output = output;
        } else {
            info!(check = %result.description, "falha reclassificada como ruído");
            filtered.success = true;
            filtered.exit_code = 0;
            filtered.stdout = String::new();
            filtered.stderr = String::new();
            filtered.output = String::new();
        }
        filtered
    }
}

fn contains_noise(text: &str) -> bool {
    NOISE_ALLOWLIST.iter().any(|name| text.contains(name))
}

fn strip_noise_lines(text: &str) -> String {
    text.lines()
        .filter(|line| !NOISE_ALLOWLIST.iter().any(|name| line.contains(name)))
        .collect::<Vec<_>>()
        .join("\n")
}

fn has_error_indicator(text: &str) -> bool {
    let lower = text.to_lowercase();
    ERROR_INDICATORS
        .iter()
        .any(|indicator| lower.contains(indicator))
}
