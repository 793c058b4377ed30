//! Recurrence detection against prior reports.
//!
//! A coarse substring heuristic over raw report text, not structural
//! diffing. Any single recurring failure category is sufficient to flag
//! the run.

use crate::report::{FAILURE_MARKER, STATUS_ERROR_MARKER};
use crate::result::CheckResult;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tracing::debug;

/// Number of most-recent prior reports inspected.
const HISTORY_WINDOW: usize = 3;

/// Flags runs whose failures already appeared in recent reports.
pub struct RecurrenceDetector;

impl RecurrenceDetector {
    /// Whether any current real failure also shows up in one of the
    /// [`HISTORY_WINDOW`] most-recently-modified prior reports.
    ///
    /// A missing history directory or any read error answers `false`;
    /// recurrence detection never blocks the pipeline.
    pub fn is_recurrent(results: &[CheckResult], history_dir: &Path) -> bool {
        let failures: Vec<&CheckResult> = results.iter().filter(|r| r.real_failure()).collect();
        if failures.is_empty() {
            return false;
        }

        for path in recent_reports(history_dir) {
            let Ok(text) = fs::read_to_string(&path) else {
                continue;
            };
            if !text.contains(STATUS_ERROR_MARKER) {
                continue;
            }
            let recurring = failures
                .iter()
                .any(|f| text.contains(&f.description) && text.contains(FAILURE_MARKER));
            if recurring {
                debug!(report = %path.display(), "falha recorrente encontrada");
                return true;
            }
        }
        false
    }
}

/// The most recently modified `.log` files in the history directory,
/// newest first, at most [`HISTORY_WINDOW`] of them.
fn recent_reports(history_dir: &Path) -> Vec<PathBuf> {
    let Ok(entries) = fs::read_dir(history_dir) else {
        return Vec::new();
    };

    let mut reports: Vec<(SystemTime, PathBuf)> = entries
        .flatten()
        .filter_map(|entry| {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("log") {
                return None;
            }
            let modified = entry.metadata().and_then(|m| m.modified()).ok()?;
            Some((modified, path))
        })
        .collect();

    reports.sort_by(|a, b| b.0.cmp(&a.0));
    reports.truncate(HISTORY_WINDOW);
    reports.into_iter().map(|(_, path)| path).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn failing(desc: &str) -> CheckResult {
        CheckResult::completed(
            desc.to_string(),
            "false".to_string(),
            1,
            String::new(),
            "error\n".to_string(),
        )
    }

    fn prior_report(desc: &str) -> String {
        format!(
            "{}\n🚨 ERROS DETALHADOS\n❌ {}: {}\n",
            STATUS_ERROR_MARKER, desc, FAILURE_MARKER
        )
    }

    #[test]
    fn test_missing_history_dir_is_not_recurrent() {
        let results = vec![failing("Build de produção")];
        assert!(!RecurrenceDetector::is_recurrent(
            &results,
            Path::new("/diretorio/que/nao/existe")
        ));
    }

    #[test]
    fn test_no_failures_is_not_recurrent() {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::write(
            dir.path().join("log-2024-01-01-10-00.log"),
            prior_report("Build de produção"),
        )
        .expect("write");

        let passing = CheckResult::completed(
            "Build de produção".to_string(),
            "npm run build".to_string(),
            0,
            String::new(),
            String::new(),
        );
        assert!(!RecurrenceDetector::is_recurrent(&[passing], dir.path()));
    }

    #[test]
    fn test_matching_prior_report_is_recurrent() {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::write(
            dir.path().join("log-2024-01-01-10-00.log"),
            prior_report("Build de produção"),
        )
        .expect("write");

        let results = vec![failing("Build de produção")];
        assert!(RecurrenceDetector::is_recurrent(&results, dir.path()));
    }

    #[test]
    fn test_prior_success_report_is_not_recurrent() {
        let dir = tempfile::tempdir().expect("tempdir");
        // Description present but no error status marker.
        fs::write(
            dir.path().join("log-2024-01-01-10-00.log"),
            "✅ Status: SUCESSO\nBuild de produção\n",
        )
        .expect("write");

        let results = vec![failing("Build de produção")];
        assert!(!RecurrenceDetector::is_recurrent(&results, dir.path()));
    }

    #[test]
    fn test_only_three_newest_reports_are_inspected() {
        let dir = tempfile::tempdir().expect("tempdir");
        // Oldest report holds the match; three newer ones do not.
        let old = dir.path().join("log-2024-01-01-10-00.log");
        fs::write(&old, prior_report("Build de produção")).expect("write");
        let past = SystemTime::now() - std::time::Duration::from_secs(3600);
        filetime_set(&old, past);

        for minute in 1..=3 {
            fs::write(
                dir.path().join(format!("log-2024-01-02-10-0{}.log", minute)),
                "✅ Status: SUCESSO\n",
            )
            .expect("write");
        }

        let results = vec![failing("Build de produção")];
        assert!(!RecurrenceDetector::is_recurrent(&results, dir.path()));
    }

    #[test]
    fn test_non_log_files_are_ignored() {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::write(
            dir.path().join("log-2024-01-01-10-00.md"),
            prior_report("Build de produção"),
        )
        .expect("write");

        let results = vec![failing("Build de produção")];
        assert!(!RecurrenceDetector::is_recurrent(&results, dir.path()));
    }

    fn filetime_set(path: &Path, time: SystemTime) {
        let file = fs::File::options().write(true).open(path).expect("open");
        file.set_modified(time).expect("set_modified");
    }
}
