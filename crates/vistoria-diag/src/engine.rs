//! Diagnostic engine: one state-machine pass over the newest report.
//!
//! LOAD → CLASSIFY → EXTRACT → RESCAN → ANALYZE_FILE → SYNTHESIZE → EMIT,
//! with the PREVENTIVE_SCAN branch when the loaded report shows no
//! failure. Diagnostic documents are only written for a failing report.

use crate::analyze;
use crate::classify::ErrorKind;
use crate::document::DiagnosticDocument;
use crate::extract;
use crate::plan;
use crate::record::ErrorRecord;
use crate::rescan::ProjectRescan;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tracing::info;
use vistoria_core::report::HISTORY_DIR;
use vistoria_core::{Result, VistoriaError};

/// Terminal state of one diagnostic invocation.
#[derive(Debug)]
pub enum Diagnosis {
    /// No report found; nothing to diagnose.
    NothingToDiagnose,

    /// The report was clean; only the preventive scan ran.
    PreventiveScan { records: Vec<ErrorRecord> },

    /// A diagnostic document was written.
    DocumentWritten { path: PathBuf },
}

/// Drives the diagnostic stage for one project.
pub struct DiagnosticEngine {
    project_root: PathBuf,
    history_dir: PathBuf,
}

impl DiagnosticEngine {
    /// Diagnose the project rooted at `project_root`, reading reports
    /// from its default history directory.
    pub fn new(project_root: impl Into<PathBuf>) -> Self {
        let project_root = project_root.into();
        let history_dir = project_root.join(HISTORY_DIR);
        Self {
            project_root,
            history_dir,
        }
    }

    /// Run the state machine to its terminal state.
    pub async fn run(&self) -> Result<Diagnosis> {
        // LOAD
        let Some(report_path) = newest_report(&self.history_dir) else {
            info!("nenhum relatório no histórico");
            return Ok(Diagnosis::NothingToDiagnose);
        };
        let report_text = fs::read_to_string(&report_path)?;
        let report_name = report_path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("relatório")
            .to_string();
        info!(report = %report_name, "relatório carregado");

        // CLASSIFY
        if !extract::has_error(&report_text) {
            // PREVENTIVE_SCAN: console-only, no document.
            info!("relatório sem erros; executando varredura preventiva");
            let records = ProjectRescan::new(&self.project_root).run().await;
            return Ok(Diagnosis::PreventiveScan { records });
        }

        // EXTRACT
        let failed = extract::failed_descriptions(&report_text);
        let location = extract::locate_source(&report_text);
        let classification_input =
            extract::detailed_errors_section(&report_text).unwrap_or(&report_text);
        let kind = ErrorKind::classify(classification_input);
        info!(kind = kind.artifact_name(), failures = failed.len(), "relatório classificado");

        // RESCAN
        let records = ProjectRescan::new(&self.project_root).run().await;

        // ANALYZE_FILE
        let analysis = location
            .as_ref()
            .and_then(|loc| analyze::analyze_file(&self.project_root, loc));

        // SYNTHESIZE
        let commands = plan::remediation_commands(&failed, kind);
        let mut kinds_present = vec![kind];
        for record in &records {
            if !kinds_present.contains(&record.kind) {
                kinds_present.push(record.kind);
            }
        }
        let stages = plan::action_plan(&kinds_present);

        // EMIT
        let document = DiagnosticDocument {
            report_name: &report_name,
            kind,
            failed: &failed,
            location: location.as_ref(),
            analysis: analysis.as_ref(),
            records: &records,
            commands: &commands,
            stages: &stages,
            report_text: &report_text,
        };
        let path = report_path.with_extension("md");
        fs::write(&path, document.render())
            .map_err(|e| VistoriaError::Document(format!("{}: {}", path.display(), e)))?;

        info!(path = %path.display(), "documento de diagnóstico gravado");
        Ok(Diagnosis::DocumentWritten { path })
    }
}

/// The most recently modified `.log` report, when any exists.
fn newest_report(history_dir: &Path) -> Option<PathBuf> {
    let entries = fs::read_dir(history_dir).ok()?;

    entries
        .flatten()
        .filter_map(|entry| {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("log") {
                return None;
            }
            let modified = entry.metadata().and_then(|m| m.modified()).ok()?;
            Some((modified, path))
        })
        .max_by_key(|(modified, _)| *modified)
        .map(|(_, path): (SystemTime, PathBuf)| path)
}
