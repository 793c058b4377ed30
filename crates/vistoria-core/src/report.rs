//! Rendering and persistence of the verification report artifact.
//!
//! The section headers and status markers below are a stable contract:
//! the diagnostic stage locates sections by these literal strings, and
//! the recurrence detector matches prior reports against them.

use crate::error::{Result, VistoriaError};
use crate::result::{BatteryOutcome, CheckResult};
use chrono::{DateTime, Local};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::info;

/// Report title line.
pub const REPORT_TITLE: &str = "🔍 RELATÓRIO DE VERIFICAÇÃO DO PROJETO";

/// Status marker for a fully successful run.
pub const STATUS_OK_MARKER: &str = "✅ Status: SUCESSO";

/// Status marker for a run with at least one failure.
pub const STATUS_ERROR_MARKER: &str = "❌ Status: ERRO";

/// Header of the detailed-errors section.
pub const DETAILED_ERRORS_HEADER: &str = "🚨 ERROS DETALHADOS";

/// Label preceding each failure's raw output.
pub const ERROR_DETAILS_LABEL: &str = "Detalhes do erro:";

/// Header of the filtered-noise section.
pub const FILTERED_HEADER: &str = "🔇 ERROS FILTRADOS (ruído conhecido)";

/// Per-failure marker inside the detailed-errors section.
pub const FAILURE_MARKER: &str = "FALHOU";

/// History directory, relative to the project root.
pub const HISTORY_DIR: &str = "logs";

const RULE_HEAVY: &str = "============================================================";
const RULE_LIGHT: &str = "------------------------------------------------------------";

/// Explicit run context threaded into report generation: the elapsed-time
/// source for the footer and the timestamp source for the artifact name.
pub struct RunContext {
    started: Instant,
    started_at: DateTime<Local>,
}

impl RunContext {
    /// Capture the start of a verification run.
    pub fn begin() -> Self {
        Self {
            started: Instant::now(),
            started_at: Local::now(),
        }
    }

    /// Artifact file name for this run, minute granularity. Two runs in
    /// the same minute collide and the last write wins.
    pub fn report_file_name(&self) -> String {
        self.started_at.format("log-%Y-%m-%d-%H-%M.log").to_string()
    }

    /// Elapsed seconds since the run started.
    pub fn elapsed_secs(&self) -> f64 {
        self.started.elapsed().as_secs_f64()
    }
}

/// Environment block data recorded at the top of every report.
pub struct EnvSnapshot {
    /// Verifier version string.
    pub verifier_version: String,

    /// Host platform, `os arch`.
    pub platform: String,

    /// Whether the Prisma toolchain is declared in the manifest.
    pub prisma_available: bool,

    /// Digest of the ordered battery.
    pub battery_digest: String,
}

impl EnvSnapshot {
    /// Capture the environment for this run.
    pub fn capture(prisma_available: bool, battery_digest: String) -> Self {
        Self {
            verifier_version: env!("CARGO_PKG_VERSION").to_string(),
            platform: format!("{} {}", std::env::consts::OS, std::env::consts::ARCH),
            prisma_available,
            battery_digest,
        }
    }
}

/// Render the full report string with the fixed section layout.
pub fn render_report(
    outcome: &BatteryOutcome,
    recurrent: bool,
    env: &EnvSnapshot,
    ctx: &RunContext,
) -> String {
    let mut out = String::new();

    out.push_str(RULE_HEAVY);
    out.push('\n');
    out.push_str(REPORT_TITLE);
    out.push('\n');
    out.push_str(RULE_HEAVY);
    out.push_str("\n\n");

    out.push_str("🖥️ Ambiente:\n");
    out.push_str(&format!("   Verificador: v{}\n", env.verifier_version));
    out.push_str(&format!("   Plataforma: {}\n", env.platform));
    out.push_str(&format!(
        "   Prisma: {}\n",
        if env.prisma_available {
            "instalado"
        } else {
            "não instalado"
        }
    ));
    out.push_str(&format!("   Bateria: {}\n\n", env.battery_digest));

    out.push_str(if outcome.overall_success() {
        STATUS_OK_MARKER
    } else {
        STATUS_ERROR_MARKER
    });
    out.push('\n');
    out.push_str(&format!(
        "🔁 Recorrente: {}\n\n",
        if recurrent { "sim" } else { "não" }
    ));

    out.push_str("📊 Resumo:\n");
    out.push_str(&format!("   ✅ Sucesso: {}\n", outcome.success_count()));
    out.push_str(&format!("   ❌ Falhas: {}\n", outcome.failure_count()));
    out.push_str(&format!("   ⏭️ Ignorados: {}\n", outcome.skipped_count()));
    out.push_str(&format!("   🔇 Filtrados: {}\n\n", outcome.filtered_count()));

    out.push_str(RULE_LIGHT);
    out.push('\n');
    out.push_str("📋 Verificações:\n\n");
    for result in &outcome.results {
        render_check(&mut out, result);
    }

    let real_failures: Vec<&CheckResult> = outcome
        .results
        .iter()
        .filter(|r| r.real_failure() && !r.filtered)
        .collect();
    if !real_failures.is_empty() {
        out.push_str(DETAILED_ERRORS_HEADER);
        out.push('\n');
        out.push_str(RULE_HEAVY);
        out.push_str("\n\n");
        for failure in real_failures {
            out.push_str(&format!("❌ {}: {}\n", failure.description, FAILURE_MARKER));
            out.push_str(ERROR_DETAILS_LABEL);
            out.push('\n');
            if !failure.stderr.is_empty() {
                out.push_str(&failure.stderr);
                if !failure.stderr.ends_with('\n') {
                    out.push('\n');
                }
            }
            if !failure.stdout.is_empty() {
                out.push_str(&failure.stdout);
                if !failure.stdout.ends_with('\n') {
                    out.push('\n');
                }
            }
            out.push('\n');
        }
    }

    let filtered: Vec<&CheckResult> = outcome.results.iter().filter(|r| r.filtered).collect();
    if !filtered.is_empty() {
        out.push_str(FILTERED_HEADER);
        out.push('\n');
        for result in filtered {
            // Only the check name and the noise category; the raw text is
            // confirmed-irrelevant and stays out of the artifact.
            out.push_str(&format!(
                "   {}: arquivos do próprio verificador\n",
                result.description
            ));
        }
        out.push('\n');
    }

    out.push_str(RULE_LIGHT);
    out.push('\n');
    out.push_str(&format!("⏱️ Tempo total: {:.1}s\n", ctx.elapsed_secs()));

    out
}

fn render_check(out: &mut String, result: &CheckResult) {
    let icon = if result.skipped {
        "⏭️"
    } else if result.success {
        "✅"
    } else {
        "❌"
    };
    out.push_str(&format!("{} {}\n", icon, result.description));
    out.push_str(&format!("   Comando: {}\n", result.command));
    out.push_str(&format!("   Código de saída: {}\n", result.exit_code));
    let local: DateTime<Local> = result.timestamp.into();
    out.push_str(&format!(
        "   Horário: {}\n",
        local.format("%d/%m/%Y %H:%M:%S")
    ));
    if !result.filtered {
        out.push_str("   Saída:\n");
        if result.output.is_empty() {
            out.push_str("   (vazia)\n");
        } else {
            out.push_str(&result.output);
            if !result.output.ends_with('\n') {
                out.push('\n');
            }
        }
    }
    out.push('\n');
}

/// Render the report and persist it under `history_dir`, creating the
/// directory if absent. One synchronous all-or-nothing write.
pub fn write_report(
    outcome: &BatteryOutcome,
    recurrent: bool,
    env: &EnvSnapshot,
    ctx: &RunContext,
    history_dir: &Path,
) -> Result<PathBuf> {
    std::fs::create_dir_all(history_dir)
        .map_err(|e| VistoriaError::History(format!("{}: {}", history_dir.display(), e)))?;

    let rendered = render_report(outcome, recurrent, env, ctx);
    let path = history_dir.join(ctx.report_file_name());
    std::fs::write(&path, rendered)
        .map_err(|e| VistoriaError::Report(format!("{}: {}", path.display(), e)))?;

    info!(path = %path.display(), "relatório gravado");
    Ok(path)
}

/// Persist a minimal single-entry report describing a pipeline failure.
/// Used as the last action before the process exits non-zero.
pub fn write_pipeline_failure_report(
    error: &str,
    env: &EnvSnapshot,
    ctx: &RunContext,
    history_dir: &Path,
) -> Result<PathBuf> {
    let failure = CheckResult::completed(
        "Falha interna do pipeline".to_string(),
        "vistoria verificar".to_string(),
        1,
        String::new(),
        error.to_string(),
    );
    let outcome = BatteryOutcome::new(vec![failure]);
    write_report(&outcome, false, env, ctx, history_dir)
}
