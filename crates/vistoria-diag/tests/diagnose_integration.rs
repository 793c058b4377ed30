//! Integration tests for the diagnostic stage against real report
//! artifacts on disk.

use std::fs;
use vistoria_core::report::{self, EnvSnapshot, RunContext};
use vistoria_core::{BatteryOutcome, CheckResult};
use vistoria_diag::{extract, plan, Diagnosis, DiagnosticEngine, ErrorKind};

fn env() -> EnvSnapshot {
    EnvSnapshot::capture(false, "0123456789ab".to_string())
}

fn write_report(history: &std::path::Path, outcome: &BatteryOutcome) -> std::path::PathBuf {
    report::write_report(outcome, false, &env(), &RunContext::begin(), history)
        .expect("write_report")
}

fn failing_typecheck() -> CheckResult {
    CheckResult::completed(
        "Verificação de tipos TypeScript".to_string(),
        "npx tsc --noEmit".to_string(),
        1,
        String::new(),
        "src/app/page.tsx(10,5): error TS2304: Cannot find name 'Foo'.\n".to_string(),
    )
}

fn passing(desc: &str) -> CheckResult {
    CheckResult::completed(
        desc.to_string(),
        "echo ok".to_string(),
        0,
        String::new(),
        String::new(),
    )
}

/// No history directory at all: the engine terminates with nothing to
/// diagnose instead of erroring.
#[tokio::test]
async fn test_nothing_to_diagnose_without_history() {
    let dir = tempfile::tempdir().expect("tempdir");
    let engine = DiagnosticEngine::new(dir.path());

    match engine.run().await.expect("run") {
        Diagnosis::NothingToDiagnose => {}
        other => panic!("esperava NothingToDiagnose, veio {:?}", other),
    }
}

/// A clean report triggers the preventive scan only: no document written.
#[tokio::test]
async fn test_clean_report_triggers_preventive_scan() {
    let dir = tempfile::tempdir().expect("tempdir");
    let history = dir.path().join("logs");
    let outcome = BatteryOutcome::new(vec![passing("Lint sem avisos")]);
    let report_path = write_report(&history, &outcome);

    let engine = DiagnosticEngine::new(dir.path());
    match engine.run().await.expect("run") {
        Diagnosis::PreventiveScan { .. } => {}
        other => panic!("esperava PreventiveScan, veio {:?}", other),
    }

    assert!(
        !report_path.with_extension("md").exists(),
        "varredura preventiva não grava documento"
    );
}

/// A failing type-check report drives the full pipeline: extraction,
/// classification, remediation and the persisted document.
#[tokio::test]
async fn test_failing_report_produces_document() {
    let dir = tempfile::tempdir().expect("tempdir");
    let history = dir.path().join("logs");
    let outcome = BatteryOutcome::new(vec![failing_typecheck(), passing("Lint sem avisos")]);
    let report_path = write_report(&history, &outcome);

    let engine = DiagnosticEngine::new(dir.path());
    let path = match engine.run().await.expect("run") {
        Diagnosis::DocumentWritten { path } => path,
        other => panic!("esperava DocumentWritten, veio {:?}", other),
    };

    assert_eq!(path, report_path.with_extension("md"));
    let md = fs::read_to_string(&path).expect("read");

    assert!(md.contains("Tipo: TYPESCRIPT_ERROR"));
    assert!(md.contains("- Verificação de tipos TypeScript"));
    assert!(md.contains("src/app/page.tsx:10"));
    assert!(md.contains("Reverificação"));
    // Traceability: the source report is embedded verbatim.
    assert!(md.contains("❌ Status: ERRO"));

    let tsc_count = md.matches("`npx tsc --noEmit`").count();
    assert_eq!(tsc_count, 1, "comando de tipos aparece uma única vez");
}

/// Round trip: a rendered report reads back as failing exactly when the
/// originating result set was not an overall success.
#[test]
fn test_report_round_trip_has_error() {
    let ctx = RunContext::begin();

    let good = BatteryOutcome::new(vec![passing("a"), passing("b")]);
    let good_text = report::render_report(&good, false, &env(), &ctx);
    assert!(good.overall_success());
    assert!(!extract::has_error(&good_text));

    let bad = BatteryOutcome::new(vec![passing("a"), failing_typecheck()]);
    let bad_text = report::render_report(&bad, false, &env(), &ctx);
    assert!(!bad.overall_success());
    assert!(extract::has_error(&bad_text));
}

/// Extraction against the full persisted artifact, not a synthetic text.
#[test]
fn test_extraction_from_rendered_artifact() {
    let outcome = BatteryOutcome::new(vec![failing_typecheck()]);
    let text = report::render_report(&outcome, false, &env(), &RunContext::begin());

    let failed = extract::failed_descriptions(&text);
    assert_eq!(failed, vec!["Verificação de tipos TypeScript"]);

    let location = extract::locate_source(&text).expect("localização");
    assert_eq!(location.file, "src/app/page.tsx");
    assert_eq!(location.line, Some(10));

    let section = extract::detailed_errors_section(&text).expect("seção");
    assert_eq!(ErrorKind::classify(section), ErrorKind::Typescript);

    let commands = plan::remediation_commands(&failed, ErrorKind::Typescript);
    assert_eq!(
        commands.iter().filter(|c| *c == "npx tsc --noEmit").count(),
        1
    );
    assert_eq!(
        commands.last().map(String::as_str),
        Some("vistoria diagnosticar")
    );
}

/// The newest of several reports is the one diagnosed.
#[tokio::test]
async fn test_newest_report_is_diagnosed() {
    let dir = tempfile::tempdir().expect("tempdir");
    let history = dir.path().join("logs");
    fs::create_dir_all(&history).expect("mkdir");

    let old = history.join("log-2024-01-01-10-00.log");
    fs::write(&old, "❌ Status: ERRO\n🚨 ERROS DETALHADOS\n❌ Build de produção: FALHOU\n")
        .expect("write");
    let past = std::time::SystemTime::now() - std::time::Duration::from_secs(3600);
    let file = fs::File::options().write(true).open(&old).expect("open");
    file.set_modified(past).expect("set_modified");

    let outcome = BatteryOutcome::new(vec![failing_typecheck()]);
    let newest = write_report(&history, &outcome);

    let engine = DiagnosticEngine::new(dir.path());
    let path = match engine.run().await.expect("run") {
        Diagnosis::DocumentWritten { path } => path,
        other => panic!("esperava DocumentWritten, veio {:?}", other),
    };
    assert_eq!(path, newest.with_extension("md"));

    let md = fs::read_to_string(path).expect("read");
    assert!(md.contains("TYPESCRIPT_ERROR"), "diagnostica o mais novo");
}
