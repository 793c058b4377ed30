//! Vistoria Diag - etapa de diagnóstico
//!
//! Consumes the most recent verification report:
//! - Classifies the failure into a closed error-kind taxonomy
//! - Re-scans the project independently for corroborating evidence
//! - Analyses the located source window with ordered heuristics
//! - Synthesizes a remediation plan and persists the diagnostic document

pub mod analyze;
pub mod classify;
pub mod document;
pub mod engine;
pub mod extract;
pub mod plan;
pub mod record;
pub mod rescan;

// Re-export key types
pub use analyze::FileAnalysis;
pub use classify::ErrorKind;
pub use document::DiagnosticDocument;
pub use engine::{Diagnosis, DiagnosticEngine};
pub use extract::SourceLocation;
pub use plan::ActionStage;
pub use record::{ErrorRecord, Severity};
pub use rescan::ProjectRescan;
