//! Domain error taxonomy.
//!
//! Per-check failures are data, never errors: a non-zero exit or a
//! missing executable is recorded in the [`crate::result::CheckResult`]
//! and the battery continues. `VistoriaError` covers only pipeline
//! failures outside the per-check boundary.

/// Pipeline-level errors.
#[derive(Debug, thiserror::Error)]
pub enum VistoriaError {
    #[error("manifesto do projeto ilegível: {0}")]
    Manifest(String),

    #[error("falha ao gravar o relatório: {0}")]
    Report(String),

    #[error("falha no diretório de histórico: {0}")]
    History(String),

    #[error("falha ao gravar o documento de diagnóstico: {0}")]
    Document(String),

    #[error("erro de E/S: {0}")]
    Io(#[from] std::io::Error),

    #[error("erro de serialização: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for pipeline operations.
pub type Result<T> = std::result::Result<T, VistoriaError>;
