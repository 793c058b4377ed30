//! Closed error-kind taxonomy with an explicit priority order.

use serde::{Deserialize, Serialize};

/// Error classification for a diagnosed report.
///
/// Classification priority (first match wins):
/// types > lint > Prisma > build > module resolution > syntax > unknown.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Typescript,
    Lint,
    Prisma,
    Build,
    ModuleResolution,
    Syntax,
    Unknown,
}

/// Priority order used by [`ErrorKind::classify`]; `Unknown` is the
/// fallback and never listed.
const CLASSIFICATION_PRIORITY: [ErrorKind; 6] = [
    ErrorKind::Typescript,
    ErrorKind::Lint,
    ErrorKind::Prisma,
    ErrorKind::Build,
    ErrorKind::ModuleResolution,
    ErrorKind::Syntax,
];

impl ErrorKind {
    /// Stable name used in the diagnostic document.
    pub fn artifact_name(&self) -> &'static str {
        match self {
            ErrorKind::Typescript => "TYPESCRIPT_ERROR",
            ErrorKind::Lint => "LINT_ERROR",
            ErrorKind::Prisma => "PRISMA_ERROR",
            ErrorKind::Build => "BUILD_ERROR",
            ErrorKind::ModuleResolution => "MODULE_ERROR",
            ErrorKind::Syntax => "SYNTAX_ERROR",
            ErrorKind::Unknown => "UNKNOWN_ERROR",
        }
    }

    /// Classify error text. Total over any input: text matching no kind
    /// answers [`ErrorKind::Unknown`].
    pub fn classify(text: &str) -> ErrorKind {
        let lower = text.to_lowercase();
        CLASSIFICATION_PRIORITY
            .into_iter()
            .find(|kind| kind.matches(&lower))
            .unwrap_or(ErrorKind::Unknown)
    }

    /// Keyword probe for one kind, over lowercased text.
    fn matches(&self, lower: &str) -> bool {
        let keywords: &[&str] = match self {
            ErrorKind::Typescript => &["error ts", "verificação de tipos"],
            ErrorKind::Lint => &["lint sem avisos", "eslint", "max-warnings"],
            ErrorKind::Prisma => &["prisma", "migração", "migrate"],
            ErrorKind::Build => &["build de produção", "failed to compile", "next build", "webpack"],
            ErrorKind::ModuleResolution => &["cannot find module", "module not found"],
            ErrorKind::Syntax => &["syntaxerror", "unexpected token"],
            ErrorKind::Unknown => return false,
        };
        keywords.iter().any(|kw| lower.contains(kw))
    }
}
