//! Independent project re-scan for corroborating evidence.
//!
//! Re-runs the type-check and lint with structured capture, walks the
//! source tree with heuristic text checks, and validates the Prisma
//! schema. Records are aggregated without deduplication: the document
//! shows everything each probe saw.

use crate::classify::ErrorKind;
use crate::record::{ErrorRecord, Severity};
use regex::Regex;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use tracing::{debug, info};
use vistoria_core::{CheckExecutor, CheckSpec, ProcessExecutor};
use walkdir::WalkDir;

/// Source extensions visited by the heuristic walk.
const SOURCE_EXTENSIONS: [&str; 4] = ["ts", "tsx", "js", "jsx"];

/// One ESLint result entry from `--format json`.
#[derive(Debug, Deserialize)]
struct EslintFileReport {
    #[serde(rename = "filePath")]
    file_path: String,
    messages: Vec<EslintMessage>,
}

#[derive(Debug, Deserialize)]
struct EslintMessage {
    #[serde(default)]
    line: Option<u32>,
    severity: u8,
    message: String,
}

/// Re-scans one project independently of any report.
pub struct ProjectRescan {
    root: PathBuf,
}

impl ProjectRescan {
    /// Scan the project rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Run every probe and aggregate the records.
    pub async fn run(&self) -> Vec<ErrorRecord> {
        let executor = ProcessExecutor::new(&self.root);

        let mut records = self.typescript_records(&executor).await;
        records.extend(self.lint_records(&executor).await);
        records.extend(self.source_walk_records());
        records.extend(self.prisma_schema_records());

        info!(total = records.len(), "reexame do projeto concluído");
        records
    }

    /// Structured capture of `npx tsc --noEmit`.
    async fn typescript_records(&self, executor: &dyn CheckExecutor) -> Vec<ErrorRecord> {
        let spec = CheckSpec::custom(
            "reexame de tipos".to_string(),
            "npx".to_string(),
            vec!["tsc".to_string(), "--noEmit".to_string()],
        );
        let result = executor.run(&spec).await;
        if result.success || result.skipped {
            return Vec::new();
        }

        static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
        let Some(re) = PATTERN
            .get_or_init(|| Regex::new(r"^(.+?)\((\d+),\d+\): error (TS\d+): (.*)$").ok())
            .as_ref()
        else {
            return Vec::new();
        };

        result
            .output
            .lines()
            .filter_map(|line| {
                let captures = re.captures(line)?;
                let file = captures.get(1)?.as_str().to_string();
                let line_number = captures.get(2)?.as_str().parse().ok();
                let code = captures.get(3)?.as_str();
                let message = captures.get(4)?.as_str();
                Some(
                    ErrorRecord::new(
                        ErrorKind::Typescript,
                        format!("{}: {}", code, message),
                        Severity::Error,
                    )
                    .with_location(file, line_number),
                )
            })
            .collect()
    }

    /// Structured capture of ESLint via `--format json`.
    async fn lint_records(&self, executor: &dyn CheckExecutor) -> Vec<ErrorRecord> {
        let spec = CheckSpec::custom(
            "reexame de lint".to_string(),
            "npx".to_string(),
            vec![
                "eslint".to_string(),
                "src".to_string(),
                "--format".to_string(),
                "json".to_string(),
            ],
        );
        let result = executor.run(&spec).await;
        if result.skipped {
            return Vec::new();
        }

        let Ok(reports) = serde_json::from_str::<Vec<EslintFileReport>>(result.stdout.trim())
        else {
            debug!("saída do eslint não é JSON estruturado");
            return Vec::new();
        };

        reports
            .into_iter()
            .flat_map(|report| {
                let file = relative_to(&self.root, &report.file_path);
                report.messages.into_iter().map(move |msg| {
                    let severity = if msg.severity >= 2 {
                        Severity::Error
                    } else {
                        Severity::Warning
                    };
                    ErrorRecord::new(ErrorKind::Lint, msg.message, severity)
                        .with_location(file.clone(), msg.line)
                })
            })
            .collect()
    }

    /// Heuristic text checks over the source tree: malformed import lines
    /// and `is not defined` occurrences. Not a parser.
    fn source_walk_records(&self) -> Vec<ErrorRecord> {
        let src = self.root.join("src");
        let mut records = Vec::new();

        for entry in WalkDir::new(src).into_iter().flatten() {
            let path = entry.path();
            let is_source = path
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|ext| SOURCE_EXTENSIONS.contains(&ext));
            if !entry.file_type().is_file() || !is_source {
                continue;
            }
            let Ok(content) = std::fs::read_to_string(path) else {
                continue;
            };
            let file = relative_to(&self.root, &path.to_string_lossy());

            for (index, line) in content.lines().enumerate() {
                let number = (index + 1) as u32;
                if is_malformed_import(line) {
                    records.push(
                        ErrorRecord::new(
                            ErrorKind::Syntax,
                            "linha de import malformada".to_string(),
                            Severity::Error,
                        )
                        .with_location(file.clone(), Some(number)),
                    );
                }
                if line.contains("is not defined") {
                    records.push(
                        ErrorRecord::new(
                            ErrorKind::ModuleResolution,
                            "referência não definida".to_string(),
                            Severity::Warning,
                        )
                        .with_location(file.clone(), Some(number)),
                    );
                }
            }
        }
        records
    }

    /// Presence checks on the Prisma schema and its generated client.
    fn prisma_schema_records(&self) -> Vec<ErrorRecord> {
        let schema_path = self.root.join("prisma").join("schema.prisma");
        let Ok(schema) = std::fs::read_to_string(&schema_path) else {
            return Vec::new();
        };

        let mut records = Vec::new();
        if !schema.contains("env(\"DATABASE_URL\")") {
            records.push(
                ErrorRecord::new(
                    ErrorKind::Prisma,
                    "schema sem env(\"DATABASE_URL\") na datasource".to_string(),
                    Severity::Error,
                )
                .with_location("prisma/schema.prisma".to_string(), None),
            );
        }

        let client_generated = self.root.join("node_modules/.prisma/client").is_dir()
            || self.root.join("node_modules/@prisma/client").is_dir();
        if !client_generated {
            records.push(
                ErrorRecord::new(
                    ErrorKind::Prisma,
                    "Prisma Client não gerado (node_modules ausente)".to_string(),
                    Severity::Warning,
                )
                .with_location("prisma/schema.prisma".to_string(), None),
            );
        }
        records
    }
}

/// `import … from` with no quoted module specifier.
fn is_malformed_import(line: &str) -> bool {
    let trimmed = line.trim_start();
    trimmed.starts_with("import ")
        && trimmed.contains(" from ")
        && !trimmed.contains('\'')
        && !trimmed.contains('"')
}

fn relative_to(root: &Path, path: &str) -> String {
    let root_prefix = format!("{}/", root.display());
    path.strip_prefix(&root_prefix).unwrap_or(path).to_string()
}
