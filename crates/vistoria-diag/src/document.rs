//! Rendering of the diagnostic document artifact.

use crate::analyze::FileAnalysis;
use crate::classify::ErrorKind;
use crate::extract::SourceLocation;
use crate::plan::ActionStage;
use crate::record::{ErrorRecord, Severity};
use chrono::Local;

/// All inputs of one diagnostic document, borrowed from the engine.
pub struct DiagnosticDocument<'a> {
    /// File name of the report being diagnosed.
    pub report_name: &'a str,

    /// Classified error kind.
    pub kind: ErrorKind,

    /// Failed-check descriptions pulled from the report.
    pub failed: &'a [String],

    /// Located source file/line, when any pattern matched.
    pub location: Option<&'a SourceLocation>,

    /// Window analysis of the located file.
    pub analysis: Option<&'a FileAnalysis>,

    /// Records from the independent re-scan.
    pub records: &'a [ErrorRecord],

    /// Ordered remediation commands.
    pub commands: &'a [String],

    /// Staged action plan.
    pub stages: &'a [ActionStage],

    /// Full text of the source report, embedded for traceability.
    pub report_text: &'a str,
}

impl DiagnosticDocument<'_> {
    /// Render the document as markdown.
    pub fn render(&self) -> String {
        let mut md = String::new();

        md.push_str("# 🩺 DIAGNÓSTICO DO PROJETO\n\n");
        md.push_str(&format!("Relatório analisado: {}\n", self.report_name));
        md.push_str(&format!(
            "Data do diagnóstico: {}\n\n",
            Local::now().format("%d/%m/%Y %H:%M:%S")
        ));

        md.push_str("## Classificação\n\n");
        md.push_str(&format!("Tipo: {}\n\n", self.kind.artifact_name()));

        md.push_str("## Verificações com falha\n\n");
        if self.failed.is_empty() {
            md.push_str("Nenhuma verificação listada no relatório.\n\n");
        } else {
            for description in self.failed {
                md.push_str(&format!("- {}\n", description));
            }
            md.push('\n');
        }

        md.push_str("## Arquivo localizado\n\n");
        match self.location {
            Some(location) => {
                match location.line {
                    Some(line) => md.push_str(&format!("{}:{}\n\n", location.file, line)),
                    None => md.push_str(&format!("{}\n\n", location.file)),
                }
                if let Some(analysis) = self.analysis {
                    md.push_str("### Análise do trecho\n\n");
                    md.push_str(&format!("Problema: {}\n", analysis.problem));
                    md.push_str(&format!("Solução: {}\n", analysis.solution));
                    if !analysis.example.is_empty() {
                        md.push_str("Exemplo:\n\n```\n");
                        md.push_str(&analysis.example);
                        md.push_str("\n```\n");
                    }
                    md.push_str("\nPassos:\n");
                    for (index, step) in analysis.steps.iter().enumerate() {
                        md.push_str(&format!("{}. {}\n", index + 1, step));
                    }
                    md.push('\n');
                }
            }
            None => md.push_str("Nenhum arquivo localizado.\n\n"),
        }

        md.push_str("## Reexame independente\n\n");
        if self.records.is_empty() {
            md.push_str("Nenhum problema adicional encontrado.\n\n");
        } else {
            for record in self.records {
                let label = match record.severity {
                    Severity::Error => "erro",
                    Severity::Warning => "aviso",
                };
                let location = record.location_label();
                if location.is_empty() {
                    md.push_str(&format!("- [{}] {}\n", label, record.message));
                } else {
                    md.push_str(&format!("- [{}] {} — {}\n", label, location, record.message));
                }
            }
            md.push('\n');
        }

        md.push_str("## Comandos de correção\n\n");
        for (index, command) in self.commands.iter().enumerate() {
            md.push_str(&format!("{}. `{}`\n", index + 1, command));
        }
        md.push('\n');

        md.push_str("## Plano de ação\n\n");
        for (index, stage) in self.stages.iter().enumerate() {
            md.push_str(&format!("### Etapa {}: {}\n\n", index + 1, stage.title));
            for action in &stage.actions {
                md.push_str(&format!("- {}\n", action));
            }
            md.push('\n');
        }

        md.push_str("## 📎 Relatório original\n\n```\n");
        md.push_str(self.report_text);
        if !self.report_text.ends_with('\n') {
            md.push('\n');
        }
        md.push_str("```\n");

        md
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_full_document() {
        let location = SourceLocation {
            file: "src/app/page.tsx".to_string(),
            line: Some(10),
        };
        let analysis = FileAnalysis {
            problem: "problema".to_string(),
            solution: "solução".to_string(),
            example: "exemplo()".to_string(),
            steps: vec!["um".to_string(), "dois".to_string()],
        };
        let failed = vec!["Verificação de tipos TypeScript".to_string()];
        let records = vec![ErrorRecord::new(
            ErrorKind::Typescript,
            "TS2304: Cannot find name 'Foo'".to_string(),
            Severity::Error,
        )
        .with_location("src/app/page.tsx".to_string(), Some(10))];
        let commands = vec!["npx tsc --noEmit".to_string(), "npm run build".to_string()];
        let stages = vec![ActionStage {
            title: "Corrigir erros de tipos".to_string(),
            actions: vec!["agir".to_string()],
        }];

        let document = DiagnosticDocument {
            report_name: "log-2024-03-01-10-00.log",
            kind: ErrorKind::Typescript,
            failed: &failed,
            location: Some(&location),
            analysis: Some(&analysis),
            records: &records,
            commands: &commands,
            stages: &stages,
            report_text: "❌ Status: ERRO\n",
        };
        let md = document.render();

        assert!(md.contains("Tipo: TYPESCRIPT_ERROR"));
        assert!(md.contains("- Verificação de tipos TypeScript"));
        assert!(md.contains("src/app/page.tsx:10"));
        assert!(md.contains("Problema: problema"));
        assert!(md.contains("1. `npx tsc --noEmit`"));
        assert!(md.contains("### Etapa 1: Corrigir erros de tipos"));
        assert!(md.contains("[erro] src/app/page.tsx:10 — TS2304"));
        assert!(md.contains("❌ Status: ERRO"));
    }

    #[test]
    fn test_render_without_location_or_records() {
        let document = DiagnosticDocument {
            report_name: "log-2024-03-01-10-00.log",
            kind: ErrorKind::Unknown,
            failed: &[],
            location: None,
            analysis: None,
            records: &[],
            commands: &[],
            stages: &[],
            report_text: "texto",
        };
        let md = document.render();

        assert!(md.contains("Nenhum arquivo localizado."));
        assert!(md.contains("Nenhum problema adicional encontrado."));
        assert!(md.contains("Nenhuma verificação listada no relatório."));
    }
}
