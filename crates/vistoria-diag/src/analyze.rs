//! Heuristic analysis of the located source window.
//!
//! Reads a ±3-line window around the located line and applies an ordered
//! rule chain; the first matching rule wins. Guards are written so a
//! window satisfies at most one rule before the generic fallback.

use crate::extract::SourceLocation;
use regex::Regex;
use std::path::Path;
use std::sync::OnceLock;
use tracing::debug;

/// Lines of context on each side of the located line.
const WINDOW_RADIUS: usize = 3;

/// Problem/solution tuple for the diagnostic document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileAnalysis {
    /// What looks wrong.
    pub problem: String,

    /// How to fix it.
    pub solution: String,

    /// A corrected example snippet.
    pub example: String,

    /// Ordered steps for the reader.
    pub steps: Vec<String>,
}

/// Read the located file and analyse the window around the located line.
/// Answers `None` when the file cannot be read.
pub fn analyze_file(root: &Path, location: &SourceLocation) -> Option<FileAnalysis> {
    let path = root.join(&location.file);
    let Ok(source) = std::fs::read_to_string(&path) else {
        debug!(file = %path.display(), "arquivo localizado não pôde ser lido");
        return None;
    };
    Some(analyze_window(&source, location.line))
}

/// Rule chain over the window. Public for direct testing.
pub fn analyze_window(source: &str, line: Option<u32>) -> FileAnalysis {
    let window = slice_window(source, line);

    if missing_react_import(source, &window) {
        return FileAnalysis {
            problem: "o trecho usa recursos do React sem importá-lo".to_string(),
            solution: "adicionar o import do React no topo do arquivo".to_string(),
            example: "import { useState } from 'react';".to_string(),
            steps: vec![
                "Abrir o arquivo apontado".to_string(),
                "Adicionar o import do React antes dos demais imports".to_string(),
                "Rodar npx tsc --noEmit para confirmar".to_string(),
            ],
        };
    }

    if references_props_contract(&window) {
        return FileAnalysis {
            problem: "o trecho referencia props/interfaces que podem não bater com a declaração"
                .to_string(),
            solution: "conferir os nomes das props contra a interface declarada".to_string(),
            example: "interface CardProps { titulo: string }\nfunction Card({ titulo }: CardProps) { … }".to_string(),
            steps: vec![
                "Localizar a interface usada pelo componente".to_string(),
                "Comparar cada prop usada com a declaração".to_string(),
                "Renomear ou adicionar as props divergentes".to_string(),
            ],
        };
    }

    if has_malformed_module_line(&window) {
        return FileAnalysis {
            problem: "há uma linha de import/export malformada no trecho".to_string(),
            solution: "corrigir a sintaxe do import/export".to_string(),
            example: "import Card from './components/Card';".to_string(),
            steps: vec![
                "Revisar a linha apontada".to_string(),
                "Colocar o módulo entre aspas e terminar com ponto e vírgula".to_string(),
            ],
        };
    }

    if component_without_return(&window) {
        return FileAnalysis {
            problem: "a declaração do componente não retorna JSX".to_string(),
            solution: "garantir que o componente retorne um elemento".to_string(),
            example: "export default function Page() {\n  return <main>…</main>;\n}".to_string(),
            steps: vec![
                "Conferir o corpo do componente".to_string(),
                "Adicionar o return com o JSX esperado".to_string(),
            ],
        };
    }

    FileAnalysis {
        problem: "não foi possível apontar uma causa específica no trecho".to_string(),
        solution: "revisar o trecho junto da mensagem de erro original".to_string(),
        example: String::new(),
        steps: vec![
            "Reler a mensagem de erro no relatório".to_string(),
            "Inspecionar o trecho apontado".to_string(),
            "Rodar a verificação novamente após o ajuste".to_string(),
        ],
    }
}

/// The ±[`WINDOW_RADIUS`]-line slice around `line` (1-indexed).
fn slice_window(source: &str, line: Option<u32>) -> String {
    let lines: Vec<&str> = source.lines().collect();
    if lines.is_empty() {
        return String::new();
    }
    let center = line.unwrap_or(1).saturating_sub(1) as usize;
    let start = center.saturating_sub(WINDOW_RADIUS);
    let end = (center + WINDOW_RADIUS + 1).min(lines.len());
    if start >= lines.len() {
        return String::new();
    }
    lines[start..end].join("\n")
}

fn missing_react_import(source: &str, window: &str) -> bool {
    let imports_react = source.contains("from 'react'") || source.contains("from \"react\"");
    if imports_react {
        return false;
    }
    static JSX_TAG: OnceLock<Option<Regex>> = OnceLock::new();
    let uses_jsx = JSX_TAG
        .get_or_init(|| Regex::new(r"<[A-Z][A-Za-z]*").ok())
        .as_ref()
        .is_some_and(|re| re.is_match(window));
    let uses_hook = ["useState", "useEffect", "useContext", "useMemo"]
        .iter()
        .any(|hook| window.contains(hook));
    uses_jsx || uses_hook
}

fn references_props_contract(window: &str) -> bool {
    window.contains("Props") || window.contains("interface ")
}

fn has_malformed_module_line(window: &str) -> bool {
    window.lines().any(|line| {
        let trimmed = line.trim_start();
        (trimmed.starts_with("import ") || trimmed.starts_with("export "))
            && trimmed.contains(" from ")
            && !trimmed.contains('\'')
            && !trimmed.contains('"')
    })
}

fn component_without_return(window: &str) -> bool {
    static COMPONENT_DECL: OnceLock<Option<Regex>> = OnceLock::new();
    let declares = COMPONENT_DECL
        .get_or_init(|| {
            Regex::new(r"(export default function [A-Z]|const [A-Z][A-Za-z]* = \()").ok()
        })
        .as_ref()
        .is_some_and(|re| re.is_match(window));
    declares && !window.contains("return")
}
