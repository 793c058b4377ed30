//! Remediation synthesis: command list and staged action plan.

use crate::classify::ErrorKind;
use std::collections::HashSet;

/// Fixed closing pair: rebuild, then diagnose again.
pub const FINAL_COMMANDS: [&str; 2] = ["npm run build", "vistoria diagnosticar"];

/// Stage priority for the action plan; every distinct category present
/// produces one stage, in this order.
const STAGE_PRIORITY: [ErrorKind; 6] = [
    ErrorKind::Typescript,
    ErrorKind::Lint,
    ErrorKind::Prisma,
    ErrorKind::Build,
    ErrorKind::ModuleResolution,
    ErrorKind::Syntax,
];

/// One stage of the action plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionStage {
    /// Stage title.
    pub title: String,

    /// Ordered actions for the stage.
    pub actions: Vec<String>,
}

/// Build the remediation command list: first per failed check, then per
/// classified kind, deduplicated preserving first occurrence, always
/// terminated by [`FINAL_COMMANDS`].
pub fn remediation_commands(failed_descriptions: &[String], kind: ErrorKind) -> Vec<String> {
    let mut commands: Vec<&str> = Vec::new();

    for description in failed_descriptions {
        commands.extend(commands_for_check(description));
    }
    commands.extend(commands_for_kind(kind));

    let mut seen = HashSet::new();
    let mut ordered: Vec<String> = commands
        .into_iter()
        .filter(|cmd| !FINAL_COMMANDS.contains(cmd))
        .filter(|cmd| seen.insert(*cmd))
        .map(|cmd| cmd.to_string())
        .collect();

    ordered.extend(FINAL_COMMANDS.iter().map(|cmd| cmd.to_string()));
    ordered
}

fn commands_for_check(description: &str) -> &'static [&'static str] {
    match description {
        "Verificação de tipos TypeScript" => &["npx tsc --noEmit"],
        "Lint sem avisos" => &["npx next lint --fix"],
        "Geração do Prisma Client" => &["npx prisma generate"],
        "Status das migrações Prisma" => &["npx prisma migrate dev"],
        "Build de produção" => &["rm -rf .next"],
        "Auditoria de segurança" => &["npm audit fix"],
        "Listagem de dependências" => &["npm install"],
        _ => &[],
    }
}

fn commands_for_kind(kind: ErrorKind) -> &'static [&'static str] {
    match kind {
        ErrorKind::Typescript => &["npx tsc --noEmit"],
        ErrorKind::Lint => &["npx next lint --fix"],
        ErrorKind::Prisma => &["npx prisma generate", "npx prisma migrate status"],
        ErrorKind::Build => &["rm -rf .next"],
        ErrorKind::ModuleResolution => &["npm install"],
        ErrorKind::Syntax | ErrorKind::Unknown => &[],
    }
}

/// Build the staged action plan for the distinct categories present,
/// always ending with the re-verification stage.
pub fn action_plan(kinds_present: &[ErrorKind]) -> Vec<ActionStage> {
    let mut stages: Vec<ActionStage> = STAGE_PRIORITY
        .into_iter()
        .filter(|kind| kinds_present.contains(kind))
        .map(stage_for_kind)
        .collect();

    stages.push(ActionStage {
        title: "Reverificação".to_string(),
        actions: vec![
            "Executar vistoria verificar".to_string(),
            "Confirmar o status SUCESSO no novo relatório".to_string(),
        ],
    });
    stages
}

fn stage_for_kind(kind: ErrorKind) -> ActionStage {
    let (title, actions): (&str, &[&str]) = match kind {
        ErrorKind::Typescript => (
            "Corrigir erros de tipos",
            &[
                "Executar npx tsc --noEmit e revisar cada erro",
                "Ajustar tipos e interfaces nos arquivos apontados",
            ],
        ),
        ErrorKind::Lint => (
            "Corrigir avisos de lint",
            &[
                "Executar npx next lint --fix",
                "Revisar manualmente os avisos restantes",
            ],
        ),
        ErrorKind::Prisma => (
            "Regenerar o Prisma Client",
            &[
                "Conferir DATABASE_URL no .env",
                "Executar npx prisma generate",
                "Executar npx prisma migrate status",
            ],
        ),
        ErrorKind::Build => (
            "Refazer o build de produção",
            &[
                "Remover o diretório .next",
                "Executar npm run build e revisar a saída",
            ],
        ),
        ErrorKind::ModuleResolution => (
            "Resolver módulos ausentes",
            &[
                "Executar npm install",
                "Conferir os caminhos dos imports",
            ],
        ),
        ErrorKind::Syntax => (
            "Corrigir erros de sintaxe",
            &["Revisar os trechos apontados no diagnóstico"],
        ),
        // Unknown never appears in STAGE_PRIORITY.
        ErrorKind::Unknown => ("Investigar a falha", &["Reler o relatório original"]),
    };
    ActionStage {
        title: title.to_string(),
        actions: actions.iter().map(|a| a.to_string()).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_commands_end_with_fixed_pair() {
        let commands = remediation_commands(&[], ErrorKind::Unknown);
        assert_eq!(commands, vec!["npm run build", "vistoria diagnosticar"]);
    }

    #[test]
    fn test_typescript_command_appears_exactly_once() {
        // Failed check and classified kind both map to the same command.
        let failed = vec!["Verificação de tipos TypeScript".to_string()];
        let commands = remediation_commands(&failed, ErrorKind::Typescript);

        let count = commands.iter().filter(|c| *c == "npx tsc --noEmit").count();
        assert_eq!(count, 1);
        assert_eq!(commands.last().map(String::as_str), Some("vistoria diagnosticar"));
        assert_eq!(
            commands.get(commands.len() - 2).map(String::as_str),
            Some("npm run build")
        );
    }

    #[test]
    fn test_build_failure_keeps_pair_last() {
        // "npm run build" belongs to the closing pair even when the build
        // check itself failed.
        let failed = vec!["Build de produção".to_string()];
        let commands = remediation_commands(&failed, ErrorKind::Build);

        assert_eq!(commands.iter().filter(|c| *c == "npm run build").count(), 1);
        assert_eq!(commands[0], "rm -rf .next");
        assert_eq!(commands.last().map(String::as_str), Some("vistoria diagnosticar"));
    }

    #[test]
    fn test_commands_preserve_check_order() {
        let failed = vec![
            "Lint sem avisos".to_string(),
            "Auditoria de segurança".to_string(),
        ];
        let commands = remediation_commands(&failed, ErrorKind::Lint);
        assert_eq!(commands[0], "npx next lint --fix");
        assert_eq!(commands[1], "npm audit fix");
    }

    #[test]
    fn test_action_plan_orders_by_priority_and_ends_with_reverification() {
        let kinds = vec![ErrorKind::Build, ErrorKind::Typescript];
        let stages = action_plan(&kinds);

        assert_eq!(stages.len(), 3);
        assert_eq!(stages[0].title, "Corrigir erros de tipos");
        assert_eq!(stages[1].title, "Refazer o build de produção");
        assert_eq!(stages[2].title, "Reverificação");
    }

    #[test]
    fn test_action_plan_with_nothing_present_still_reverifies() {
        let stages = action_plan(&[ErrorKind::Unknown]);
        assert_eq!(stages.len(), 1);
        assert_eq!(stages[0].title, "Reverificação");
    }
}
