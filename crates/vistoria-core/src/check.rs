//! Check battery definitions and configuration.

use serde::{Deserialize, Serialize};

/// Builtin verification checks, in battery order.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum BuiltinCheck {
    /// npx tsc --noEmit
    TypeCheck,

    /// npx next lint --max-warnings=0
    Lint,

    /// npx prisma generate (only when Prisma is installed and configured)
    PrismaGenerate,

    /// npx prisma migrate status (only when Prisma is installed and configured)
    PrismaMigrateStatus,

    /// npm run build
    Build,

    /// npm audit --audit-level=high
    Audit,

    /// npm ls --depth=0
    DependencyList,
}

impl BuiltinCheck {
    /// Human label shown in the report. Unique per battery.
    pub fn description(&self) -> &'static str {
        match self {
            BuiltinCheck::TypeCheck => "Verificação de tipos TypeScript",
            BuiltinCheck::Lint => "Lint sem avisos",
            BuiltinCheck::PrismaGenerate => "Geração do Prisma Client",
            BuiltinCheck::PrismaMigrateStatus => "Status das migrações Prisma",
            BuiltinCheck::Build => "Build de produção",
            BuiltinCheck::Audit => "Auditoria de segurança",
            BuiltinCheck::DependencyList => "Listagem de dependências",
        }
    }

    /// Executable invoked for this check.
    pub fn program(&self) -> &'static str {
        match self {
            BuiltinCheck::TypeCheck
            | BuiltinCheck::Lint
            | BuiltinCheck::PrismaGenerate
            | BuiltinCheck::PrismaMigrateStatus => "npx",
            BuiltinCheck::Build | BuiltinCheck::Audit | BuiltinCheck::DependencyList => "npm",
        }
    }

    /// Arguments passed to the executable.
    pub fn args(&self) -> Vec<String> {
        let args: &[&str] = match self {
            BuiltinCheck::TypeCheck => &["tsc", "--noEmit"],
            BuiltinCheck::Lint => &["next", "lint", "--max-warnings=0"],
            BuiltinCheck::PrismaGenerate => &["prisma", "generate"],
            BuiltinCheck::PrismaMigrateStatus => &["prisma", "migrate", "status"],
            BuiltinCheck::Build => &["run", "build"],
            BuiltinCheck::Audit => &["audit", "--audit-level=high"],
            BuiltinCheck::DependencyList => &["ls", "--depth=0"],
        };
        args.iter().map(|a| a.to_string()).collect()
    }

    /// Whether this check only runs when the Prisma toolchain is present.
    pub fn requires_prisma(&self) -> bool {
        matches!(
            self,
            BuiltinCheck::PrismaGenerate | BuiltinCheck::PrismaMigrateStatus
        )
    }
}

/// A fully resolved check invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckSpec {
    /// Human-readable check description (unique per battery).
    pub description: String,

    /// Executable name.
    pub program: String,

    /// Arguments, execv-style.
    pub args: Vec<String>,
}

impl CheckSpec {
    /// Resolve a builtin check into a concrete invocation.
    pub fn from_builtin(check: BuiltinCheck) -> Self {
        Self {
            description: check.description().to_string(),
            program: check.program().to_string(),
            args: check.args(),
        }
    }

    /// Create a custom check invocation.
    pub fn custom(description: String, program: String, args: Vec<String>) -> Self {
        Self {
            description,
            program,
            args,
        }
    }

    /// Literal invocation string, for display in the report.
    pub fn display(&self) -> String {
        if self.args.is_empty() {
            self.program.clone()
        } else {
            format!("{} {}", self.program, self.args.join(" "))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_descriptions_unique() {
        let all = [
            BuiltinCheck::TypeCheck,
            BuiltinCheck::Lint,
            BuiltinCheck::PrismaGenerate,
            BuiltinCheck::PrismaMigrateStatus,
            BuiltinCheck::Build,
            BuiltinCheck::Audit,
            BuiltinCheck::DependencyList,
        ];
        let mut seen = std::collections::HashSet::new();
        for check in all {
            assert!(seen.insert(check.description()), "duplicated description");
        }
    }

    #[test]
    fn test_builtin_commands() {
        let spec = CheckSpec::from_builtin(BuiltinCheck::TypeCheck);
        assert_eq!(spec.display(), "npx tsc --noEmit");

        let spec = CheckSpec::from_builtin(BuiltinCheck::Lint);
        assert_eq!(spec.display(), "npx next lint --max-warnings=0");

        let spec = CheckSpec::from_builtin(BuiltinCheck::Audit);
        assert_eq!(spec.display(), "npm audit --audit-level=high");
    }

    #[test]
    fn test_requires_prisma() {
        assert!(BuiltinCheck::PrismaGenerate.requires_prisma());
        assert!(BuiltinCheck::PrismaMigrateStatus.requires_prisma());
        assert!(!BuiltinCheck::TypeCheck.requires_prisma());
        assert!(!BuiltinCheck::Build.requires_prisma());
    }

    #[test]
    fn test_custom_spec_display() {
        let spec = CheckSpec::custom(
            "eco".to_string(),
            "echo".to_string(),
            vec!["ola".to_string()],
        );
        assert_eq!(spec.display(), "echo ola");
    }
}
