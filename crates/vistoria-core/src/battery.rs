//! Battery orchestration: the fixed, ordered sequence of checks.

use crate::check::{BuiltinCheck, CheckSpec};
use crate::executor::CheckExecutor;
use crate::probe::PrismaProbe;
use crate::result::BatteryOutcome;
use sha2::{Digest, Sha256};
use std::path::PathBuf;
use tracing::info;

/// Battery order. The order is not semantically required (checks are
/// independent) but it fixes the report layout, so it must not change.
const BATTERY: [BuiltinCheck; 7] = [
    BuiltinCheck::TypeCheck,
    BuiltinCheck::Lint,
    BuiltinCheck::PrismaGenerate,
    BuiltinCheck::PrismaMigrateStatus,
    BuiltinCheck::Build,
    BuiltinCheck::Audit,
    BuiltinCheck::DependencyList,
];

/// Runs the fixed check battery against one project.
pub struct BatteryRunner {
    project_root: PathBuf,
}

impl BatteryRunner {
    /// Create a runner for the project rooted at `project_root`.
    pub fn new(project_root: impl Into<PathBuf>) -> Self {
        Self {
            project_root: project_root.into(),
        }
    }

    /// Resolve the battery for this project, excluding the Prisma checks
    /// unless the toolchain is both installed and configured.
    pub fn checks(&self) -> Vec<CheckSpec> {
        let probe = PrismaProbe::new(&self.project_root);
        let prisma_ready = probe.is_available() && probe.has_config();

        BATTERY
            .iter()
            .filter(|check| !check.requires_prisma() || prisma_ready)
            .map(|check| CheckSpec::from_builtin(*check))
            .collect()
    }

    /// Execute every check in order, one at a time. A check's failure
    /// never aborts the battery.
    pub async fn run_all(&self, executor: &dyn CheckExecutor) -> BatteryOutcome {
        let checks = self.checks();
        info!(total = checks.len(), "iniciando bateria de verificações");

        let mut results = Vec::with_capacity(checks.len());
        for spec in &checks {
            results.push(executor.run(spec).await);
        }

        let outcome = BatteryOutcome::new(results);
        info!(
            success = outcome.success_count(),
            failures = outcome.failure_count(),
            skipped = outcome.skipped_count(),
            "bateria concluída"
        );
        outcome
    }

    /// Deterministic digest of the ordered battery descriptions,
    /// truncated for display in the report's environment block.
    pub fn battery_digest(&self) -> String {
        let mut hasher = Sha256::new();
        for spec in self.checks() {
            hasher.update(spec.description.as_bytes());
            hasher.update(b"\0");
        }
        let digest = hex::encode(hasher.finalize());
        digest[..12].to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_battery_without_prisma_excludes_optional_checks() {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::write(
            dir.path().join("package.json"),
            r#"{"dependencies": {"next": "^14.0.0"}}"#,
        )
        .expect("write");

        let runner = BatteryRunner::new(dir.path());
        let checks = runner.checks();

        assert_eq!(checks.len(), 5);
        assert!(checks
            .iter()
            .all(|c| !c.description.contains("Prisma")));
    }

    #[test]
    fn test_battery_with_prisma_includes_optional_checks_in_order() {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::write(
            dir.path().join("package.json"),
            r#"{"devDependencies": {"prisma": "^5.0.0"}}"#,
        )
        .expect("write");
        fs::create_dir_all(dir.path().join("prisma")).expect("mkdir");
        fs::write(dir.path().join("prisma").join("schema.prisma"), "// schema").expect("write");

        let runner = BatteryRunner::new(dir.path());
        let checks = runner.checks();

        assert_eq!(checks.len(), 7);
        assert_eq!(checks[0].description, "Verificação de tipos TypeScript");
        assert_eq!(checks[1].description, "Lint sem avisos");
        assert_eq!(checks[2].description, "Geração do Prisma Client");
        assert_eq!(checks[3].description, "Status das migrações Prisma");
        assert_eq!(checks[4].description, "Build de produção");
        assert_eq!(checks[5].description, "Auditoria de segurança");
        assert_eq!(checks[6].description, "Listagem de dependências");
    }

    #[test]
    fn test_prisma_declared_without_schema_excludes_optional_checks() {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::write(
            dir.path().join("package.json"),
            r#"{"dependencies": {"@prisma/client": "^5.0.0"}}"#,
        )
        .expect("write");

        let runner = BatteryRunner::new(dir.path());
        assert_eq!(runner.checks().len(), 5);
    }

    #[test]
    fn test_battery_digest_is_deterministic_and_short() {
        let dir = tempfile::tempdir().expect("tempdir");
        let runner = BatteryRunner::new(dir.path());
        let a = runner.battery_digest();
        let b = runner.battery_digest();
        assert_eq!(a, b);
        assert_eq!(a.len(), 12);
    }
}
