//! Detection of the optional Prisma toolchain.

use serde_json::Value;
use std::path::PathBuf;

/// Package names whose declaration marks Prisma as installed.
const PRISMA_PACKAGES: [&str; 2] = ["prisma", "@prisma/client"];

/// Dependency groups searched in the project manifest.
const DEPENDENCY_GROUPS: [&str; 2] = ["dependencies", "devDependencies"];

/// Read-only probe for Prisma availability and configuration.
///
/// Tolerant of a missing or malformed `package.json`: every failure mode
/// answers `false` instead of erroring.
pub struct PrismaProbe {
    root: PathBuf,
}

impl PrismaProbe {
    /// Probe the project rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Whether the manifest declares the Prisma toolchain in any
    /// dependency group.
    pub fn is_available(&self) -> bool {
        let Ok(raw) = std::fs::read_to_string(self.root.join("package.json")) else {
            return false;
        };
        let Ok(manifest) = serde_json::from_str::<Value>(&raw) else {
            return false;
        };

        DEPENDENCY_GROUPS.iter().any(|group| {
            manifest
                .get(group)
                .and_then(Value::as_object)
                .is_some_and(|deps| PRISMA_PACKAGES.iter().any(|pkg| deps.contains_key(*pkg)))
        })
    }

    /// Whether the schema file is present next to the project.
    pub fn has_config(&self) -> bool {
        self.root.join("prisma").join("schema.prisma").is_file()
    }
}
