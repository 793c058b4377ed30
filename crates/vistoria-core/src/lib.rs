//! Vistoria Core - etapa de verificação
//!
//! Provides the verification-stage engine:
//! - Executes the fixed check battery (types, lint, Prisma, build, audit, deps)
//! - Filters known-noise failures out of check output
//! - Detects recurrence against prior reports
//! - Renders and persists the verification report artifact

pub mod battery;
pub mod check;
pub mod error;
pub mod executor;
pub mod noise;
pub mod probe;
pub mod recurrence;
pub mod report;
pub mod result;
pub mod telemetry;

// Re-export key types
pub use battery::BatteryRunner;
pub use check::{BuiltinCheck, CheckSpec};
pub use error::{Result, VistoriaError};
pub use executor::{CheckExecutor, ProcessExecutor};
pub use noise::NoiseFilter;
pub use probe::PrismaProbe;
pub use recurrence::RecurrenceDetector;
pub use report::{EnvSnapshot, RunContext};
pub use result::{BatteryOutcome, CheckResult};
pub use telemetry::init_tracing;
