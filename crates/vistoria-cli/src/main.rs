//! Vistoria - verificador e diagnosticador de projetos Next.js
//!
//! ## Comandos
//!
//! - `verificar`: executa a bateria de verificações e grava o relatório
//!   (comando padrão quando nenhum é informado)
//! - `diagnosticar`: lê o relatório mais recente e grava o diagnóstico
//!
//! As falhas das verificações são registradas no relatório, nunca
//! propagadas como falha do processo; apenas um erro de pipeline
//! (fora da fronteira por verificação) sai com código diferente de zero.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::{error, Level};
use vistoria_core::report::{self, EnvSnapshot, RunContext, HISTORY_DIR};
use vistoria_core::{
    BatteryOutcome, BatteryRunner, NoiseFilter, PrismaProbe, ProcessExecutor, RecurrenceDetector,
};
use vistoria_diag::{Diagnosis, DiagnosticEngine, Severity};

#[derive(Parser)]
#[command(name = "vistoria")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Verificador e diagnosticador de projetos Next.js", long_about = None)]
struct Cli {
    /// Saída detalhada
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Logs em linhas JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Executa a bateria de verificações e grava o relatório
    Verificar {
        /// Diretório do projeto
        #[arg(short, long, default_value = ".")]
        projeto: PathBuf,

        /// Mostra apenas a detecção do Prisma e sai
        #[arg(long)]
        debug_prisma: bool,
    },

    /// Diagnostica o relatório mais recente
    Diagnosticar {
        /// Diretório do projeto
        #[arg(short, long, default_value = ".")]
        projeto: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    vistoria_core::init_tracing(cli.json, level);

    // Sem subcomando, verifica o diretório atual.
    let command = cli.command.unwrap_or(Commands::Verificar {
        projeto: PathBuf::from("."),
        debug_prisma: false,
    });

    match command {
        Commands::Verificar {
            projeto,
            debug_prisma,
        } => cmd_verificar(&projeto, debug_prisma).await,
        Commands::Diagnosticar { projeto } => cmd_diagnosticar(&projeto).await,
    }
}

/// Etapa de verificação: bateria, filtro de ruído, recorrência, relatório.
async fn cmd_verificar(projeto: &Path, debug_prisma: bool) -> Result<()> {
    let probe = PrismaProbe::new(projeto);

    if debug_prisma {
        println!("Prisma declarado no manifesto: {}", sim_nao(probe.is_available()));
        println!("Schema prisma/schema.prisma presente: {}", sim_nao(probe.has_config()));
        return Ok(());
    }

    let ctx = RunContext::begin();
    let runner = BatteryRunner::new(projeto);
    let history = projeto.join(HISTORY_DIR);
    let env = EnvSnapshot::capture(probe.is_available(), runner.battery_digest());

    match run_verification(projeto, &runner, &env, &ctx, &history).await {
        Ok((path, overall_success)) => {
            if overall_success {
                println!("✅ Verificação concluída sem falhas.");
            } else {
                println!("❌ Verificação concluída com falhas; veja o relatório.");
            }
            println!("📄 Relatório: {}", path.display());
            Ok(())
        }
        Err(err) => {
            // Falha de pipeline: ainda tenta gravar um relatório mínimo
            // antes de sair com código diferente de zero.
            error!(error = %err, "falha de pipeline na verificação");
            if let Err(write_err) =
                report::write_pipeline_failure_report(&err.to_string(), &env, &ctx, &history)
            {
                error!(error = %write_err, "relatório mínimo não pôde ser gravado");
            }
            Err(anyhow::Error::new(err).context("falha de pipeline na verificação"))
        }
    }
}

async fn run_verification(
    projeto: &Path,
    runner: &BatteryRunner,
    env: &EnvSnapshot,
    ctx: &RunContext,
    history: &Path,
) -> vistoria_core::Result<(PathBuf, bool)> {
    let executor = ProcessExecutor::new(projeto);
    let outcome = runner.run_all(&executor).await;

    let outcome = BatteryOutcome::new(NoiseFilter::apply(&outcome.results));
    let recurrent = RecurrenceDetector::is_recurrent(&outcome.results, history);

    let path = report::write_report(&outcome, recurrent, env, ctx, history)?;
    Ok((path, outcome.overall_success()))
}

/// Etapa de diagnóstico: lê artefatos, nunca executa a bateria completa.
async fn cmd_diagnosticar(projeto: &Path) -> Result<()> {
    let engine = DiagnosticEngine::new(projeto);

    match engine.run().await.context("falha de pipeline no diagnóstico")? {
        Diagnosis::NothingToDiagnose => {
            println!("Nenhum relatório encontrado para diagnosticar.");
            Ok(())
        }
        Diagnosis::PreventiveScan { records } => {
            println!("🔎 Relatório sem erros; varredura preventiva executada.");
            if records.is_empty() {
                println!("   Nenhum problema adicional encontrado.");
            } else {
                println!("   {} apontamento(s):", records.len());
                for record in &records {
                    let label = match record.severity {
                        Severity::Error => "erro",
                        Severity::Warning => "aviso",
                    };
                    let location = record.location_label();
                    if location.is_empty() {
                        println!("   [{}] {}", label, record.message);
                    } else {
                        println!("   [{}] {} — {}", label, location, record.message);
                    }
                }
            }
            Ok(())
        }
        Diagnosis::DocumentWritten { path } => {
            println!("🩺 Diagnóstico gravado: {}", path.display());
            Ok(())
        }
    }
}

fn sim_nao(value: bool) -> &'static str {
    if value {
        "sim"
    } else {
        "não"
    }
}
