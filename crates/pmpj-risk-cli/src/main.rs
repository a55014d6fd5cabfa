mod commands;
mod input;
mod output;
mod store;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;
use tracing_subscriber::EnvFilter;

use commands::assess::AssessArgs;
use commands::evidence::EvidenceArgs;
use commands::records::{CommitArgs, RecordsArgs};
use commands::scoring::{
    ClientVolumeArgs, FinalRiskArgs, InherentArgs, InternalControlArgs, ResidualArgs,
};

/// Notary PMPJ risk self-assessment
#[derive(Parser)]
#[command(
    name = "pmpj",
    version,
    about = "Notary PMPJ (know-your-client) risk self-assessment",
    long_about = "Scores a notary's PMPJ questionnaire: inherent risk from client \
                  categories, internal control from the Q1 answer and its supporting \
                  document, residual and final risk from the fixed matrices. \
                  Submissions can be kept in a CSV record store, one row per NIK."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Engine config file (YAML or JSON)
    #[arg(long, global = true)]
    config: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Assess a full questionnaire submission, optionally storing it
    Assess(AssessArgs),
    /// Score inherent risk from category counts, enforcement and region
    Inherent(InherentArgs),
    /// Grade internal control from the Q1 answer and document
    InternalControl(InternalControlArgs),
    /// Combine inherent risk and internal control into residual risk
    Residual(ResidualArgs),
    /// Band the client count
    ClientVolume(ClientVolumeArgs),
    /// Combine residual and client-volume severities into the final tier
    FinalRisk(FinalRiskArgs),
    /// Check a supporting document for required keywords
    Evidence(EvidenceArgs),
    /// Retry storing a record parked after a failed write
    Commit(CommitArgs),
    /// List stored submission records
    Records(RecordsArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config = match input::file::read_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    };

    let result: commands::CommandResult = match cli.command {
        Commands::Assess(args) => commands::assess::run_assess(args, &config),
        Commands::Inherent(args) => commands::scoring::run_inherent(args),
        Commands::InternalControl(args) => commands::scoring::run_internal_control(args, &config),
        Commands::Residual(args) => commands::scoring::run_residual(args),
        Commands::ClientVolume(args) => commands::scoring::run_client_volume(args),
        Commands::FinalRisk(args) => commands::scoring::run_final_risk(args),
        Commands::Evidence(args) => commands::evidence::run_evidence(args, &config),
        Commands::Commit(args) => commands::records::run_commit(args),
        Commands::Records(args) => commands::records::run_records(args),
        Commands::Version => {
            println!("pmpj {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
