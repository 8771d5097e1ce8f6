use crate::infra::build_intake_service;
use crate::server;
use aid_intake::config::AppConfig;
use aid_intake::error::AppError;
use aid_intake::intake::{EncryptionService, IntakeError};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "Assistance Application Intake",
    about = "Validate, triage, and securely store financial-assistance applications",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Print a freshly generated base64 ENCRYPTION_KEY
    Keygen,
    /// Validate and triage a JSON submission without storing it
    Triage(TriageArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

#[derive(Args, Debug)]
pub(crate) struct TriageArgs {
    /// Path to a JSON application body
    #[arg(long)]
    file: PathBuf,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Keygen => {
            println!("{}", EncryptionService::generate_key());
            Ok(())
        }
        Command::Triage(args) => run_triage(args),
    }
}

fn run_triage(args: TriageArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let raw = std::fs::read(&args.file)?;
    let body: serde_json::Value = serde_json::from_slice(&raw)?;

    let service = build_intake_service(&config);
    match service.assess(&body) {
        Ok(triage) => {
            println!("{}", serde_json::to_string_pretty(&triage)?);
            Ok(())
        }
        Err(failure) => {
            println!("{}", serde_json::to_string_pretty(&failure)?);
            Err(IntakeError::from(failure).into())
        }
    }
}
