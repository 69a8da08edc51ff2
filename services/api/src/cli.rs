use crate::demo::{run_demo, DemoArgs};
use crate::infra::open_store;
use crate::server;
use admit_guard::admissions::{AdmissionService, RuleCatalog};
use admit_guard::config::AppConfig;
use admit_guard::error::AppError;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(
    name = "AdmitGuard",
    about = "Run the AdmitGuard candidate intake service and audit log tools",
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
    /// Print the admission rule catalog
    Rules,
    /// Export the stored audit log
    Export(ExportArgs),
    /// Walk the reference admission scenarios against an in-memory audit log
    Demo(DemoArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    /// Override the configured SQLite database path (`:memory:` for a throwaway log)
    #[arg(long)]
    pub(crate) database: Option<PathBuf>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub(crate) enum ExportFormat {
    Csv,
    Json,
}

#[derive(Args, Debug)]
pub(crate) struct ExportArgs {
    /// Output format
    #[arg(long, value_enum, default_value_t = ExportFormat::Csv)]
    pub(crate) format: ExportFormat,
    /// Write to this file instead of stdout
    #[arg(long)]
    pub(crate) output: Option<PathBuf>,
    /// Override the configured SQLite database path
    #[arg(long)]
    pub(crate) database: Option<PathBuf>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Rules => {
            print_rules();
            Ok(())
        }
        Command::Export(args) => run_export(args),
        Command::Demo(args) => run_demo(args),
    }
}

fn print_rules() {
    println!("Admission rules");
    for rule in RuleCatalog::admissions().iter() {
        println!(
            "- [{:<6}] {:<22} {}",
            rule.severity.label(),
            rule.label,
            rule.description
        );
    }
}

fn run_export(args: ExportArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;
    if let Some(database) = args.database {
        config.storage.database_path = database;
    }

    let store = open_store(&config.storage)?;
    let service = AdmissionService::new(Arc::new(store));

    let body = match args.format {
        ExportFormat::Csv => service.export_csv()?,
        ExportFormat::Json => service.export_json()?,
    };

    match args.output {
        Some(path) => {
            std::fs::write(&path, body)?;
            println!("Audit log written to {}", path.display());
        }
        None => print!("{body}"),
    }
    Ok(())
}
