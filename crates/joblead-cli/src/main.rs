use anyhow::Result;
use clap::{Parser, Subcommand};
use joblead_ingest::JobImporter;
use joblead_storage::JobStore;
use joblead_web::AppConfig;

#[derive(Debug, Parser)]
#[command(name = "joblead")]
#[command(about = "JobLead lead-tracking server and tools")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Run the web server (default)
    Serve,
    /// Create the database schema
    Init,
    /// Import jobs from a JSON file and print the report
    Import { file: std::path::PathBuf },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = AppConfig::from_env();

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => joblead_web::serve(config).await?,
        Commands::Init => {
            let store = JobStore::connect(&config.database_url).await?;
            store.migrate().await?;
            println!("database ready: {}", config.database_url);
        }
        Commands::Import { file } => {
            let raw = std::fs::read_to_string(&file)?;
            let store = JobStore::connect(&config.database_url).await?;
            store.migrate().await?;
            let importer = JobImporter::new(store, config.build_notifier()?);
            let report = importer.import_from_json(&raw).await;
            println!("{}", report.message);
            if !report.success {
                std::process::exit(1);
            }
        }
    }

    Ok(())
}
