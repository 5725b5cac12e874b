use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use shortlink_seeder::config::{Config, LogFormat, Overrides};
use shortlink_seeder::{runner, telemetry};
use std::path::PathBuf;
use tracing::info;

/// Seed a URL-shortening service and write a Hot/Warm/Cold/Invalid dataset.
#[derive(Parser, Debug)]
#[command(name = "shortlink-seeder", version)]
struct Cli {
    /// TOML configuration file (missing file is ignored).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log output format.
    #[arg(long, value_enum, global = true)]
    log_format: Option<LogFormat>,

    #[command(flatten)]
    generate: GenerateArgs,

    #[command(subcommand)]
    cmd: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Verify an existing dataset file and print its distribution.
    Inspect(InspectArgs),
}

/// Options for seeding a new dataset.
#[derive(Args, Debug, Clone)]
struct GenerateArgs {
    /// Number of URLs to create (default: 1000).
    #[arg(long)]
    count: Option<usize>,

    /// Output file path (default: step1-dataset.json).
    #[arg(long)]
    output: Option<PathBuf>,

    /// Root URL of the shortening service (default: http://localhost:8080).
    #[arg(long)]
    base_url: Option<String>,

    /// Seed for synthetic URLs; random when omitted.
    #[arg(long)]
    seed: Option<u64>,
}

#[derive(Args, Debug, Clone)]
struct InspectArgs {
    /// Dataset file to check.
    path: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let cfg = Config::load(cli.config.as_deref())?.apply(Overrides {
        base_url: cli.generate.base_url,
        count: cli.generate.count,
        output: cli.generate.output,
        seed: cli.generate.seed,
        log_format: cli.log_format,
    });
    telemetry::init_tracing(cfg.log.format);

    match cli.cmd {
        Some(Command::Inspect(args)) => {
            runner::inspect(&args.path)?;
        }
        None => {
            let summary = runner::generate(&cfg).await?;
            info!(
                created = summary.created,
                requested = summary.requested,
                failed = summary.failed,
                seed = summary.seed,
                output = %summary.output.display(),
                "dataset generation completed"
            );
        }
    }
    Ok(())
}
