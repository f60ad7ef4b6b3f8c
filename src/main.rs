use anyhow::Result;
use clap::{Parser, Subcommand};

use formflow::config::Config;
use formflow::session::adapters;
use formflow::{logging, web};

#[derive(Parser)]
#[command(name = "formflow")]
#[command(about = "Multi-step web form backed by server-side sessions")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Config file path
    #[arg(short, long)]
    config: Option<String>,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the web server (default)
    Serve {
        /// Port to listen on (default: 5000)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Print the effective configuration as TOML
    Config,

    /// Remove expired sessions from the configured store
    Prune,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration first (needed for logging setup)
    let mut config = Config::load(cli.config.as_deref())?;

    let logging_handle = logging::init_logging(&config, cli.debug)?;
    if let Some(path) = &logging_handle.log_file_path {
        tracing::info!(path = %path.display(), "logging to file");
    }

    match cli.command.unwrap_or(Commands::Serve { port: None }) {
        Commands::Serve { port } => {
            if let Some(port) = port {
                config.server.port = port;
            }
            web::serve(&config).await?;
        }
        Commands::Config => {
            print!("{}", config.to_toml()?);
        }
        Commands::Prune => {
            cmd_prune(&config).await?;
        }
    }

    Ok(())
}

async fn cmd_prune(config: &Config) -> Result<()> {
    let store = adapters::build_store(&config.session);
    let removed = store.cleanup_expired().await?;
    let remaining = store.count().await?;

    println!("Removed {} expired session(s), {} remaining", removed, remaining);
    Ok(())
}
