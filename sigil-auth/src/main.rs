use clap::{Parser, Subcommand};
use sigil::config::Config;
use sigil::http::Server;
use sigil::logging::Logger;
use sigil::session::generate_key_base64;
use std::path::PathBuf;
use std::sync::Arc;

use sigil_auth::{models::MemoryStore, routes};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    subcommands: Subcommands,
}

#[derive(Subcommand, Debug)]
enum Subcommands {
    /// Start the HTTP server.
    Serve {
        #[arg(long, short, help = "Path to the config file (default: $SIGIL_CONFIG or sigil.toml)")]
        config: Option<PathBuf>,

        #[arg(long, help = "Listen on this address")]
        host: Option<String>,

        #[arg(long, short, help = "Listen on this port")]
        port: Option<u16>,
    },

    /// Generate a secret key for the config file.
    Secret,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Cli::parse();

    match args.subcommands {
        Subcommands::Serve { config, host, port } => {
            Logger::init();

            let mut config = match config {
                Some(path) => Config::load_from(path)?,
                None => Config::load()?,
            };

            if let Some(host) = host {
                config.general.host = host;
            }

            if let Some(port) = port {
                config.general.port = port;
            }

            config.log_info();

            let store = MemoryStore::from_config(&config.users)?;
            tracing::info!("Loaded {} user(s)", store.len());

            Server::new(routes(Arc::new(store)), &config)?
                .launch()
                .await?;
        }

        Subcommands::Secret => {
            println!("{}", generate_key_base64());
        }
    }

    Ok(())
}
