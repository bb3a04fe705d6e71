use clap::{Parser, Subcommand};
use rst_common::with_tokio::tokio;

use hubrouter_routerd::errors::RouterdError;
use hubrouter_routerd::svc::http::Http;

#[derive(Parser)]
#[command(name = "routerd")]
#[command(version = "0.1")]
#[command(long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(name = "serve")]
    #[command(about = "Running the hub router HTTP server")]
    Serve {
        #[arg(short, long, value_name = "FILE")]
        config: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), RouterdError> {
    let cli = Cli::parse();
    match &cli.command {
        Commands::Serve { config } => {
            let server = Http::new(config.to_owned());
            server.serve().await?;
        }
    }

    Ok(())
}
