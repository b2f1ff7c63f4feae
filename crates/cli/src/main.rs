//! Cardfolio CLI - Backend inspection tools.
//!
//! # Usage
//!
//! ```bash
//! # Show the theme an account resolves to, and its card path
//! cf-cli theme 64f1c0ffee
//!
//! # Export a card as a vCard file
//! cf-cli vcard 64f1c0ffee --output jane.vcf
//! ```
//!
//! # Commands
//!
//! - `theme` - Resolve an account's theme
//! - `vcard` - Export a profile as vCard 3.0
//!
//! Both read `BACKEND_API_URL` (and `BACKEND_TIMEOUT_SECS`) from the
//! environment or `.env`.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "cf-cli")]
#[command(author, version, about = "Cardfolio CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve the theme of an account
    Theme {
        /// Account id
        user_id: String,
    },
    /// Export a profile as a vCard
    Vcard {
        /// Account id or profile id
        id: String,

        /// Write to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() {
    // Logs go to stderr so command output can be piped
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cf_cli=info,cardfolio_storefront=warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Theme { user_id } => commands::theme::resolve(&user_id).await?,
        Commands::Vcard { id, output } => commands::vcard::export(&id, output.as_deref()).await?,
    }
    Ok(())
}
