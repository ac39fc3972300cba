use clap::{Parser, Subcommand};

use paaster::commands::upload::{InputMode, Protocol, UploadOverrides};
use paaster::commands::{set, upload};
use paaster::storage::JsonStorage;

#[derive(Parser)]
#[command(name = "paaster")]
#[command(about = "Upload locally encrypted pastes to paaster from your desktop", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Set a config parameter
    Set {
        /// Parameter name: API_URL, FRONTEND_URL, COPY_URL_TO_CLIPBOARD,
        /// OPEN_URL_IN_BROWSER or ECHO_URL
        #[arg(short, long)]
        name: String,
        /// New value
        #[arg(short, long)]
        value: String,
    },
    /// Encrypt and upload a paste, then share the URL
    Upload {
        /// Where the paste text comes from
        #[arg(short, long, value_enum, default_value_t)]
        mode: InputMode,
        /// File path (--mode file) or the paste itself (--mode inline)
        input: Option<String>,
        /// Overwrite the COPY_URL_TO_CLIPBOARD setting for this upload
        #[arg(long)]
        copy_to_clipboard: Option<bool>,
        /// Overwrite the OPEN_URL_IN_BROWSER setting for this upload
        #[arg(long)]
        open_browser: Option<bool>,
        /// Overwrite the ECHO_URL setting for this upload
        #[arg(long)]
        echo_url: Option<bool>,
        /// API generation to speak (for older self-hosted servers)
        #[arg(long, value_enum, default_value_t)]
        protocol: Protocol,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if cli.verbose {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Debug)
            .init();
    } else {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Info)
            .init();
    }

    let storage = JsonStorage::open()?;

    match cli.command {
        Commands::Set { name, value } => {
            set::run(&storage, &name, &value)?;
        }
        Commands::Upload {
            mode,
            input,
            copy_to_clipboard,
            open_browser,
            echo_url,
            protocol,
        } => {
            upload::run(
                &storage,
                mode,
                input.as_deref(),
                protocol,
                UploadOverrides {
                    copy_to_clipboard,
                    open_browser,
                    echo_url,
                },
            )
            .await?;
        }
    }

    Ok(())
}
