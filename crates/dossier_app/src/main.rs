mod platform;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use dossier_logging::client_error;

use platform::config::ClientConfig;
use platform::logging::{initialize, LogDestination};

#[derive(Parser)]
#[command(name = "dossier")]
#[command(about = "Document workspace client")]
#[command(version)]
struct Cli {
    /// Path to the client config file.
    #[arg(long, global = true, default_value = ".dossier.ron")]
    config: PathBuf,

    /// Override the backend base URL from the config file.
    #[arg(long, global = true)]
    base_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Open a document: metadata, preview and processing-task panels.
    View { document_id: String },
    /// Upload a PDF into a project folder.
    Upload {
        project_id: String,
        folder_name: String,
        file: PathBuf,
    },
    /// Store a bearer credential for subsequent commands.
    Login { token: String },
    /// Drop the stored credential.
    Logout,
}

fn main() -> ExitCode {
    initialize(LogDestination::File);
    let cli = Cli::parse();

    let mut config = ClientConfig::load(&cli.config);
    if let Some(base_url) = cli.base_url {
        config.base_url = base_url;
    }

    let outcome = match cli.command {
        Command::View { document_id } => platform::app::run_view(&config, &document_id),
        Command::Upload {
            project_id,
            folder_name,
            file,
        } => platform::app::run_upload(&config, &project_id, &folder_name, &file),
        Command::Login { token } => {
            config.bearer = Some(token);
            config.save(&cli.config);
            Ok("Credential stored.".to_string())
        }
        Command::Logout => {
            config.bearer = None;
            config.save(&cli.config);
            Ok("Credential dropped.".to_string())
        }
    };

    match outcome {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            client_error!("{:#}", err);
            eprintln!("{err:#}");
            ExitCode::FAILURE
        }
    }
}
