//! Terminal front-end for tagnote.
//!
//! # Responsibility
//! - Parse note/tag subcommands and run them against the slot database.
//! - Map every failure to a one-line message and a non-zero exit code.

mod commands;

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tagnote_core::{init_logging, CoreConfig};

#[derive(Debug, Parser)]
#[command(name = "tagnote", version, about = "Tagged notes kept in a local slot database")]
struct Cli {
    /// Slot database file. Overrides TAGNOTE_DB_PATH.
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Absolute directory for rolling logs. Overrides TAGNOTE_LOG_DIR.
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Create, edit, delete and list notes.
    #[command(subcommand)]
    Note(NoteCommand),
    /// Create, rename, delete and list tags.
    #[command(subcommand)]
    Tag(TagCommand),
    /// Print core version and storage location.
    Info,
}

#[derive(Debug, Subcommand)]
pub(crate) enum NoteCommand {
    Add(NoteFields),
    /// Replace a note's fields. Omitted fields keep their current value.
    Edit {
        id: String,
        #[command(flatten)]
        fields: NoteEditFields,
    },
    Rm {
        id: String,
    },
    Show {
        id: String,
    },
    List {
        /// Case-insensitive title substring.
        #[arg(long, default_value = "")]
        title: String,
        /// Required tag id; repeat to require several.
        #[arg(long = "tag")]
        tags: Vec<String>,
    },
}

#[derive(Debug, Args)]
pub(crate) struct NoteFields {
    #[arg(long, default_value = "")]
    title: String,
    #[arg(long, default_value = "")]
    content: String,
    /// Tag id; repeat for several.
    #[arg(long = "tag")]
    tags: Vec<String>,
}

#[derive(Debug, Args)]
pub(crate) struct NoteEditFields {
    #[arg(long)]
    title: Option<String>,
    #[arg(long)]
    content: Option<String>,
    /// Replacement tag id list; repeat for several.
    #[arg(long = "tag")]
    tags: Option<Vec<String>>,
    /// Drop every tag reference.
    #[arg(long, conflicts_with = "tags")]
    clear_tags: bool,
}

#[derive(Debug, Subcommand)]
pub(crate) enum TagCommand {
    Add { label: String },
    Rename { id: String, label: String },
    Rm { id: String },
    List,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("tagnote: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), String> {
    let mut config = CoreConfig::from_env().map_err(|err| err.to_string())?;
    if let Some(db) = cli.db {
        config.db_path = db;
    }
    if let Some(dir) = cli.log_dir {
        config.log_dir = Some(dir);
    }
    if let Some(dir) = config.log_dir.as_ref() {
        init_logging(config.log_level, &dir.to_string_lossy())?;
    }

    match cli.command {
        Command::Note(command) => commands::run_note(&config, command),
        Command::Tag(command) => commands::run_tag(&config, command),
        Command::Info => {
            println!("tagnote_core ping={}", tagnote_core::ping());
            println!("tagnote_core version={}", tagnote_core::core_version());
            println!("db_path={}", config.db_path.display());
            Ok(())
        }
    }
}
