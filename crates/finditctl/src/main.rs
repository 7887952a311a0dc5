//! FindIt Control - terminal host for the FindIt pipeline
//!
//! Speech capture and synthesis are swapped for text: transcripts are typed
//! on the command line (with optional `--alt` alternates standing in for the
//! recognizer's alternative transcriptions) and spoken output is printed.
//! Records persist to a JSON file under the user data directory.

mod display;
mod store;

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use findit_core::{
    CaptureError, FindOutcome, LogOutcome, RemoteConfig, RemoteParser, SearchResult, Session,
    SpeechOutput, Transcript, TranscriptSource,
};

use crate::store::JsonFileStore;

#[derive(Parser)]
#[command(name = "finditctl")]
#[command(about = "FindIt - Never lose your things again", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log where an item was put, e.g. "keys in the kitchen drawer"
    Log {
        /// The transcript, as you would have spoken it
        text: String,

        /// Alternative transcriptions, best first
        #[arg(long)]
        alt: Vec<String>,

        /// Save without asking for confirmation
        #[arg(long)]
        yes: bool,
    },

    /// Ask where an item is, e.g. "where are my keys?"
    Find {
        /// The query, as you would have spoken it
        text: String,

        /// Alternative transcriptions, best first
        #[arg(long)]
        alt: Vec<String>,
    },

    /// Show all logged items
    List,

    /// Delete a logged item by name
    Forget { name: String },

    /// Move a logged item to a new location without re-parsing
    Relabel { name: String, location: String },
}

/// Speech synthesis stand-in: spoken lines go to stdout
struct PrintedSpeech;

impl SpeechOutput for PrintedSpeech {
    fn speak(&self, text: &str) {
        display::print_spoken(text);
    }
}

/// Capture stand-in: the "listening window" already happened at the shell
/// prompt, so this resolves immediately with the typed transcript.
struct TypedSource {
    transcript: Transcript,
}

#[async_trait]
impl TranscriptSource for TypedSource {
    async fn listen(&self) -> Result<Transcript, CaptureError> {
        Ok(self.transcript.clone())
    }
}

fn typed(text: String, alternatives: Vec<String>) -> TypedSource {
    let mut all = vec![text.clone()];
    all.extend(alternatives);
    TypedSource {
        transcript: Transcript::with_alternatives(text, all),
    }
}

fn config_path() -> Result<PathBuf> {
    let config_dir = dirs::config_dir().context("Could not resolve a config directory")?;
    Ok(config_dir.join("findit").join("config.toml"))
}

fn ask_confirmation() -> Result<bool> {
    print!("Save? [y/N] ");
    std::io::stdout().flush()?;
    let mut answer = String::new();
    std::io::stdin().read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .init();

    let cli = Cli::parse();

    let config = RemoteConfig::load_or_default(&config_path()?)?;
    let store = JsonFileStore::at_default_path()?;
    let mut session = Session::new(
        Box::new(store),
        Box::new(PrintedSpeech),
        RemoteParser::new(config),
    );

    match cli.command {
        Commands::Log { text, alt, yes } => {
            let source = typed(text, alt);
            match session.capture_and_log(&source).await? {
                LogOutcome::Confirm { parsed, notice } => {
                    if let Some(notice) = notice {
                        display::print_hint(&notice);
                    }
                    display::print_parsed(&parsed.name, &parsed.location, parsed.confidence);
                    if yes || ask_confirmation()? {
                        session.confirm(&parsed)?;
                    } else {
                        session.cancel(parsed);
                        println!("Cancelled.");
                    }
                }
                LogOutcome::Unresolved { hint, notice } => {
                    if let Some(notice) = notice {
                        display::print_hint(&notice);
                    }
                    display::print_hint(&hint);
                    std::process::exit(1);
                }
            }
        }

        Commands::Find { text, alt } => {
            let source = typed(text, alt);
            match session.capture_and_find(&source).await? {
                FindOutcome::Resolved { result, .. } => {
                    if let SearchResult::Found { items } = result {
                        display::print_items(&items, Utc::now().timestamp_millis());
                    }
                }
                FindOutcome::Unresolved { hint } => {
                    display::print_hint(&hint);
                    std::process::exit(1);
                }
            }
        }

        Commands::List => {
            let items = session.items()?;
            display::print_items(&items, Utc::now().timestamp_millis());
        }

        Commands::Forget { name } => match session.forget(&name)? {
            Some(item) => println!("Forgot {} (was in {}).", item.name, item.location),
            None => {
                println!("No record of {name}.");
                std::process::exit(1);
            }
        },

        Commands::Relabel { name, location } => match session.relabel(&name, &location)? {
            Some(item) => println!("{} is now in {}.", item.name, item.location),
            None => {
                println!("No record of {name}.");
                std::process::exit(1);
            }
        },
    }

    Ok(())
}
