//! Command-line probe for the template content engine.
//!
//! # Responsibility
//! - Exercise the codec, trigger detector and menu builder on local files.
//! - Apply the engine config given by `--config` to trigger and menu runs.
//! - Keep output deterministic for quick local sanity checks.

use clap::{Parser, Subcommand};
use offerdoc_core::menu::build_menu_for_query;
use offerdoc_core::{
    decode, decode_stored, encode, CatalogSnapshot, Document, EngineConfig, MenuEntry, Point,
    StoredContent, TriggerDetector, TriggerState,
};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(name = "offerdoc", version, about = "Offer/contract template content probe")]
struct CliArgs {
    /// Engine config JSON; defaults apply when omitted or unreadable
    #[arg(long, global = true, value_name = "CONFIG_JSON")]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print core linkage and version
    Ping,
    /// Print the effective engine config as JSON
    Config,
    /// Print the flat text of a JSON tree file
    Encode {
        #[arg(value_name = "TREE_JSON")]
        tree: PathBuf,
    },
    /// Print the JSON tree decoded from a flat text file
    Decode {
        #[arg(value_name = "TEXT_FILE")]
        text: PathBuf,
    },
    /// Open a stored `{text, tree?}` file and print its tree
    Open {
        #[arg(value_name = "STORED_JSON")]
        stored: PathBuf,
    },
    /// Run trigger detection on the text preceding the cursor
    Trigger {
        window: String,
        /// Cursor offset; defaults to the window length
        #[arg(long, value_name = "N")]
        cursor: Option<usize>,
    },
    /// List a catalog as the grouped slash menu
    Menu {
        #[arg(long, value_name = "CATALOG_JSON")]
        catalog: PathBuf,
        #[arg(long, default_value = "")]
        query: String,
        /// Label language; defaults to the configured language
        #[arg(long)]
        lang: Option<String>,
    },
}

fn main() -> ExitCode {
    let args = CliArgs::parse();
    let config = args
        .config
        .as_deref()
        .map(EngineConfig::load)
        .unwrap_or_default();
    match run(args.command, &config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("offerdoc: {message}");
            ExitCode::FAILURE
        }
    }
}

fn run(command: Command, config: &EngineConfig) -> Result<(), String> {
    match command {
        Command::Ping => {
            println!("offerdoc_core ping={}", offerdoc_core::ping());
            println!("offerdoc_core version={}", offerdoc_core::core_version());
        }
        Command::Config => {
            let json = serde_json::to_string_pretty(config)
                .map_err(|err| format!("cannot serialize config: {err}"))?;
            println!("{json}");
        }
        Command::Encode { tree } => {
            let document: Document = serde_json::from_str(&read(&tree)?)
                .map_err(|err| format!("invalid tree json: {err}"))?;
            println!("{}", encode(&document));
        }
        Command::Decode { text } => print_tree(&decode(&read(&text)?))?,
        Command::Open { stored } => {
            let content: StoredContent = serde_json::from_str(&read(&stored)?)
                .map_err(|err| format!("invalid stored content json: {err}"))?;
            print_tree(&decode_stored(&content))?;
        }
        Command::Trigger { window, cursor } => {
            let cursor = cursor.unwrap_or_else(|| window.chars().count());
            let detector = TriggerDetector::new(config.trigger);
            let state = detector.detect(cursor, &window, &|_offset: usize| {
                Some(Point::default())
            });
            match state {
                TriggerState::Idle => println!("idle"),
                TriggerState::Armed(trigger) => println!(
                    "armed from={} to={} query={:?}",
                    trigger.from, trigger.to, trigger.query
                ),
            }
        }
        Command::Menu {
            catalog,
            query,
            lang,
        } => {
            let catalog =
                CatalogSnapshot::from_json_str(&read(&catalog)?).map_err(|err| err.to_string())?;
            let lang = lang.unwrap_or_else(|| config.default_language.clone());
            let menu = build_menu_for_query(&query, &catalog, &lang);
            for entry in &menu.display_items {
                match entry {
                    MenuEntry::Divider { data_source } => println!("-- {data_source}"),
                    MenuEntry::Item(item) => println!("   {} ({})", item.label, item.key),
                }
            }
            if let Some(empty) = menu.empty_state {
                println!("(empty: {empty:?})");
            }
        }
    }
    Ok(())
}

fn read(path: &Path) -> Result<String, String> {
    std::fs::read_to_string(path).map_err(|err| format!("cannot read {}: {err}", path.display()))
}

fn print_tree(document: &Document) -> Result<(), String> {
    let json = serde_json::to_string_pretty(document)
        .map_err(|err| format!("cannot serialize tree: {err}"))?;
    println!("{json}");
    Ok(())
}
