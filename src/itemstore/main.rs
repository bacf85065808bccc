mod args;

use args::{Cli, Commands};
use clap::Parser;
use directories::ProjectDirs;
use itemstore::bridge::{self, Call, Response, INVALID_ARGUMENT};
use itemstore::store::fs::FsBackend;
use itemstore::store::{ItemStore, PrefsBackend};
use serde_json::json;
use std::io::{self, BufRead};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let data_dir = match cli.data_dir.or_else(default_data_dir) {
        Some(dir) => dir,
        None => {
            eprintln!("error: could not determine a data directory; pass --data-dir");
            return ExitCode::FAILURE;
        }
    };

    let store = ItemStore::with_backend(FsBackend::new(data_dir));

    match cli.command {
        Commands::Serve => serve(&store),
        command => {
            let response = bridge::dispatch(&store, &to_call(command));
            answer(&response)
        }
    }
}

/// Map a CLI subcommand onto its bridge call. Argument names match the
/// wire contract, so `serve` and the subcommands exercise the exact same
/// dispatch path.
fn to_call(command: Commands) -> Call {
    match command {
        Commands::Save { item } => Call::new("saveItem").arg("item", json!(item)),
        Commands::List => Call::new("getItems"),
        Commands::Get { item_id } => Call::new("getItemById").arg("itemId", json!(item_id)),
        Commands::Update { item } => Call::new("updateItem").arg("item", json!(item)),
        Commands::Delete { item_id } => Call::new("deleteItem").arg("itemId", json!(item_id)),
        Commands::Clear => Call::new("clearItems"),
        Commands::Check { product_id } => {
            Call::new("isProductSaved").arg("productId", json!(product_id))
        }
        Commands::Serve => unreachable!("serve is handled before dispatch"),
    }
}

/// The bridge host: one JSON call per stdin line, one JSON response per
/// stdout line. Calls run to completion before the next line is read,
/// which is exactly the serialization the store's contract requires.
fn serve<B: PrefsBackend>(store: &ItemStore<B>) -> ExitCode {
    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                eprintln!("error: stdin read failed: {e}");
                return ExitCode::FAILURE;
            }
        };
        if line.trim().is_empty() {
            continue;
        }

        let response = match serde_json::from_str::<Call>(&line) {
            Ok(call) => bridge::dispatch(store, &call),
            Err(e) => Response::error(INVALID_ARGUMENT, &format!("Malformed call: {e}")),
        };
        print_response(&response);
    }
    ExitCode::SUCCESS
}

fn answer(response: &Response) -> ExitCode {
    print_response(response);
    if response.is_error() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

fn print_response(response: &Response) {
    match serde_json::to_string(response) {
        Ok(json) => println!("{json}"),
        Err(e) => eprintln!("error: response serialization failed: {e}"),
    }
}

fn default_data_dir() -> Option<PathBuf> {
    ProjectDirs::from("io", "itemstore", "itemstore").map(|dirs| dirs.data_dir().to_path_buf())
}
