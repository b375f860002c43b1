// Module declarations
mod cli;
mod client;
mod config;
mod embed;
mod ledger;
mod merge;
mod obo;
mod postprocess;
mod record_log;
mod snapshot;
mod term_store;
mod translate;
mod types;
mod util;

// Re-export all module items at crate root so cross-module references work
// through a single namespace.
#[allow(unused_imports)]
pub(crate) use cli::*;
#[allow(unused_imports)]
pub(crate) use client::*;
#[allow(unused_imports)]
pub(crate) use config::*;
#[allow(unused_imports)]
pub(crate) use embed::*;
#[allow(unused_imports)]
pub(crate) use ledger::*;
#[allow(unused_imports)]
pub(crate) use merge::*;
#[allow(unused_imports)]
pub(crate) use obo::*;
#[allow(unused_imports)]
pub(crate) use postprocess::*;
#[allow(unused_imports)]
pub(crate) use record_log::*;
#[allow(unused_imports)]
pub(crate) use snapshot::*;
#[allow(unused_imports)]
pub(crate) use term_store::*;
#[allow(unused_imports)]
pub(crate) use translate::*;
#[allow(unused_imports)]
pub(crate) use types::*;
#[allow(unused_imports)]
pub(crate) use util::*;

use std::fs::File;
use std::io::BufReader;
use std::time::Duration;

use clap::Parser;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Command::Parse { obo, out } => {
            if !obo.exists() {
                eprintln!("Source does not exist: {}", obo.display());
                std::process::exit(2);
            }
            let reader = BufReader::new(File::open(&obo)?);
            let store = parse_obo(reader)?;
            save_term_store(&out, &store)?;
            println!("Parsed {} terms into {}", store.len(), out.display());
            Ok(())
        }

        Command::Translate {
            terms,
            ledger,
            log,
            token,
            api_base,
            model,
            pace_secs,
            timeout_secs,
        } => {
            let mut cfg = match EnrichConfig::resolve(token, api_base) {
                Ok(cfg) => cfg,
                Err(err) => {
                    eprintln!("{err}");
                    std::process::exit(2);
                }
            };
            if let Some(model) = model {
                cfg.chat_model = model;
            }
            if let Some(secs) = pace_secs {
                cfg.translate_pace = Duration::from_secs(secs);
            }
            if let Some(secs) = timeout_secs {
                cfg.request_timeout = Duration::from_secs(secs);
            }

            let store = load_term_store(&terms)?;
            let mut done = Ledger::open(&ledger)?;
            if done.len() > 0 {
                println!("[translate] resuming: {} ids already done", done.len());
            } else {
                println!("[translate] no checkpoint found, starting from scratch");
            }

            let client = ApiClient::new(&cfg);
            let pacer = Pacer::new(cfg.translate_pace);
            match run_translation_pass(&store, &mut done, &log, &client, &pacer) {
                Ok(outcome) => {
                    println!(
                        "[translate] finished: {} translated, {} already done",
                        outcome.processed, outcome.skipped
                    );
                    Ok(())
                }
                Err(err) => {
                    eprintln!("[translate] stopped: {err}");
                    eprintln!("[translate] completed work is checkpointed; rerun to resume");
                    std::process::exit(1);
                }
            }
        }

        Command::Collect { log, out } => {
            let store = replay_records(&log)?;
            save_term_store(&out, &store)?;
            println!("Collected {} terms into {}", store.len(), out.display());
            Ok(())
        }

        Command::Embed {
            terms,
            snapshot,
            token,
            api_base,
            model,
            pace_secs,
            timeout_secs,
            max_chars,
            dim,
        } => {
            let mut cfg = match EnrichConfig::resolve(token, api_base) {
                Ok(cfg) => cfg,
                Err(err) => {
                    eprintln!("{err}");
                    std::process::exit(2);
                }
            };
            if let Some(model) = model {
                cfg.embed_model = model;
            }
            if let Some(secs) = pace_secs {
                cfg.embed_pace = Duration::from_secs(secs);
            }
            if let Some(secs) = timeout_secs {
                cfg.request_timeout = Duration::from_secs(secs);
            }
            if let Some(chars) = max_chars {
                cfg.max_input_chars = chars;
            }
            if let Some(dim) = dim {
                cfg.embed_dim = dim;
            }

            let store = load_term_store(&terms)?;
            let mut vectors = if snapshot.exists() {
                let vectors = load_snapshot(&snapshot)?;
                println!(
                    "[embed] found {} existing vectors, resuming",
                    vectors.len()
                );
                vectors
            } else {
                println!("[embed] no snapshot found, starting from scratch");
                VectorMap::new()
            };

            let client = ApiClient::new(&cfg);
            let pacer = Pacer::new(cfg.embed_pace);
            let result = run_embedding_pass(
                &store,
                &mut vectors,
                &client,
                &pacer,
                cfg.max_input_chars,
                cfg.embed_dim,
            );
            // Persist old plus new in every outcome; an early stop must
            // not discard the vectors fetched before it.
            save_snapshot(&snapshot, &vectors)?;
            match result {
                Ok(outcome) => {
                    println!(
                        "[embed] finished: {} new vectors, {} skipped, {} total",
                        outcome.processed,
                        outcome.skipped,
                        vectors.len()
                    );
                    Ok(())
                }
                Err(err) => {
                    eprintln!("[embed] stopped: {err}");
                    eprintln!(
                        "[embed] snapshot saved with {} vectors; rerun to resume",
                        vectors.len()
                    );
                    std::process::exit(1);
                }
            }
        }

        Command::Merge { old, new, out } => {
            let base = load_term_store(&old)?;
            let incoming = load_term_store(&new)?;
            let merged = merge_stores(base, incoming);
            save_term_store(&out, &merged)?;
            println!("Merged {} terms into {}", merged.len(), out.display());
            Ok(())
        }
    }
}
