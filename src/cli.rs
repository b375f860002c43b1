use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "ontoglot")]
#[command(about = "Resumable translation and embedding enrichment for ontology term stores", long_about = None)]
#[command(version)]
pub(crate) struct Cli {
    #[command(subcommand)]
    pub(crate) command: Command,
}

#[derive(Subcommand)]
pub(crate) enum Command {
    /// Convert an OBO ontology export into a term-store JSON mapping.
    Parse {
        /// Source .obo file
        obo: PathBuf,
        /// Output term-store JSON
        out: PathBuf,
    },

    /// Translate term names and definitions; resumes from the ledger.
    Translate {
        /// Term-store JSON to enrich
        terms: PathBuf,
        /// Checkpoint ledger (one finished id per line)
        #[arg(long, default_value = "done_list.txt")]
        ledger: PathBuf,
        /// Enriched-record log, one JSON object appended per finished term
        #[arg(long, default_value = "translated.jsonl")]
        log: PathBuf,
        /// Bearer token; defaults to $ONTOGLOT_API_TOKEN
        #[arg(long)]
        token: Option<String>,
        /// API base URL; defaults to $ONTOGLOT_API_BASE or the public endpoint
        #[arg(long)]
        api_base: Option<String>,
        /// Chat model used for translation
        #[arg(long)]
        model: Option<String>,
        /// Seconds to pause after each term
        #[arg(long)]
        pace_secs: Option<u64>,
        /// HTTP timeout in seconds
        #[arg(long)]
        timeout_secs: Option<u64>,
    },

    /// Rebuild a term-store JSON from the enriched-record log.
    Collect {
        /// Enriched-record log written by `translate`
        log: PathBuf,
        /// Output term-store JSON
        out: PathBuf,
    },

    /// Vectorize terms into a compressed snapshot; resumes from the
    /// snapshot itself.
    Embed {
        /// Term-store JSON (translated or not)
        terms: PathBuf,
        /// Snapshot file; existing vectors are kept verbatim
        snapshot: PathBuf,
        #[arg(long)]
        token: Option<String>,
        #[arg(long)]
        api_base: Option<String>,
        /// Embedding model
        #[arg(long)]
        model: Option<String>,
        #[arg(long)]
        pace_secs: Option<u64>,
        #[arg(long)]
        timeout_secs: Option<u64>,
        /// Maximum input length in characters before truncation
        #[arg(long)]
        max_chars: Option<usize>,
        /// Stored vector dimensionality (prefix of the raw embedding)
        #[arg(long)]
        dim: Option<usize>,
    },

    /// Merge two term stores by key; entries from `new` win.
    Merge {
        old: PathBuf,
        new: PathBuf,
        out: PathBuf,
    },
}
