//! Core module for merging sequence sources into one canonical collection
//!
//! Reads every FASTA source, collapses records sharing the same
//! sequence and writes `merged.fasta` plus a JSON report of how many
//! sequences each source shared with the others.

use clap::{self, Parser};
use config::ArgCheck;
use log::{error, info, Level};
use simple_logger::init_with_level;

use cur_merge::{cli::Args, core::merge_sources};

fn main() {
    let start = std::time::Instant::now();
    init_with_level(Level::Info).unwrap();

    let args: Args = Args::parse();
    args.check().unwrap_or_else(|e| {
        error!("{}", e);
        std::process::exit(1);
    });

    rayon::ThreadPoolBuilder::new()
        .num_threads(args.threads.max(config::MIN_THREADS))
        .build_global()
        .unwrap_or_else(|e| {
            error!("{}", e);
            std::process::exit(1);
        });

    merge_sources(args).unwrap_or_else(|e| {
        error!("{}", e);
        std::process::exit(1);
    });

    let elapsed = start.elapsed();
    info!("Elapsed time: {:.3?}", elapsed);
}
