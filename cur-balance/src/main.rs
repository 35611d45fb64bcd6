//! Core module for balancing and writing a curated dataset
//!
//! Reads a positive and a negative FASTA source, downsamples the
//! larger class to at most `factor` times the smaller one and writes
//! `seqs.fasta` together with the aligned `classes.txt`.

use clap::{self, Parser};
use config::ArgCheck;
use log::{error, info, Level};
use simple_logger::init_with_level;

use cur_balance::{cli::Args, core::balance_sources};

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

    balance_sources(args).unwrap_or_else(|e| {
        error!("{}", e);
        std::process::exit(1);
    });

    let elapsed = start.elapsed();
    info!("Elapsed time: {:.3?}", elapsed);
}
