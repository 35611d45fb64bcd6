//! Core module for removing records from a sequence pool
//!
//! Provides two subtools: `length`, which drops sequences longer than
//! a percentile of the input length distribution, and `negative`,
//! which removes candidate negatives that also appear among the
//! positives.

use clap::{self, Parser};
use config::ArgCheck;
use log::{error, info, Level};
use simple_logger::init_with_level;

use cur_filter::{
    cli::{Args, SubArgs},
    core::{length::length_filter, negative::negative_filter},
};

fn main() {
    let start = std::time::Instant::now();
    init_with_level(Level::Info).unwrap();

    let args: Args = Args::parse();

    rayon::ThreadPoolBuilder::new()
        .num_threads(args.threads.max(config::MIN_THREADS))
        .build_global()
        .unwrap_or_else(|e| {
            error!("{}", e);
            std::process::exit(1);
        });

    match args.command {
        SubArgs::Length { args } => {
            args.check().unwrap_or_else(|e| {
                error!("{}", e);
                std::process::exit(1);
            });

            length_filter(args).unwrap_or_else(|e| {
                error!("{}", e);
                std::process::exit(1);
            });
        }
        SubArgs::Negative { args } => {
            args.check().unwrap_or_else(|e| {
                error!("{}", e);
                std::process::exit(1);
            });

            negative_filter(args).unwrap_or_else(|e| {
                error!("{}", e);
                std::process::exit(1);
            });
        }
    }

    let elapsed = start.elapsed();
    info!("Elapsed time: {:.3?}", elapsed);
}
