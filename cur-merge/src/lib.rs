//! Core module for merging sequence sources into one canonical collection
//!
//! Every source (one per database or download) is folded into an
//! insertion-ordered map keyed by sequence content. Duplicates never
//! survive: their annotation tags are unioned into the canonical entry
//! and the number of collapsed records is reported per source.

pub mod cli;
pub mod core;

pub use crate::core::{
    merge, BatchStats, MergeStats, MergedCollection, SourceOverlap, TagCount,
};

use config::ArgCheck;

pub fn lib_cur_merge(args: Vec<String>) -> anyhow::Result<MergeStats> {
    let args = cli::Args::from(args);
    args.check()?;

    cur_pack::thread_pool(args.threads)?.install(|| crate::core::merge_sources(args))
}
