//! Core module for removing records from a sequence pool
//!
//! This crate holds the two filtering steps of the curation engine.
//! The length filter drops sequences above a percentile of the
//! current length distribution; the negative filter removes candidate
//! negatives whose sequence also appears among the positives.

pub mod cli;
pub mod core;

pub use crate::core::length::{filter_by_cutoff, filter_by_length, length_cutoff, LengthStats};
pub use crate::core::negative::{
    remove_false_negatives, remove_false_negatives_with_stats, NegativeStats,
};

use config::ArgCheck;

pub fn lib_cur_filter(args: Vec<String>) -> anyhow::Result<()> {
    let args = cli::Args::from(args);
    let pool = cur_pack::thread_pool(args.threads)?;

    pool.install(|| -> anyhow::Result<()> {
        match args.command {
            cli::SubArgs::Length { args } => {
                args.check()?;
                crate::core::length::length_filter(args)?;
            }
            cli::SubArgs::Negative { args } => {
                args.check()?;
                crate::core::negative::negative_filter(args)?;
            }
        }

        Ok(())
    })?;

    log::info!("SUCCESS: cur-filter ran successfully!");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lib_cur_filter_honours_threads() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("glyco.fasta");
        std::fs::write(&input, ">P1\nMKV\n>P2\nMKVLLAGGTTPWWY\n>P3\nGGA\n").unwrap();

        lib_cur_filter(vec![
            "--threads".to_string(),
            "2".to_string(),
            "length".to_string(),
            "--input".to_string(),
            input.display().to_string(),
            "--percentile".to_string(),
            "50".to_string(),
            "--outdir".to_string(),
            dir.path().display().to_string(),
        ])
        .unwrap();

        let kept = std::fs::read_to_string(dir.path().join(config::LENGTH_FILTERED)).unwrap();
        assert_eq!(kept, ">P1\nMKV\n>P3\nGGA\n");
    }
}
