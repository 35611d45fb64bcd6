//! Core module for balancing and writing a curated dataset
//!
//! The class balancer downsamples the majority class with a seeded
//! shuffle; the dataset writer renders the result as two index-aligned
//! artifacts, a FASTA file with synthetic `Seq<n>` headers and a label
//! file with one `1`/`0` per record.

pub mod cli;
pub mod core;
pub mod writer;

pub use crate::core::{balance, balance_with_stats, BalanceStats};
pub use crate::writer::{write_dataset, CuratedDataset, DatasetPaths, Label};

use config::ArgCheck;

pub fn lib_cur_balance(args: Vec<String>) -> anyhow::Result<DatasetPaths> {
    let args = cli::Args::from(args);
    args.check()?;

    let (_, paths) =
        cur_pack::thread_pool(args.threads)?.install(|| crate::core::balance_sources(args))?;
    Ok(paths)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lib_cur_balance_honours_threads() {
        let dir = tempfile::tempdir().unwrap();
        let positive = dir.path().join("glyco.fasta");
        let negative = dir.path().join("no_glyco.fasta");
        std::fs::write(&positive, ">P1\nMKV\n").unwrap();
        std::fs::write(&negative, ">N1\nGGA\n>N2\nTTP\n>N3\nWWY\n").unwrap();

        let paths = lib_cur_balance(vec![
            "--positive".to_string(),
            positive.display().to_string(),
            "--negative".to_string(),
            negative.display().to_string(),
            "--factor".to_string(),
            "2".to_string(),
            "--outdir".to_string(),
            dir.path().join("out").display().to_string(),
            "--threads".to_string(),
            "1".to_string(),
        ])
        .unwrap();

        assert_eq!(std::fs::read_to_string(&paths.labels).unwrap(), "1\n0\n0");
    }
}
