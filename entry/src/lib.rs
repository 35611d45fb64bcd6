//! curatools: curation of balanced sequence datasets
//!
//! This is the library behind the `curatools run` subcommand. It chains
//! every step of the curation engine over one positive and one negative
//! set of sources:
//!
//! - cur-merge: collapse duplicate sequences, union their tags
//! - cur-filter: drop length outliers, then false negatives
//! - cur-balance: downsample the majority class and write the dataset
//!
//! Every parameter arrives through an explicit `CurationConfig`; the
//! run is deterministic for a fixed seed and input order.

pub mod cli;

use std::path::PathBuf;

use config::{
    check_factor, check_percentile, write_report, CurationError, RetentionPolicy,
    CURATION_REPORT, DEFAULT_FACTOR, DEFAULT_PERCENTILE, DEFAULT_SEED, DEFAULT_TAG_PREFIX,
};
use cur_balance::{balance_with_stats, write_dataset, BalanceStats, DatasetPaths};
use cur_filter::{filter_by_cutoff, length_cutoff, remove_false_negatives_with_stats};
use cur_filter::{LengthStats, NegativeStats};
use cur_merge::{merge, MergeStats};
use cur_pack::unpack;
use log::info;
use serde::Serialize;

/// Everything a curation run needs to know
#[derive(Debug, Clone, PartialEq)]
pub struct CurationConfig {
    pub positive: Vec<PathBuf>,
    pub negative: Vec<PathBuf>,
    pub factor: f64,
    pub percentile: f64,
    pub seed: u64,
    pub outdir: PathBuf,
    pub prefix: String,
    pub keep: RetentionPolicy,
    pub tag_prefix: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CurationReport {
    pub positive_merge: MergeStats,
    pub negative_merge: MergeStats,
    pub positive_length: LengthStats,
    pub negative_length: LengthStats,
    pub false_negatives: NegativeStats,
    pub balance: BalanceStats,
    pub outputs: DatasetPaths,
}

impl Default for CurationConfig {
    fn default() -> Self {
        Self {
            positive: Vec::new(),
            negative: Vec::new(),
            factor: DEFAULT_FACTOR,
            percentile: DEFAULT_PERCENTILE,
            seed: DEFAULT_SEED,
            outdir: PathBuf::from("."),
            prefix: String::new(),
            keep: RetentionPolicy::default(),
            tag_prefix: vec![DEFAULT_TAG_PREFIX.to_string()],
        }
    }
}

impl CurationConfig {
    pub fn new(positive: Vec<PathBuf>, negative: Vec<PathBuf>) -> Self {
        Self {
            positive,
            negative,
            ..Default::default()
        }
    }

    /// Rejects the run before anything is read or written
    pub fn validate(&self) -> Result<(), CurationError> {
        check_factor(self.factor)?;
        check_percentile(self.percentile)?;

        if self.positive.is_empty() {
            return Err(CurationError::InvalidInput(
                "no positive sources provided".to_string(),
            ));
        }

        if self.negative.is_empty() {
            return Err(CurationError::InvalidInput(
                "no negative sources provided".to_string(),
            ));
        }

        for path in self.positive.iter().chain(self.negative.iter()) {
            if !path.exists() {
                return Err(CurationError::MissingPath(path.clone()));
            }
        }

        Ok(())
    }
}

/// Runs the whole curation engine
///
/// # Arguments
///
/// * `config` - sources, parameters and output location
///
/// # Returns
///
/// * `Result<CurationReport, CurationError>` - counts of every stage;
///   the report is also written next to the dataset
///
/// # Example
///
/// ```rust, no_run
/// use curatools::{curate, CurationConfig};
/// use std::path::PathBuf;
///
/// let mut config = CurationConfig::new(
///     vec![PathBuf::from("data/ptms/glycosylation/databases")],
///     vec![PathBuf::from("data/no_ptm/no_glycosylation.fasta")],
/// );
/// config.factor = 1.5;
///
/// let report = curate(&config).unwrap();
/// ```
pub fn curate(config: &CurationConfig) -> Result<CurationReport, CurationError> {
    config.validate()?;

    // every source is parsed before anything touches the disk
    let positive_batches = unpack(&config.positive, &config.tag_prefix)?;
    let negative_batches = unpack(&config.negative, &config.tag_prefix)?;

    info!("Merging positive sources...");
    let (positives, positive_merge) = merge(positive_batches, config.keep);
    info!("Merging negative sources...");
    let (negatives, negative_merge) = merge(negative_batches, config.keep);

    let positives = positives.into_records();
    let negatives = negatives.into_records();

    // the cutoff comes from the positives and bounds both classes
    let cutoff = length_cutoff(&positives, config.percentile)?;
    let (negatives, negative_length) = filter_by_cutoff(negatives, cutoff, config.percentile);
    cur_filter::core::length::report(&negative_length);

    let (negatives, false_negatives) = remove_false_negatives_with_stats(&positives, negatives);

    let (positives, positive_length) = filter_by_cutoff(positives, cutoff, config.percentile);
    cur_filter::core::length::report(&positive_length);

    let (positives, negatives, balance) =
        balance_with_stats(positives, negatives, config.factor, config.seed)?;

    let outputs = write_dataset(positives, negatives, &config.outdir, &config.prefix)?;

    let report = CurationReport {
        positive_merge,
        negative_merge,
        positive_length,
        negative_length,
        false_negatives,
        balance,
        outputs,
    };

    write_report(
        &report,
        config
            .outdir
            .join(format!("{}{}", config.prefix, CURATION_REPORT)),
    )?;

    Ok(report)
}
