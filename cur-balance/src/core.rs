//! Core module for balancing the two classes of a curated dataset
//!
//! The larger class is shuffled with a seeded generator and truncated
//! to `floor(|minority| * factor)` elements. The smaller class is never
//! touched, and neither is the larger one when it already fits the cap.

use anyhow::Result;
use config::{check_factor, CurationError};
use cur_pack::{unpack, RecordBatch};
use log::{info, warn};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::Serialize;

use crate::cli::Args;
use crate::writer::{write_dataset, DatasetPaths, Label};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BalanceStats {
    pub factor: f64,
    pub seed: u64,
    pub positives_in: usize,
    pub negatives_in: usize,
    pub positives_out: usize,
    pub negatives_out: usize,
    pub downsampled: Option<Label>,
}

/// Downsamples the majority class
///
/// # Arguments
///
/// * `positives` - positive class, in generation order
/// * `negatives` - negative class, in generation order
/// * `factor` - allowed majority/minority ratio, at least 1.0
/// * `seed` - seed for the shuffle that picks the kept majority items
///
/// # Returns
///
/// * `(positives, negatives)` - the balanced classes
///
/// # Example
///
/// ```rust
/// use cur_balance::core::balance;
///
/// let positives = vec![1, 2, 3];
/// let negatives = (0..10).collect::<Vec<_>>();
///
/// let (pos, neg) = balance(positives, negatives, 2.0, 42).unwrap();
/// assert_eq!(pos, vec![1, 2, 3]);
/// assert_eq!(neg.len(), 6);
/// ```
pub fn balance<T>(
    positives: Vec<T>,
    negatives: Vec<T>,
    factor: f64,
    seed: u64,
) -> Result<(Vec<T>, Vec<T>), CurationError> {
    let (positives, negatives, _) = balance_with_stats(positives, negatives, factor, seed)?;
    Ok((positives, negatives))
}

pub fn balance_with_stats<T>(
    positives: Vec<T>,
    negatives: Vec<T>,
    factor: f64,
    seed: u64,
) -> Result<(Vec<T>, Vec<T>, BalanceStats), CurationError> {
    let factor = check_factor(factor)?;
    let mut rng = StdRng::seed_from_u64(seed);

    let (positives_in, negatives_in) = (positives.len(), negatives.len());
    if positives_in == 0 || negatives_in == 0 {
        warn!(
            "WARN: empty class [positives: {}, negatives: {}]",
            positives_in, negatives_in
        );
    }

    // ties leave both classes untouched since the cap is never below the size
    let (positives, negatives, downsampled) = if positives_in < negatives_in {
        let (negatives, cut) = downsample(negatives, positives_in, factor, &mut rng);
        (positives, negatives, cut.then_some(Label::Negative))
    } else {
        let (positives, cut) = downsample(positives, negatives_in, factor, &mut rng);
        (positives, negatives, cut.then_some(Label::Positive))
    };

    let stats = BalanceStats {
        factor,
        seed,
        positives_in,
        negatives_in,
        positives_out: positives.len(),
        negatives_out: negatives.len(),
        downsampled,
    };

    info!(
        "Balanced classes [factor {}, seed {}]: positives {} -> {}, negatives {} -> {}",
        factor, seed, positives_in, stats.positives_out, negatives_in, stats.negatives_out
    );

    Ok((positives, negatives, stats))
}

/// shuffle + truncate, only when the cap actually bites
fn downsample<T>(
    mut majority: Vec<T>,
    minority: usize,
    factor: f64,
    rng: &mut StdRng,
) -> (Vec<T>, bool) {
    let cap = (minority as f64 * factor).floor() as usize;
    if cap >= majority.len() {
        return (majority, false);
    }

    majority.shuffle(rng);
    majority.truncate(cap);

    (majority, true)
}

/// Balances two already curated sources and writes the dataset pair
pub fn balance_sources(args: Args) -> Result<(BalanceStats, DatasetPaths)> {
    let positives = RecordBatch::flatten(unpack(&args.positive, &args.tag_prefix)?);
    let negatives = RecordBatch::flatten(unpack(&args.negative, &args.tag_prefix)?);

    let (positives, negatives, stats) =
        balance_with_stats(positives, negatives, args.factor, args.seed)?;

    let paths = write_dataset(positives, negatives, &args.outdir, &args.prefix)?;
    Ok((stats, paths))
}
