use anyhow::Result;
use config::{check_percentile, publish, CurationError, LENGTH_FILTERED};
use cur_pack::{fasta_bytes, unpack, Record, RecordBatch};
use log::{info, warn};
use serde::Serialize;

use crate::cli::LengthArgs;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LengthStats {
    pub percentile: f64,
    pub cutoff: Option<f64>,
    pub before: usize,
    pub after: usize,
    pub removed: usize,
    pub max_before: usize,
    pub max_after: usize,
}

/// Percentile of a set of lengths, linearly interpolated between the
/// two closest ranks. `None` for an empty set.
///
/// # Example
///
/// ```rust
/// use cur_filter::core::length::percentile;
///
/// assert_eq!(percentile(&[10, 20, 30, 40], 50.0), Some(25.0));
/// assert_eq!(percentile(&[], 95.0), None);
/// ```
pub fn percentile(values: &[usize], pct: f64) -> Option<f64> {
    if values.is_empty() {
        return None;
    }

    let mut sorted = values.to_vec();
    sorted.sort_unstable();

    let rank = pct / 100.0 * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    let frac = rank - lo as f64;

    Some(sorted[lo] as f64 + (sorted[hi] as f64 - sorted[lo] as f64) * frac)
}

/// length cutoff derived from the records themselves
pub fn length_cutoff(records: &[Record], pct: f64) -> Result<Option<f64>, CurationError> {
    let pct = check_percentile(pct)?;
    let lengths = records.iter().map(Record::len).collect::<Vec<_>>();

    Ok(percentile(&lengths, pct))
}

/// Keeps records with `len(sequence) <= cutoff`
///
/// A missing cutoff (empty reference distribution) keeps everything.
///
/// # Arguments
///
/// * `records` - records to filter, order is preserved
/// * `cutoff` - maximum allowed length
/// * `pct` - percentile the cutoff came from, reporting only
pub fn filter_by_cutoff(
    records: Vec<Record>,
    cutoff: Option<f64>,
    pct: f64,
) -> (Vec<Record>, LengthStats) {
    let before = records.len();
    let max_before = max_len(&records);

    let kept = match cutoff {
        Some(cutoff) => records
            .into_iter()
            .filter(|record| record.len() as f64 <= cutoff)
            .collect::<Vec<_>>(),
        None => records,
    };

    let stats = LengthStats {
        percentile: pct,
        cutoff,
        before,
        after: kept.len(),
        removed: before - kept.len(),
        max_before,
        max_after: max_len(&kept),
    };

    (kept, stats)
}

/// Removes length outliers above the given percentile
///
/// The cutoff is recomputed from the input on every call, so it adapts
/// to whatever length distribution the current sources have.
///
/// # Returns
///
/// * `(kept, cutoff)` - surviving records in input order and the cutoff
///   used; `None` when the input was empty
pub fn filter_by_length(
    records: Vec<Record>,
    pct: f64,
) -> Result<(Vec<Record>, Option<f64>), CurationError> {
    let cutoff = length_cutoff(&records, pct)?;
    let (kept, stats) = filter_by_cutoff(records, cutoff, pct);
    report(&stats);

    Ok((kept, cutoff))
}

pub fn report(stats: &LengthStats) {
    match stats.cutoff {
        Some(cutoff) => info!(
            "Length cutoff [p{}]: {:.2} | kept {}/{} | max length {} -> {}",
            stats.percentile, cutoff, stats.after, stats.before, stats.max_before, stats.max_after
        ),
        None => warn!("WARN: no sequences to derive a length cutoff from"),
    }
}

fn max_len(records: &[Record]) -> usize {
    records.iter().map(Record::len).max().unwrap_or(0)
}

/// Length-filters every input source and writes the survivors
pub fn length_filter(args: LengthArgs) -> Result<LengthStats> {
    let records = RecordBatch::flatten(unpack(&args.input, &args.tag_prefix)?);

    let cutoff = length_cutoff(&records, args.percentile)?;
    let (kept, stats) = filter_by_cutoff(records, cutoff, args.percentile);
    report(&stats);

    std::fs::create_dir_all(&args.outdir)?;
    publish(&[(args.outdir.join(LENGTH_FILTERED), fasta_bytes(&kept))])?;

    Ok(stats)
}
