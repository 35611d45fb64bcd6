use anyhow::Result;
use config::{publish, FILTERED};
use cur_pack::{fasta_bytes, unpack, Record, RecordBatch};
use hashbrown::HashSet;
use log::info;
use serde::Serialize;

use crate::cli::NegativeArgs;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NegativeStats {
    pub positives: usize,
    pub candidates: usize,
    pub overlap: usize,
    pub kept: usize,
    pub retention_ratio: f64,
}

impl NegativeStats {
    pub fn new(positives: usize, candidates: usize, kept: usize) -> Self {
        let retention_ratio = if candidates == 0 {
            1.0
        } else {
            kept as f64 / candidates as f64
        };

        Self {
            positives,
            candidates,
            overlap: candidates - kept,
            kept,
            retention_ratio,
        }
    }
}

/// Drops negative candidates whose sequence is also a positive
///
/// # Arguments
///
/// * `positive_pool` - every record known to carry the positive label
/// * `negative_candidates` - records proposed as negatives
///
/// # Returns
///
/// * `(filtered, overlap)` - surviving negatives in their original
///   order and the number of candidates removed
///
/// # Example
///
/// ```rust
/// use cur_filter::core::negative::remove_false_negatives;
/// use cur_pack::Record;
///
/// let positives = vec![Record::new("MKV")];
/// let candidates = vec![Record::new("MKV"), Record::new("GGA")];
///
/// let (filtered, overlap) = remove_false_negatives(&positives, candidates);
/// assert_eq!(overlap, 1);
/// assert_eq!(filtered[0].sequence, "GGA");
/// ```
pub fn remove_false_negatives<'a, I>(
    positive_pool: I,
    negative_candidates: Vec<Record>,
) -> (Vec<Record>, usize)
where
    I: IntoIterator<Item = &'a Record>,
{
    let (filtered, stats) = remove_false_negatives_with_stats(positive_pool, negative_candidates);
    (filtered, stats.overlap)
}

pub fn remove_false_negatives_with_stats<'a, I>(
    positive_pool: I,
    negative_candidates: Vec<Record>,
) -> (Vec<Record>, NegativeStats)
where
    I: IntoIterator<Item = &'a Record>,
{
    let positives = positive_pool
        .into_iter()
        .map(|record| record.sequence.as_str())
        .collect::<HashSet<_>>();

    let candidates = negative_candidates.len();
    let filtered = negative_candidates
        .into_iter()
        .filter(|record| !positives.contains(record.sequence.as_str()))
        .collect::<Vec<_>>();

    let stats = NegativeStats::new(positives.len(), candidates, filtered.len());

    info!("Count of common sequences: {}", stats.overlap);
    info!(
        "Positives: {}, negatives: {}, before filter: {} [retention ratio {:.4}]",
        stats.positives, stats.kept, stats.candidates, stats.retention_ratio
    );

    (filtered, stats)
}

/// Removes false negatives from the negative sources and writes the rest
pub fn negative_filter(args: NegativeArgs) -> Result<NegativeStats> {
    let positives = RecordBatch::flatten(unpack(&args.positive, &args.tag_prefix)?);
    let candidates = RecordBatch::flatten(unpack(&args.negative, &args.tag_prefix)?);

    let (filtered, stats) = remove_false_negatives_with_stats(&positives, candidates);

    std::fs::create_dir_all(&args.outdir)?;
    publish(&[(args.outdir.join(FILTERED), fasta_bytes(&filtered))])?;

    info!("Removed common sequences and saved as {:?}", args.outdir.join(FILTERED));
    Ok(stats)
}
