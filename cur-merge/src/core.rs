//! Core module for collapsing duplicate sequences across sources
//!
//! Records are keyed by their sequence content. The first time a
//! sequence shows up it becomes the canonical entry; every later record
//! with the same content only contributes its annotation tags, unless
//! the active `RetentionPolicy` says its descriptive fields win.

use std::collections::BTreeSet;

use anyhow::Result;
use config::{publish, write_report, RetentionPolicy, MERGED, MERGE_REPORT, TOP_TAGS};
use cur_pack::{fasta_bytes, unpack, Record, RecordBatch};
use hashbrown::HashMap;
use indexmap::map::Entry;
use indexmap::IndexMap;
use log::info;
use serde::Serialize;

use crate::cli::Args;

#[derive(Debug, Clone, PartialEq)]
struct Canonical {
    record: Record,
    // tag count of the record that supplied identifier/description
    provider_tags: usize,
    // indices of the batches holding this sequence
    seen_in: BTreeSet<usize>,
}

/// Insertion-ordered `sequence -> canonical record` mapping
#[derive(Debug, Clone, PartialEq)]
pub struct MergedCollection {
    entries: IndexMap<String, Canonical>,
    batches: Vec<String>,
    policy: RetentionPolicy,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchStats {
    pub name: String,
    pub records: usize,
    pub added: usize,
    pub already_present: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceOverlap {
    pub a: String,
    pub b: String,
    pub shared: usize,
}

/// number of canonical sequences carrying one annotation tag
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TagCount {
    pub tag: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MergeStats {
    pub policy: RetentionPolicy,
    pub total: usize,
    pub unique: usize,
    pub removed: usize,
    // canonical sequences with at least one annotation tag
    pub tagged: usize,
    pub top_tags: Vec<TagCount>,
    pub batches: Vec<BatchStats>,
    pub overlaps: Vec<SourceOverlap>,
}

impl MergedCollection {
    pub fn new(policy: RetentionPolicy) -> Self {
        Self {
            entries: IndexMap::new(),
            batches: Vec::new(),
            policy,
        }
    }

    /// Folds one source batch into the collection
    ///
    /// # Arguments
    ///
    /// * `batch` - records of a single source
    ///
    /// # Returns
    ///
    /// * `BatchStats` - how many records were new and how many
    ///   collapsed into an existing canonical entry
    pub fn fold_batch(&mut self, batch: RecordBatch) -> BatchStats {
        let idx = self.batches.len();
        let records = batch.records.len();
        let mut already_present = 0;

        for record in batch.records {
            match self.entries.entry(record.sequence.clone()) {
                Entry::Vacant(slot) => {
                    slot.insert(Canonical {
                        provider_tags: record.annotation_tags.len(),
                        seen_in: BTreeSet::from([idx]),
                        record,
                    });
                }
                Entry::Occupied(mut slot) => {
                    already_present += 1;
                    let canonical = slot.get_mut();
                    canonical.seen_in.insert(idx);

                    let incoming_tags = record.annotation_tags.len();
                    let replace = match self.policy {
                        RetentionPolicy::FirstSeen => false,
                        RetentionPolicy::LastSeen => true,
                        RetentionPolicy::MostAnnotated => incoming_tags > canonical.provider_tags,
                    };

                    if replace {
                        canonical.record.identifier = record.identifier;
                        canonical.record.description = record.description;
                        canonical.provider_tags = incoming_tags;
                    }

                    canonical.record.annotation_tags.extend(record.annotation_tags);
                }
            }
        }

        info!(
            "{}: {} sequences. {} were already there",
            batch.name, records, already_present
        );

        self.batches.push(batch.name.clone());

        BatchStats {
            name: batch.name,
            records,
            added: records - already_present,
            already_present,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn policy(&self) -> RetentionPolicy {
        self.policy
    }

    pub fn contains(&self, sequence: &str) -> bool {
        self.entries.contains_key(sequence)
    }

    pub fn get(&self, sequence: &str) -> Option<&Record> {
        self.entries.get(sequence).map(|c| &c.record)
    }

    /// canonical records in first-seen order
    pub fn records(&self) -> impl Iterator<Item = &Record> {
        self.entries.values().map(|c| &c.record)
    }

    pub fn into_records(self) -> Vec<Record> {
        self.entries.into_values().map(|c| c.record).collect()
    }

    /// Annotation summary over canonical entries
    ///
    /// # Returns
    ///
    /// * `(tagged, top)` - how many sequences carry any tag, and the
    ///   `n` most frequent tags; ties are broken by tag name
    pub fn tag_summary(&self, n: usize) -> (usize, Vec<TagCount>) {
        let mut counts: HashMap<&str, usize> = HashMap::new();
        let mut tagged = 0;

        for canonical in self.entries.values() {
            let tags = &canonical.record.annotation_tags;
            if !tags.is_empty() {
                tagged += 1;
            }
            for tag in tags.iter() {
                *counts.entry(tag.as_str()).or_insert(0) += 1;
            }
        }

        let mut top = counts
            .into_iter()
            .map(|(tag, count)| TagCount {
                tag: tag.to_string(),
                count,
            })
            .collect::<Vec<_>>();
        top.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.tag.cmp(&b.tag)));
        top.truncate(n);

        (tagged, top)
    }

    /// number of shared sequences between every pair of folded batches
    pub fn source_overlaps(&self) -> Vec<SourceOverlap> {
        let n = self.batches.len();
        let mut shared = vec![vec![0usize; n]; n];

        for canonical in self.entries.values() {
            let seen = canonical.seen_in.iter().copied().collect::<Vec<_>>();
            for (i, a) in seen.iter().enumerate() {
                for b in seen[i + 1..].iter() {
                    shared[*a][*b] += 1;
                }
            }
        }

        let mut overlaps = Vec::new();
        for a in 0..n {
            for b in (a + 1)..n {
                overlaps.push(SourceOverlap {
                    a: self.batches[a].clone(),
                    b: self.batches[b].clone(),
                    shared: shared[a][b],
                });
            }
        }

        overlaps
    }
}

/// Collapses records sharing identical sequence content
///
/// # Arguments
///
/// * `batches` - one record collection per source, in fold order
/// * `policy` - which duplicate provides identifier and description
///
/// # Returns
///
/// * `(MergedCollection, MergeStats)` - the canonical collection and
///   the per-source bookkeeping
///
/// # Example
///
/// ```rust
/// use config::RetentionPolicy;
/// use cur_merge::core::merge;
/// use cur_pack::{Record, RecordBatch};
///
/// let a = RecordBatch::new("a.fasta", vec![Record::new("MKV").with_tags(["MIM:1"])]);
/// let b = RecordBatch::new("b.fasta", vec![Record::new("MKV").with_tags(["MIM:2"])]);
///
/// let (merged, stats) = merge(vec![a, b], RetentionPolicy::FirstSeen);
/// assert_eq!(merged.len(), 1);
/// assert_eq!(stats.removed, 1);
/// assert_eq!(merged.get("MKV").unwrap().annotation_tags.len(), 2);
/// ```
pub fn merge(batches: Vec<RecordBatch>, policy: RetentionPolicy) -> (MergedCollection, MergeStats) {
    let mut merged = MergedCollection::new(policy);
    let batch_stats = batches
        .into_iter()
        .map(|batch| merged.fold_batch(batch))
        .collect::<Vec<_>>();

    let total = batch_stats.iter().map(|b| b.records).sum::<usize>();
    let unique = merged.len();

    info!(
        "Merged {} records into {} unique sequences [{} duplicates removed]",
        total,
        unique,
        total - unique
    );

    let (tagged, top_tags) = merged.tag_summary(TOP_TAGS);
    info!("Sequences with annotation tags: {}/{}", tagged, unique);
    for entry in top_tags.iter() {
        info!("  {}: {}", entry.tag, entry.count);
    }

    let stats = MergeStats {
        policy,
        total,
        unique,
        removed: total - unique,
        tagged,
        top_tags,
        batches: batch_stats,
        overlaps: merged.source_overlaps(),
    };

    (merged, stats)
}

/// Merges every source and writes the canonical collection
///
/// # Arguments
///
/// * `args` - The command line arguments
///
/// # Returns
///
/// * `Result<MergeStats>` - bookkeeping of the merge
pub fn merge_sources(args: Args) -> Result<MergeStats> {
    info!("Merging {} sources...", args.sources.len());

    let batches = unpack(&args.sources, &args.tag_prefix)?;
    let (merged, stats) = merge(batches, args.keep);

    std::fs::create_dir_all(&args.outdir)?;
    publish(&[(args.outdir.join(MERGED), fasta_bytes(merged.records()))])?;
    write_report(&stats, args.outdir.join(MERGE_REPORT))?;

    info!("Merged successfully into {:?}", args.outdir.join(MERGED));
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use std::io::Write;

    fn rec(seq: &str, id: &str, tags: &[&str]) -> Record {
        Record::new(seq)
            .with_identifier(id)
            .with_tags(tags.iter().copied())
    }

    fn tag_map(merged: &MergedCollection) -> BTreeMap<String, BTreeSet<String>> {
        merged
            .records()
            .map(|r| (r.sequence.clone(), r.annotation_tags.clone()))
            .collect()
    }

    fn sources() -> (RecordBatch, RecordBatch) {
        let a = RecordBatch::new(
            "uniprot.fasta",
            vec![
                rec("MKV", "A1", &["MIM:1"]),
                rec("GGA", "A2", &[]),
                rec("MKV", "A3", &["MIM:2"]),
            ],
        );
        let b = RecordBatch::new(
            "dbptm.fasta",
            vec![rec("GGA", "B1", &["MIM:3"]), rec("TTP", "B2", &["MIM:4", "MIM:5"])],
        );
        (a, b)
    }

    #[test]
    fn test_merge_collapses_duplicates_and_unions_tags() {
        let (a, b) = sources();
        let (merged, stats) = merge(vec![a, b], RetentionPolicy::FirstSeen);

        assert_eq!(merged.len(), 3);
        assert_eq!(stats.total, 5);
        assert_eq!(stats.removed, 2);
        assert_eq!(stats.total - merged.len(), stats.removed);

        let mkv = merged.get("MKV").unwrap();
        assert_eq!(mkv.identifier.as_deref(), Some("A1"));
        assert_eq!(mkv.annotation_tags.len(), 2);

        let gga = merged.get("GGA").unwrap();
        assert_eq!(gga.identifier.as_deref(), Some("A2"));
        assert!(gga.annotation_tags.contains("MIM:3"));
    }

    #[test]
    fn test_merge_keeps_first_seen_order() {
        let (a, b) = sources();
        let (merged, _) = merge(vec![a, b], RetentionPolicy::FirstSeen);

        let order = merged.records().map(|r| r.sequence.as_str()).collect::<Vec<_>>();
        assert_eq!(order, vec!["MKV", "GGA", "TTP"]);
    }

    #[test]
    fn test_merge_batch_stats() {
        let (a, b) = sources();
        let (_, stats) = merge(vec![a, b], RetentionPolicy::FirstSeen);

        assert_eq!(stats.batches[0].added, 2);
        assert_eq!(stats.batches[0].already_present, 1);
        assert_eq!(stats.batches[1].added, 1);
        assert_eq!(stats.batches[1].already_present, 1);
        assert_eq!(
            stats.batches.iter().map(|b| b.already_present).sum::<usize>(),
            stats.removed
        );
    }

    #[test]
    fn test_merge_is_idempotent() {
        let (a, _) = sources();
        let (once, _) = merge(vec![a.clone()], RetentionPolicy::FirstSeen);
        let (twice, stats) = merge(vec![a.clone(), a], RetentionPolicy::FirstSeen);

        assert_eq!(once.len(), twice.len());
        assert_eq!(tag_map(&once), tag_map(&twice));
        assert_eq!(
            once.records().collect::<Vec<_>>(),
            twice.records().collect::<Vec<_>>()
        );
        assert_eq!(stats.removed, stats.total - once.len());
    }

    #[test]
    fn test_merge_tags_are_order_independent() {
        let (a, b) = sources();
        let (ab, _) = merge(vec![a.clone(), b.clone()], RetentionPolicy::FirstSeen);
        let (ba, _) = merge(vec![b, a], RetentionPolicy::FirstSeen);

        assert_eq!(tag_map(&ab), tag_map(&ba));
        // identifier retention is order sensitive under first-seen
        assert_eq!(ab.get("GGA").unwrap().identifier.as_deref(), Some("A2"));
        assert_eq!(ba.get("GGA").unwrap().identifier.as_deref(), Some("B1"));
    }

    #[test]
    fn test_merge_last_seen_policy() {
        let (a, b) = sources();
        let (merged, _) = merge(vec![a, b], RetentionPolicy::LastSeen);

        assert_eq!(merged.get("MKV").unwrap().identifier.as_deref(), Some("A3"));
        assert_eq!(merged.get("GGA").unwrap().identifier.as_deref(), Some("B1"));
        assert_eq!(merged.get("MKV").unwrap().annotation_tags.len(), 2);
    }

    #[test]
    fn test_merge_most_annotated_policy() {
        let batch = RecordBatch::new(
            "mixed.fasta",
            vec![
                rec("MKV", "few", &["MIM:1"]),
                rec("MKV", "many", &["MIM:2", "MIM:3"]),
                rec("MKV", "tie", &["MIM:4", "MIM:5"]),
            ],
        );
        let (merged, _) = merge(vec![batch], RetentionPolicy::MostAnnotated);

        let mkv = merged.get("MKV").unwrap();
        assert_eq!(mkv.identifier.as_deref(), Some("many"));
        assert_eq!(mkv.annotation_tags.len(), 5);
    }

    #[test]
    fn test_merge_without_batches() {
        let (merged, stats) = merge(Vec::new(), RetentionPolicy::FirstSeen);

        assert!(merged.is_empty());
        assert_eq!(stats.total, 0);
        assert_eq!(stats.removed, 0);
        assert!(stats.overlaps.is_empty());
    }

    #[test]
    fn test_source_overlaps() {
        let a = RecordBatch::new("a", vec![rec("X", "1", &[]), rec("Y", "2", &[])]);
        let b = RecordBatch::new("b", vec![rec("Y", "3", &[]), rec("Z", "4", &[])]);
        let c = RecordBatch::new("c", vec![rec("X", "5", &[]), rec("Y", "6", &[])]);
        let (_, stats) = merge(vec![a, b, c], RetentionPolicy::FirstSeen);

        let shared = stats
            .overlaps
            .iter()
            .map(|o| ((o.a.as_str(), o.b.as_str()), o.shared))
            .collect::<BTreeMap<_, _>>();

        assert_eq!(shared[&("a", "b")], 1);
        assert_eq!(shared[&("a", "c")], 2);
        assert_eq!(shared[&("b", "c")], 1);
    }

    #[test]
    fn test_merge_sources_writes_merged_fasta() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("databases");
        std::fs::create_dir_all(&src).unwrap();

        let mut f = std::fs::File::create(src.join("a.fasta")).unwrap();
        write!(f, ">P1 kinase MIM:1\nMKV\n>P2\nGGA\n").unwrap();
        let mut f = std::fs::File::create(src.join("b.fasta")).unwrap();
        write!(f, ">Q1 MIM:2\nMKV\n").unwrap();

        let outdir = dir.path().join("out");
        let args = Args {
            sources: vec![src],
            outdir: outdir.clone(),
            keep: RetentionPolicy::FirstSeen,
            tag_prefix: vec!["MIM".to_string()],
            threads: 1,
        };

        let stats = merge_sources(args).unwrap();
        assert_eq!(stats.removed, 1);

        let merged = std::fs::read_to_string(outdir.join(MERGED)).unwrap();
        assert_eq!(merged, ">P1 kinase MIM:1 MIM:2\nMKV\n>P2\nGGA\n");
        assert!(outdir.join(MERGE_REPORT).exists());
    }

    #[test]
    fn test_tag_summary_counts_canonical_entries() {
        let (a, b) = sources();
        let c = RecordBatch::new(
            "glyconnect.fasta",
            vec![
                rec("WWY", "C1", &["MIM:4"]),
                // duplicate of TTP, its tags are already there
                rec("TTP", "C2", &["MIM:4"]),
                rec("PPP", "C3", &[]),
            ],
        );
        let (_, stats) = merge(vec![a, b, c], RetentionPolicy::FirstSeen);

        // MKV {1,2}, GGA {3}, TTP {4,5}, WWY {4}, PPP {}
        assert_eq!(stats.unique, 5);
        assert_eq!(stats.tagged, 4);
        assert_eq!(
            stats.top_tags[0],
            TagCount {
                tag: "MIM:4".to_string(),
                count: 2
            }
        );
        let rest = stats.top_tags[1..]
            .iter()
            .map(|t| (t.tag.as_str(), t.count))
            .collect::<Vec<_>>();
        assert_eq!(
            rest,
            vec![("MIM:1", 1), ("MIM:2", 1), ("MIM:3", 1), ("MIM:5", 1)]
        );
    }

    #[test]
    fn test_tag_summary_is_truncated() {
        let (a, b) = sources();
        let (merged, _) = merge(vec![a, b], RetentionPolicy::FirstSeen);

        let (tagged, top) = merged.tag_summary(2);
        assert_eq!(tagged, 3);
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].tag, "MIM:1");

        let (tagged, top) = MergedCollection::new(RetentionPolicy::FirstSeen).tag_summary(10);
        assert_eq!(tagged, 0);
        assert!(top.is_empty());
    }
}
