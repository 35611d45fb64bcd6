//! Shared configuration for the curatools workspace
//!
//! Universal constants, default parameters, error types and small
//! I/O helpers used by every cur-* tool and by the `curatools` entry.
//! Every default lives here as a plain constant; tools receive their
//! effective values through explicit arguments, never through globals.

pub mod fns;
pub mod mods;

pub use fns::*;
pub use mods::*;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// numeric values
pub const MIN_THREADS: usize = 1;
pub const DEFAULT_FACTOR: f64 = 1.0;
pub const DEFAULT_PERCENTILE: f64 = 95.0;
pub const DEFAULT_SEED: u64 = 42;

// header parsing
pub const DEFAULT_TAG_PREFIX: &str = "MIM";
pub const TAG_SEPARATOR: char = ':';
pub const SYNTHETIC_ID: &str = "Seq";

// file names
pub const MERGED: &str = "merged.fasta";
pub const SEQS: &str = "seqs.fasta";
pub const CLASSES: &str = "classes.txt";
pub const FILTERED: &str = "filtered.fasta";
pub const LENGTH_FILTERED: &str = "length_filtered.fasta";
pub const MERGE_REPORT: &str = "merge_report.json";
pub const CURATION_REPORT: &str = "curation_report.json";

// inputs
pub const FASTA_SUFFIXES: [&str; 6] = [".fa", ".fasta", ".faa", ".fa.gz", ".fasta.gz", ".faa.gz"];
pub const GZ_SUFFIX: &str = ".gz";
pub const TOP_TAGS: usize = 10;

// names (or name endings, once a prefix is prepended) of files written
// by the tools themselves; never read back as sources
pub const SKIPPED_INPUTS: [&str; 4] = [MERGED, SEQS, FILTERED, LENGTH_FILTERED];
