//! Record model and FASTA batch reading for curatools
//!
//! Every source handed to the curation engine is a FASTA file (plain
//! or gzipped) or a directory of them. Each file becomes one
//! `RecordBatch`; a file that cannot be parsed aborts the whole read,
//! partial batches are never returned.

use std::fmt::Debug;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use config::{collect_fasta_paths, file_name, is_gz, CurationError, MIN_THREADS};
use flate2::read::MultiGzDecoder;
use log::info;
use memchr::memchr_iter;
use rayon::prelude::*;

pub mod record;
pub use record::{is_sequence_byte, Record, RecordBatch};

const FA_NEEDLE: u8 = b'>';
const COMMENT: char = ';';

/// dedicated pool for one in-process tool run; never below `MIN_THREADS`
pub fn thread_pool(threads: usize) -> Result<rayon::ThreadPool, rayon::ThreadPoolBuildError> {
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads.max(MIN_THREADS))
        .build()
}

/// read a whole FASTA file, decompressing it if needed
pub fn reader<P: AsRef<Path> + Debug>(file: P) -> Result<String, CurationError> {
    let path = file.as_ref();
    let batch = file_name(path);
    let mut raw = Vec::new();

    let mut handle = File::open(path)?;
    if is_gz(path) {
        MultiGzDecoder::new(&mut handle)
            .read_to_end(&mut raw)
            .map_err(|e| CurationError::Parse {
                batch: batch.clone(),
                line: 0,
                reason: format!("corrupt gzip stream: {}", e),
            })?;
    } else {
        handle.read_to_end(&mut raw)?;
    }

    String::from_utf8(raw).map_err(|e| CurationError::Parse {
        batch,
        line: 0,
        reason: format!("content is not valid UTF-8: {}", e),
    })
}

/// read many files in parallel, keeping their order
pub fn par_reader<P: AsRef<Path> + Debug + Sync + Send>(
    files: &[P],
) -> Result<Vec<(String, String)>, CurationError> {
    files
        .par_iter()
        .map(|path| Ok((file_name(path.as_ref()), reader(path)?)))
        .collect()
}

/// Parses the content of one FASTA file into records.
///
/// Sequence lines are concatenated and stripped of whitespace.
/// Blank lines and ';' comment lines are skipped.
///
/// # Errors
///
/// * sequence data before the first header
/// * a header that is not followed by any sequence
/// * a character outside the sequence alphabet
pub fn parse_fasta(
    contents: &str,
    batch: &str,
    prefixes: &[String],
) -> Result<Vec<Record>, CurationError> {
    let expected = memchr_iter(FA_NEEDLE, contents.as_bytes()).count();
    let mut records = Vec::with_capacity(expected);

    // (header, header line number, accumulated sequence)
    let mut current: Option<(&str, usize, String)> = None;

    let malformed = |line: usize, reason: String| CurationError::Parse {
        batch: batch.to_string(),
        line,
        reason,
    };

    for (idx, line) in contents.lines().enumerate() {
        let lineno = idx + 1;
        let line = line.trim_end_matches('\r');

        if line.trim().is_empty() || line.starts_with(COMMENT) {
            continue;
        }

        if let Some(header) = line.strip_prefix('>') {
            if let Some((prev, at, seq)) = current.take() {
                records.push(finish(prev, seq, prefixes).map_err(|r| malformed(at, r))?);
            }
            current = Some((header.trim(), lineno, String::new()));
            continue;
        }

        match current.as_mut() {
            Some((_, _, seq)) => {
                for byte in line.bytes().filter(|b| !b.is_ascii_whitespace()) {
                    if !is_sequence_byte(byte) {
                        return Err(malformed(
                            lineno,
                            format!("unexpected character '{}' in sequence", byte as char),
                        ));
                    }
                    seq.push(byte as char);
                }
            }
            None => {
                return Err(malformed(
                    lineno,
                    "sequence data found before the first header".to_string(),
                ))
            }
        }
    }

    if let Some((prev, at, seq)) = current.take() {
        records.push(finish(prev, seq, prefixes).map_err(|r| malformed(at, r))?);
    }

    Ok(records)
}

fn finish(header: &str, sequence: String, prefixes: &[String]) -> Result<Record, String> {
    if sequence.is_empty() {
        return Err(format!("record '{}' has an empty sequence", header));
    }

    Ok(Record::from_header(header, sequence, prefixes))
}

/// Reads every FASTA file behind `sources` into one batch per file.
///
/// # Example
///
/// ```rust, no_run
/// use std::path::PathBuf;
///
/// let prefixes = vec!["MIM".to_string()];
/// let batches = cur_pack::unpack(&[PathBuf::from("data/glycosylation")], &prefixes).unwrap();
/// ```
pub fn unpack(sources: &[PathBuf], prefixes: &[String]) -> Result<Vec<RecordBatch>, CurationError> {
    let files = collect_fasta_paths(sources)?;
    let contents = par_reader(&files)?;

    let batches = contents
        .par_iter()
        .map(|(name, content)| {
            parse_fasta(content, name, prefixes).map(|records| RecordBatch::new(name, records))
        })
        .collect::<Result<Vec<_>, _>>()?;

    info!(
        "Records parsed: {} from {} files",
        batches.iter().map(RecordBatch::len).sum::<usize>(),
        batches.len()
    );

    Ok(batches)
}

/// standard FASTA bytes: one entry per record, newline terminated
pub fn fasta_bytes<'a, I>(records: I) -> Vec<u8>
where
    I: IntoIterator<Item = &'a Record>,
{
    let mut out = String::new();
    for (i, record) in records.into_iter().enumerate() {
        out.push_str(&record.fasta_entry(i + 1));
        out.push('\n');
    }

    out.into_bytes()
}
