use config::{publish, CurationError, CLASSES, SEQS, SYNTHETIC_ID};
use cur_pack::Record;
use log::info;
use serde::Serialize;

use std::io::{self, Write};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Label {
    Negative = 0,
    Positive = 1,
}

impl Label {
    pub fn as_char(&self) -> char {
        match self {
            Label::Negative => '0',
            Label::Positive => '1',
        }
    }
}

/// Ordered `(sequence, label)` pairs: positives first, negatives after.
///
/// Both artifacts are rendered from this single list, so the i-th
/// label always belongs to the i-th sequence record.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CuratedDataset {
    entries: Vec<(String, Label)>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DatasetPaths {
    pub sequences: PathBuf,
    pub labels: PathBuf,
}

impl CuratedDataset {
    pub fn from_classes(positives: Vec<Record>, negatives: Vec<Record>) -> Self {
        let entries = positives
            .into_iter()
            .map(|record| (record.sequence, Label::Positive))
            .chain(
                negatives
                    .into_iter()
                    .map(|record| (record.sequence, Label::Negative)),
            )
            .collect();

        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[(String, Label)] {
        &self.entries
    }

    pub fn count(&self, label: Label) -> usize {
        self.entries.iter().filter(|(_, l)| *l == label).count()
    }

    /// `>Seq<n>` / sequence pairs, no trailing newline
    pub fn write_sequences<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        for (i, (sequence, _)) in self.entries.iter().enumerate() {
            if i > 0 {
                writer.write_all(b"\n")?;
            }
            write!(writer, ">{}{}\n{}", SYNTHETIC_ID, i + 1, sequence)?;
        }

        Ok(())
    }

    /// one label digit per line, no trailing newline
    pub fn write_labels<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        for (i, (_, label)) in self.entries.iter().enumerate() {
            if i > 0 {
                writer.write_all(b"\n")?;
            }
            write!(writer, "{}", label.as_char())?;
        }

        Ok(())
    }
}

/// Writes the balanced classes as `<prefix>seqs.fasta` and
/// `<prefix>classes.txt` inside `outdir`
///
/// Both files are published together: if either cannot be written,
/// neither appears and no temporary is left behind.
///
/// # Example
///
/// ```rust, no_run
/// use cur_balance::writer::write_dataset;
/// use cur_pack::Record;
///
/// let paths = write_dataset(vec![Record::new("MKV")], vec![Record::new("GGA")], "out", "").unwrap();
/// ```
pub fn write_dataset<P: AsRef<Path>>(
    positives: Vec<Record>,
    negatives: Vec<Record>,
    outdir: P,
    prefix: &str,
) -> Result<DatasetPaths, CurationError> {
    let dataset = CuratedDataset::from_classes(positives, negatives);

    let mut sequences = Vec::new();
    let mut labels = Vec::new();
    dataset.write_sequences(&mut sequences)?;
    dataset.write_labels(&mut labels)?;

    std::fs::create_dir_all(outdir.as_ref())?;
    let paths = DatasetPaths {
        sequences: outdir.as_ref().join(format!("{}{}", prefix, SEQS)),
        labels: outdir.as_ref().join(format!("{}{}", prefix, CLASSES)),
    };

    publish(&[
        (paths.sequences.clone(), sequences),
        (paths.labels.clone(), labels),
    ])?;

    info!(
        "Successfully saved {} records [{} positives, {} negatives] to {:?} and {:?}",
        dataset.len(),
        dataset.count(Label::Positive),
        dataset.count(Label::Negative),
        paths.sequences,
        paths.labels
    );

    Ok(paths)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dataset() -> CuratedDataset {
        CuratedDataset::from_classes(
            vec![Record::new("MKV"), Record::new("GGA")],
            vec![Record::new("TTP")],
        )
    }

    fn render(dataset: &CuratedDataset) -> (String, String) {
        let mut seqs = Vec::new();
        let mut labels = Vec::new();
        dataset.write_sequences(&mut seqs).unwrap();
        dataset.write_labels(&mut labels).unwrap();

        (String::from_utf8(seqs).unwrap(), String::from_utf8(labels).unwrap())
    }

    #[test]
    fn test_exact_artifact_bytes() {
        let (seqs, labels) = render(&dataset());

        assert_eq!(seqs, ">Seq1\nMKV\n>Seq2\nGGA\n>Seq3\nTTP");
        assert_eq!(labels, "1\n1\n0");
    }

    #[test]
    fn test_artifacts_are_aligned() {
        let (seqs, labels) = render(&dataset());

        let records = seqs.lines().filter(|l| l.starts_with('>')).count();
        assert_eq!(records, labels.lines().count());
        assert_eq!(dataset().count(Label::Positive), 2);
        assert_eq!(dataset().count(Label::Negative), 1);
    }

    #[test]
    fn test_empty_dataset_writes_empty_artifacts() {
        let (seqs, labels) = render(&CuratedDataset::default());

        assert!(seqs.is_empty());
        assert!(labels.is_empty());
    }

    #[test]
    fn test_only_negatives() {
        let dataset = CuratedDataset::from_classes(Vec::new(), vec![Record::new("AA")]);
        let (seqs, labels) = render(&dataset);

        assert_eq!(seqs, ">Seq1\nAA");
        assert_eq!(labels, "0");
    }

    #[test]
    fn test_write_dataset_with_prefix() {
        let dir = tempfile::tempdir().unwrap();
        let paths = write_dataset(
            vec![Record::new("MKV").with_identifier("P1")],
            vec![Record::new("GGA")],
            dir.path(),
            "uniprot_",
        )
        .unwrap();

        assert_eq!(paths.sequences, dir.path().join("uniprot_seqs.fasta"));
        assert_eq!(
            std::fs::read_to_string(&paths.sequences).unwrap(),
            ">Seq1\nMKV\n>Seq2\nGGA"
        );
        assert_eq!(std::fs::read_to_string(&paths.labels).unwrap(), "1\n0");
    }
}
