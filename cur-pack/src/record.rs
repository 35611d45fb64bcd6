use config::{SYNTHETIC_ID, TAG_SEPARATOR};
use serde::{Deserialize, Serialize};

use std::collections::BTreeSet;

/// One biological sequence entry.
///
/// Two records with the same `sequence` are the same entity no matter
/// what their identifiers or tags say.
#[derive(Debug, PartialEq, Eq, Clone, Default, Serialize, Deserialize)]
pub struct Record {
    pub identifier: Option<String>,
    pub description: String,
    pub annotation_tags: BTreeSet<String>,
    pub sequence: String,
}

/// All records parsed from one source file
#[derive(Debug, PartialEq, Eq, Clone, Default)]
pub struct RecordBatch {
    pub name: String,
    pub records: Vec<Record>,
}

impl Record {
    pub fn new<S: Into<String>>(sequence: S) -> Self {
        Self {
            sequence: sequence.into(),
            ..Default::default()
        }
    }

    pub fn with_identifier<S: Into<String>>(mut self, identifier: S) -> Self {
        self.identifier = Some(identifier.into());
        self
    }

    pub fn with_description<S: Into<String>>(mut self, description: S) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.annotation_tags.extend(tags.into_iter().map(Into::into));
        self
    }

    /// Builds a record out of a FASTA header (without the leading '>')
    ///
    /// The first token is the identifier. Any later token shaped like
    /// `PREFIX:value` with a known prefix becomes an annotation tag;
    /// everything else is kept, in order, as the description.
    ///
    /// # Example
    ///
    /// ```rust
    /// use cur_pack::Record;
    ///
    /// let prefixes = vec!["MIM".to_string()];
    /// let record = Record::from_header("sp|P04637|P53_HUMAN Cellular tumor antigen p53 MIM:191170", "MEEPQ", &prefixes);
    ///
    /// assert_eq!(record.identifier.as_deref(), Some("sp|P04637|P53_HUMAN"));
    /// assert_eq!(record.description, "Cellular tumor antigen p53");
    /// assert!(record.annotation_tags.contains("MIM:191170"));
    /// ```
    pub fn from_header<S: Into<String>>(header: &str, sequence: S, prefixes: &[String]) -> Self {
        let mut tokens = header.split_whitespace();
        let identifier = tokens.next().map(str::to_string);

        let mut description = Vec::new();
        let mut annotation_tags = BTreeSet::new();
        for token in tokens {
            if is_tag(token, prefixes) {
                annotation_tags.insert(token.to_string());
            } else {
                description.push(token);
            }
        }

        Self {
            identifier,
            description: description.join(" "),
            annotation_tags,
            sequence: sequence.into(),
        }
    }

    pub fn len(&self) -> usize {
        self.sequence.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sequence.is_empty()
    }

    /// header line content; `Seq<index>` stands in for a missing identifier
    pub fn header(&self, index: usize) -> String {
        let mut header = match &self.identifier {
            Some(id) => id.clone(),
            None => format!("{}{}", SYNTHETIC_ID, index),
        };

        if !self.description.is_empty() {
            header.push(' ');
            header.push_str(&self.description);
        }

        for tag in self.annotation_tags.iter() {
            header.push(' ');
            header.push_str(tag);
        }

        header
    }

    /// two-line FASTA entry without a trailing newline
    pub fn fasta_entry(&self, index: usize) -> String {
        format!(">{}\n{}", self.header(index), self.sequence)
    }
}

impl RecordBatch {
    pub fn new<S: Into<String>>(name: S, records: Vec<Record>) -> Self {
        Self {
            name: name.into(),
            records,
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// every record of every batch, in batch order
    pub fn flatten(batches: Vec<RecordBatch>) -> Vec<Record> {
        batches.into_iter().flat_map(|batch| batch.records).collect()
    }
}

fn is_tag(token: &str, prefixes: &[String]) -> bool {
    match token.split_once(TAG_SEPARATOR) {
        Some((key, value)) => !value.is_empty() && prefixes.iter().any(|p| p == key),
        None => false,
    }
}

/// sequence alphabet: letters plus stop '*' and gap '-'
#[inline(always)]
pub fn is_sequence_byte(byte: u8) -> bool {
    byte.is_ascii_alphabetic() || byte == b'*' || byte == b'-'
}
