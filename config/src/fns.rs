use serde::Serialize;

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::{CliError, CurationError, FASTA_SUFFIXES, GZ_SUFFIX, SKIPPED_INPUTS};

/// argument checker for all subcommands
pub trait ArgCheck {
    fn check(&self) -> Result<(), CliError> {
        self.validate_args()
    }

    fn validate_args(&self) -> Result<(), CliError> {
        self.check_sources()?;
        self.check_params()?;

        Ok(())
    }

    fn check_sources(&self) -> Result<(), CliError> {
        let sources = self.get_sources();
        if sources.is_empty() {
            let err = "No source files provided".to_string();
            return Err(CliError::InvalidInput(err));
        }

        for source in sources {
            validate(source)?;
        }

        Ok(())
    }

    /// numeric parameters, overridden by tools that take any
    fn check_params(&self) -> Result<(), CliError> {
        Ok(())
    }

    fn get_sources(&self) -> Vec<&PathBuf>;
}

/// argument validation
///
/// A source is either a FASTA file or a directory holding FASTA
/// files. Empty files are accepted as empty batches.
pub fn validate(arg: &PathBuf) -> Result<(), CliError> {
    if !arg.exists() {
        return Err(CliError::InvalidInput(format!(
            "ERROR: {:?} does not exist",
            arg
        )));
    }

    if arg.is_dir() {
        return Ok(());
    }

    if !is_fasta(arg) {
        return Err(CliError::InvalidInput(format!(
            "ERROR: file {:?} is not a FASTA file",
            arg
        )));
    }

    match fs::metadata(arg) {
        Ok(metadata) if metadata.len() == 0 => {
            log::warn!("WARN: file {:?} is empty", arg);
            Ok(())
        }
        Ok(_) => Ok(()),
        Err(e) => Err(CliError::IoError(e)),
    }
}

pub fn is_fasta<P: AsRef<Path>>(path: P) -> bool {
    let name = file_name(path.as_ref());
    FASTA_SUFFIXES.iter().any(|suffix| name.ends_with(suffix))
}

pub fn is_gz<P: AsRef<Path>>(path: P) -> bool {
    file_name(path.as_ref()).ends_with(GZ_SUFFIX)
}

/// true for anything a cur-* tool writes, prefixed or not
pub fn is_tool_output<P: AsRef<Path>>(path: P) -> bool {
    let name = file_name(path.as_ref());
    SKIPPED_INPUTS.iter().any(|output| name.ends_with(output))
}

pub fn file_name(path: &Path) -> String {
    path.file_name()
        .and_then(|f| f.to_str())
        .unwrap_or_default()
        .to_string()
}

/// Expands every source into the list of FASTA files it stands for.
///
/// Directories are read one level deep and sorted by file name, so
/// batch order never depends on the file system. Outputs of an earlier
/// run living next to the raw sources are skipped.
pub fn collect_fasta_paths(sources: &[PathBuf]) -> Result<Vec<PathBuf>, CurationError> {
    let mut paths = Vec::new();

    for source in sources {
        if !source.exists() {
            return Err(CurationError::MissingPath(source.clone()));
        }

        if source.is_file() {
            paths.push(source.clone());
            continue;
        }

        let mut entries = fs::read_dir(source)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| path.is_file() && is_fasta(path))
            .filter(|path| !is_tool_output(path))
            .collect::<Vec<_>>();
        entries.sort();

        if entries.is_empty() {
            log::warn!("WARN: no FASTA files found in {:?}", source);
        }

        paths.extend(entries);
    }

    Ok(paths)
}

pub fn check_factor(factor: f64) -> Result<f64, CurationError> {
    if !factor.is_finite() || factor < 1.0 {
        return Err(CurationError::InvalidFactor(factor));
    }

    Ok(factor)
}

pub fn check_percentile(percentile: f64) -> Result<f64, CurationError> {
    if !(0.0..=100.0).contains(&percentile) {
        return Err(CurationError::InvalidPercentile(percentile));
    }

    Ok(percentile)
}

/// write any serializable report as pretty JSON
pub fn write_report<T, P>(report: &T, path: P) -> Result<(), CurationError>
where
    T: Serialize,
    P: AsRef<Path>,
{
    let mut writer = BufWriter::new(File::create(path.as_ref())?);
    serde_json::to_writer_pretty(&mut writer, report)?;
    writer.flush()?;

    log::info!("INFO: report written to {:?}", path.as_ref());
    Ok(())
}

/// Publishes a set of artifacts all-or-nothing.
///
/// Every payload goes to a hidden temporary next to its destination
/// first. Existing destinations are moved aside before any temporary
/// is renamed into place; if a rename fails, the new files are removed
/// and the previous ones restored. No temporary or backup survives.
pub fn publish(outputs: &[(PathBuf, Vec<u8>)]) -> Result<(), CurationError> {
    let mut staged: Vec<(PathBuf, &PathBuf)> = Vec::with_capacity(outputs.len());
    let mut backups: Vec<(PathBuf, &PathBuf)> = Vec::new();
    let mut committed: Vec<&PathBuf> = Vec::new();

    let result = (|| -> Result<(), CurationError> {
        for (dest, payload) in outputs {
            let tmp = sibling(dest, "tmp");
            staged.push((tmp.clone(), dest));

            let mut writer = BufWriter::new(File::create(&tmp)?);
            writer.write_all(payload)?;
            writer.flush()?;
        }

        for (_, dest) in staged.iter() {
            if dest.is_file() {
                let bak = sibling(dest, "bak");
                fs::rename(dest, &bak)?;
                backups.push((bak, *dest));
            }
        }

        for (tmp, dest) in staged.iter() {
            fs::rename(tmp, dest)?;
            committed.push(*dest);
        }

        Ok(())
    })();

    match result {
        Ok(()) => {
            for (bak, _) in backups.iter() {
                let _ = fs::remove_file(bak);
            }
        }
        Err(_) => {
            for dest in committed.iter() {
                let _ = fs::remove_file(dest);
            }
            for (bak, dest) in backups.iter() {
                let _ = fs::rename(bak, dest);
            }
            for (tmp, _) in staged.iter() {
                let _ = fs::remove_file(tmp);
            }
        }
    }

    result
}

/// hidden `.<name>.<ext>` next to `dest`
fn sibling(dest: &Path, ext: &str) -> PathBuf {
    let name = format!(".{}.{}", file_name(dest), ext);
    match dest.parent() {
        Some(parent) => parent.join(name),
        None => PathBuf::from(name),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_fasta_accepts_plain_and_gzipped() {
        assert!(is_fasta("uniprot.fasta"));
        assert!(is_fasta("dir/dbptm.fa.gz"));
        assert!(is_fasta("qptm.faa"));
        assert!(!is_fasta("classes.txt"));
        assert!(!is_fasta("reads.bed"));
    }

    #[test]
    fn test_check_factor() {
        assert!(check_factor(1.0).is_ok());
        assert!(check_factor(2.5).is_ok());
        assert!(matches!(
            check_factor(0.99),
            Err(CurationError::InvalidFactor(_))
        ));
        assert!(check_factor(f64::NAN).is_err());
        assert!(check_factor(f64::INFINITY).is_err());
    }

    #[test]
    fn test_check_percentile() {
        assert!(check_percentile(0.0).is_ok());
        assert!(check_percentile(95.0).is_ok());
        assert!(check_percentile(100.0).is_ok());
        assert!(check_percentile(100.5).is_err());
        assert!(check_percentile(f64::NAN).is_err());
    }

    #[test]
    fn test_collect_fasta_paths_sorts_and_skips_outputs() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["b.fasta", "a.fa", "merged.fasta", "notes.txt"] {
            File::create(dir.path().join(name)).unwrap();
        }

        let paths = collect_fasta_paths(&[dir.path().to_path_buf()]).unwrap();
        let names = paths.iter().map(|p| file_name(p)).collect::<Vec<_>>();

        assert_eq!(names, vec!["a.fa", "b.fasta"]);
    }

    #[test]
    fn test_collect_fasta_paths_skips_prefixed_outputs() {
        let dir = tempfile::tempdir().unwrap();
        for name in [
            "uniprot.fasta",
            "glyco_seqs.fasta",
            "filtered.fasta",
            "length_filtered.fasta",
            "glyco_filtered.fasta",
        ] {
            File::create(dir.path().join(name)).unwrap();
        }

        let paths = collect_fasta_paths(&[dir.path().to_path_buf()]).unwrap();
        let names = paths.iter().map(|p| file_name(p)).collect::<Vec<_>>();

        assert_eq!(names, vec!["uniprot.fasta"]);
        assert!(is_tool_output("out/merged.fasta"));
        assert!(!is_tool_output("out/seqs.fa"));
    }

    #[test]
    fn test_collect_fasta_paths_missing_source() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.fasta");

        assert!(matches!(
            collect_fasta_paths(&[missing]),
            Err(CurationError::MissingPath(_))
        ));
    }

    #[test]
    fn test_validate_rejects_missing_and_foreign_files() {
        let dir = tempfile::tempdir().unwrap();
        let bed = dir.path().join("reads.bed");
        File::create(&bed).unwrap();

        assert!(validate(&dir.path().join("absent.fa")).is_err());
        assert!(validate(&bed).is_err());
        assert!(validate(&dir.path().to_path_buf()).is_ok());
    }

    #[test]
    fn test_publish_writes_all_and_leaves_no_temporaries() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("seqs.fasta");
        let b = dir.path().join("classes.txt");

        publish(&[(a.clone(), b">Seq1\nMK".to_vec()), (b.clone(), b"1".to_vec())]).unwrap();

        assert_eq!(fs::read(&a).unwrap(), b">Seq1\nMK");
        assert_eq!(fs::read(&b).unwrap(), b"1");
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 2);
    }

    #[test]
    fn test_publish_failure_cleans_up() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("seqs.fasta");
        let bad = dir.path().join("missing").join("classes.txt");

        assert!(publish(&[(good.clone(), b"x".to_vec()), (bad, b"1".to_vec())]).is_err());
        assert!(!good.exists());
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_publish_failed_rename_restores_previous_outputs() {
        let dir = tempfile::tempdir().unwrap();
        let seqs = dir.path().join("seqs.fasta");
        let classes = dir.path().join("classes.txt");

        fs::write(&seqs, ">Seq1\nOLD").unwrap();
        // a non-empty directory cannot be replaced by a file
        fs::create_dir(&classes).unwrap();
        fs::write(classes.join("keep"), "x").unwrap();

        let outputs = [
            (seqs.clone(), b">Seq1\nNEW".to_vec()),
            (classes.clone(), b"1".to_vec()),
        ];
        assert!(publish(&outputs).is_err());

        assert_eq!(fs::read_to_string(&seqs).unwrap(), ">Seq1\nOLD");
        assert!(classes.is_dir());
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 2);
    }

    #[test]
    fn test_publish_replaces_previous_outputs() {
        let dir = tempfile::tempdir().unwrap();
        let seqs = dir.path().join("seqs.fasta");
        fs::write(&seqs, "old").unwrap();

        publish(&[(seqs.clone(), b"new".to_vec())]).unwrap();

        assert_eq!(fs::read_to_string(&seqs).unwrap(), "new");
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }
}
