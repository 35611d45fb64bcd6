use clap::Parser;
use config::{ArgCheck, RetentionPolicy, DEFAULT_TAG_PREFIX};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(version, about = "Collapse duplicate sequences across sources", long_about = None)]
pub struct Args {
    #[arg(
        short = 's',
        long = "sources",
        required = true,
        value_name = "PATHS",
        value_delimiter = ',',
        num_args = 1..,
        help = "FASTA files or directories with FASTA files to merge"
    )]
    pub sources: Vec<PathBuf>,

    #[arg(
        short = 'o',
        long = "outdir",
        required = false,
        value_name = "PATH",
        help = "Output directory path",
        default_value(".")
    )]
    pub outdir: PathBuf,

    #[arg(
        short = 'k',
        long = "keep",
        required = false,
        value_name = "POLICY",
        help = "Which duplicate keeps identifier and description [first, last, most-tags]",
        default_value_t = RetentionPolicy::FirstSeen
    )]
    pub keep: RetentionPolicy,

    #[arg(
        long = "tag-prefix",
        required = false,
        value_name = "PREFIXES",
        value_delimiter = ',',
        num_args = 1..,
        help = "Header token prefixes treated as annotation tags",
        default_value = DEFAULT_TAG_PREFIX
    )]
    pub tag_prefix: Vec<String>,

    #[arg(
        short = 't',
        long = "threads",
        help = "Number of threads",
        value_name = "THREADS",
        default_value_t = num_cpus::get()
    )]
    pub threads: usize,
}

impl Args {
    pub fn from(args: Vec<String>) -> Self {
        let mut full_args = vec![env!("CARGO_PKG_NAME").to_string()];
        full_args.extend(args);

        Args::parse_from(full_args)
    }
}

impl ArgCheck for Args {
    fn get_sources(&self) -> Vec<&PathBuf> {
        self.sources.iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_defaults() {
        let args = Args::from(vec!["--sources".into(), "a.fasta,b.fasta".into()]);

        assert_eq!(args.sources.len(), 2);
        assert_eq!(args.keep, RetentionPolicy::FirstSeen);
        assert_eq!(args.tag_prefix, vec!["MIM".to_string()]);
        assert_eq!(args.outdir, PathBuf::from("."));
    }

    #[test]
    fn test_args_policy() {
        let args = Args::from(vec![
            "-s".into(),
            "a.fasta".into(),
            "--keep".into(),
            "most-tags".into(),
        ]);

        assert_eq!(args.keep, RetentionPolicy::MostAnnotated);
    }
}
