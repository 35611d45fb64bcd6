use clap::Parser;
use config::{
    check_factor, check_percentile, ArgCheck, CliError, RetentionPolicy, DEFAULT_FACTOR,
    DEFAULT_PERCENTILE, DEFAULT_SEED, DEFAULT_TAG_PREFIX,
};
use std::path::PathBuf;

use crate::CurationConfig;

#[derive(Debug, Parser)]
pub struct RunArgs {
    #[arg(
        short = 'p',
        long = "positive",
        required = true,
        value_name = "PATHS",
        value_delimiter = ',',
        num_args = 1..,
        help = "FASTA files or directories with positive sources"
    )]
    pub positive: Vec<PathBuf>,

    #[arg(
        short = 'n',
        long = "negative",
        required = true,
        value_name = "PATHS",
        value_delimiter = ',',
        num_args = 1..,
        help = "FASTA files or directories with negative sources"
    )]
    pub negative: Vec<PathBuf>,

    #[arg(
        short = 'f',
        long = "factor",
        required = false,
        value_name = "FACTOR",
        help = "How many times larger than the minority the majority class may stay [>= 1]",
        default_value_t = DEFAULT_FACTOR
    )]
    pub factor: f64,

    #[arg(
        long = "percentile",
        required = false,
        value_name = "PERCENTILE",
        help = "Length percentile of the positives used as cutoff [0-100]",
        default_value_t = DEFAULT_PERCENTILE
    )]
    pub percentile: f64,

    #[arg(
        short = 's',
        long = "seed",
        required = false,
        value_name = "SEED",
        help = "Seed for the downsampling shuffle",
        default_value_t = DEFAULT_SEED
    )]
    pub seed: u64,

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
        long = "prefix",
        required = false,
        value_name = "VALUE",
        help = "Prefix prepended to the output file names",
        default_value("")
    )]
    pub prefix: String,

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
        help = "Number of threads used to read sources",
        value_name = "THREADS",
        default_value_t = num_cpus::get()
    )]
    pub threads: usize,
}

impl RunArgs {
    pub fn into_config(self) -> CurationConfig {
        CurationConfig {
            positive: self.positive,
            negative: self.negative,
            factor: self.factor,
            percentile: self.percentile,
            seed: self.seed,
            outdir: self.outdir,
            prefix: self.prefix,
            keep: self.keep,
            tag_prefix: self.tag_prefix,
        }
    }
}

impl ArgCheck for RunArgs {
    fn check_params(&self) -> Result<(), CliError> {
        check_factor(self.factor)?;
        check_percentile(self.percentile)?;
        Ok(())
    }

    fn get_sources(&self) -> Vec<&PathBuf> {
        self.positive.iter().chain(self.negative.iter()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_args_into_config() {
        let args = RunArgs::parse_from([
            "run",
            "--positive",
            "glyco/databases",
            "--negative",
            "no_ptm/no_glycosylation.fasta",
            "--factor",
            "1.5",
            "--seed",
            "7",
            "--keep",
            "last",
        ]);

        let config = args.into_config();
        assert_eq!(config.factor, 1.5);
        assert_eq!(config.seed, 7);
        assert_eq!(config.percentile, 95.0);
        assert_eq!(config.keep, RetentionPolicy::LastSeen);
        assert_eq!(config.tag_prefix, vec!["MIM".to_string()]);
    }

    #[test]
    fn test_run_args_reject_small_factor() {
        let args = RunArgs::parse_from(["run", "-p", "a.fa", "-n", "b.fa", "-f", "0.9"]);
        assert!(args.check_params().is_err());
    }
}
