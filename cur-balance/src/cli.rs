use clap::Parser;
use config::{check_factor, ArgCheck, CliError, DEFAULT_FACTOR, DEFAULT_SEED, DEFAULT_TAG_PREFIX};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(version, about = "Generate seqs.fasta and classes.txt from two FASTA inputs", long_about = None)]
pub struct Args {
    #[arg(
        short = 'p',
        long = "positive",
        required = true,
        value_name = "PATHS",
        value_delimiter = ',',
        num_args = 1..,
        help = "FASTA files or directories with positive samples"
    )]
    pub positive: Vec<PathBuf>,

    #[arg(
        short = 'n',
        long = "negative",
        required = true,
        value_name = "PATHS",
        value_delimiter = ',',
        num_args = 1..,
        help = "FASTA files or directories with negative samples"
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
    fn check_params(&self) -> Result<(), CliError> {
        check_factor(self.factor)?;
        Ok(())
    }

    fn get_sources(&self) -> Vec<&PathBuf> {
        self.positive.iter().chain(self.negative.iter()).collect()
    }
}
