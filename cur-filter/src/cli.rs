use clap::{Parser, Subcommand};
use config::{check_percentile, ArgCheck, CliError, DEFAULT_PERCENTILE, DEFAULT_TAG_PREFIX};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(version, about = "Remove length outliers and false negatives", long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: SubArgs,

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

#[derive(Debug, Subcommand)]
pub enum SubArgs {
    #[command(name = "length")]
    Length {
        #[command(flatten)]
        args: LengthArgs,
    },

    #[command(name = "negative")]
    Negative {
        #[command(flatten)]
        args: NegativeArgs,
    },
}

#[derive(Debug, Parser)]
pub struct LengthArgs {
    #[arg(
        short = 'i',
        long = "input",
        required = true,
        value_name = "PATHS",
        value_delimiter = ',',
        num_args = 1..,
        help = "FASTA files or directories to length-filter"
    )]
    pub input: Vec<PathBuf>,

    #[arg(
        short = 'p',
        long = "percentile",
        required = false,
        value_name = "PERCENTILE",
        help = "Length percentile used as cutoff [0-100]",
        default_value_t = DEFAULT_PERCENTILE
    )]
    pub percentile: f64,

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
        long = "tag-prefix",
        required = false,
        value_name = "PREFIXES",
        value_delimiter = ',',
        num_args = 1..,
        help = "Header token prefixes treated as annotation tags",
        default_value = DEFAULT_TAG_PREFIX
    )]
    pub tag_prefix: Vec<String>,
}

#[derive(Debug, Parser)]
pub struct NegativeArgs {
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
        help = "FASTA files or directories with candidate negative samples"
    )]
    pub negative: Vec<PathBuf>,

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
        long = "tag-prefix",
        required = false,
        value_name = "PREFIXES",
        value_delimiter = ',',
        num_args = 1..,
        help = "Header token prefixes treated as annotation tags",
        default_value = DEFAULT_TAG_PREFIX
    )]
    pub tag_prefix: Vec<String>,
}

impl ArgCheck for LengthArgs {
    fn check_params(&self) -> Result<(), CliError> {
        check_percentile(self.percentile)?;
        Ok(())
    }

    fn get_sources(&self) -> Vec<&PathBuf> {
        self.input.iter().collect()
    }
}

impl ArgCheck for NegativeArgs {
    fn get_sources(&self) -> Vec<&PathBuf> {
        self.positive.iter().chain(self.negative.iter()).collect()
    }
}
