/// curatools: curation of balanced sequence datasets
///
/// This is the entry point for the curatools CLI.
/// It is responsible for parsing the CLI arguments
/// and executing the appropriate subcommand [cur-tool].
///
/// This wrapper offers 4 different subcommands:
/// - cur-merge
/// - cur-filter
/// - cur-balance
/// - run
///
/// The first three expose one step of the curation engine
/// each; `run` chains all of them: merge every source,
/// drop length outliers and false negatives, balance
/// both classes and write seqs.fasta + classes.txt.
///
/// To get help on the subcommands, you can run:
///
/// ```shell
/// curatools cur-merge -- --help
/// ```
///
use clap::{Args, Parser, Subcommand};
use config::ArgCheck;
use log::{error, info, Level};
use simple_logger::init_with_level;

use cur_balance::lib_cur_balance;
use cur_filter::lib_cur_filter;
use cur_merge::lib_cur_merge;
use curatools::{cli::RunArgs, curate};

#[derive(Parser)]
#[command(name = "curatools")]
#[command(about = "curatools: curation of balanced sequence datasets")]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(name = "cur-merge")]
    Merge(CurArgs),
    #[command(name = "cur-filter")]
    Filter(CurArgs),
    #[command(name = "cur-balance")]
    Balance(CurArgs),
    #[command(name = "run")]
    Run(RunArgs),
}

#[derive(Args)]
struct CurArgs {
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    args: Vec<String>,
}

fn main() {
    let start = std::time::Instant::now();
    init_with_level(Level::Info).unwrap();
    let cli = Cli::parse();

    init();

    let result = match cli.command {
        Commands::Merge(args) => lib_cur_merge(args.args).map(|_| ()),
        Commands::Filter(args) => lib_cur_filter(args.args),
        Commands::Balance(args) => lib_cur_balance(args.args).map(|_| ()),
        Commands::Run(args) => run(args),
    };

    result.unwrap_or_else(|e| {
        error!("{}", e);
        std::process::exit(1);
    });

    let elapsed = start.elapsed();
    info!("Elapsed time: {:.3?}", elapsed);
}

fn run(args: RunArgs) -> anyhow::Result<()> {
    args.check()?;

    rayon::ThreadPoolBuilder::new()
        .num_threads(args.threads.max(config::MIN_THREADS))
        .build_global()?;

    info!("curatools v{}: running full curation...", config::VERSION);
    let report = curate(&args.into_config())?;

    info!(
        "Dataset ready: {} positives, {} negatives",
        report.balance.positives_out, report.balance.negatives_out
    );

    Ok(())
}

fn init() {
    let message = format!(
        r#"

        curatools: curation of balanced sequence datasets

        this is the entry point for the curatools CLI
        and it is responsible for parsing the CLI arguments
        for each cur-tool:

        - cur-merge
        - cur-filter
        - cur-balance
        - run

        > version: {}

        * to get help on the subcommands, run:
            curatools <SUBCOMMAND> -- --help

        "#,
        env!("CARGO_PKG_VERSION")
    );

    println!("{}", message);
}
