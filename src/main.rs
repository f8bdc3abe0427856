use std::path::PathBuf;

use clap::Parser;
use rselect::search::Selection;

/// Select molecules with chemistries where we are seeking to improve data
/// coverage. This takes in a multi-molecule SMILES file and outputs a
/// multi-molecule SMILES file, where each molecule is on a separate line.
/// The chemistries we are selecting for include a list of functional groups
/// and openff-2.2.0.offxml parameters for which there is low coverage in
/// our already available data.
#[derive(Parser)]
struct Cli {
    /// Path to a file containing SMILES strings, with one on each line.
    #[arg(short, long)]
    input: PathBuf,

    /// Path to the output SMILES file.
    #[arg(short, long, default_value = "output.smi")]
    output: PathBuf,

    /// Only write the top N molecules to the output file. Negative means
    /// write all molecules; 0 is invalid.
    #[arg(short = 'n', long, default_value_t = -1)]
    only_top_n: i64,

    /// Number of worker threads to use. 0 means one per logical CPU.
    #[arg(long, alias = "np", default_value_t = 1)]
    nproc: usize,

    /// If given, write a headerless CSV of per-field match totals over the
    /// selected molecules to this path.
    #[arg(long, alias = "oc")]
    output_count: Option<PathBuf>,

    /// If given, write the full match matrix (SMILES, Count, and one
    /// boolean column per field) as CSV to this path.
    #[arg(long, alias = "of")]
    output_full: Option<PathBuf>,

    /// Minimum number of matched fields required to keep a molecule.
    #[arg(short = 'c', long, default_value_t = 1)]
    count_threshold: i64,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();
    let selection = Selection {
        input: cli.input,
        output: cli.output,
        only_top_n: cli.only_top_n,
        nproc: cli.nproc,
        output_count: cli.output_count,
        output_full: cli.output_full,
        count_threshold: cli.count_threshold,
    };
    if let Err(e) = selection.run() {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
