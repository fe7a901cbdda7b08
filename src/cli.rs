use std::path::PathBuf;
use std::str::FromStr;

use clap::builder::styling::AnsiColor;
use clap::builder::Styles;
use clap::{Parser, Subcommand};

use seqtools::seq::NaOperation;
use seqtools::BoundsSpec;

const fn extra_build_info() -> &'static str {
    match option_env!("CARGO_BUILD_DESC") {
        Some(e) => e,
        None => env!("CARGO_PKG_VERSION"),
    }
}
pub const VERSION: &str = extra_build_info();
const INFO_STRING: &str = "
🧬 seqtools version ";
const AFTER_STRING: &str = "
   ──────────────────────────────────
   tools for filtering reads and transforming biological sequences";

// colouring of the help
const STYLES: Styles = Styles::styled()
    .header(AnsiColor::Yellow.on_default().bold())
    .usage(AnsiColor::BrightMagenta.on_default().bold())
    .literal(AnsiColor::BrightMagenta.on_default())
    .placeholder(AnsiColor::White.on_default());

#[derive(Parser)]
#[command(
    version = VERSION,
    about = format!("{}{}{}", INFO_STRING, VERSION, AFTER_STRING),
    arg_required_else_help = true,
    flatten_help = true,
    styles = STYLES
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Keep the reads of a .fastq file which pass GC content, length and quality filters
    #[command(arg_required_else_help = true)]
    Filter {
        /// the input .fastq file
        input: PathBuf,

        /// directory to write the filtered .fastq into. it is only created if at least one
        /// read passes the filters
        #[arg(long, default_value = "filtered")]
        output_dir: PathBuf,

        /// name of the filtered .fastq file, inside the output directory
        #[arg(short, default_value = "output_filter.fastq")]
        output: PathBuf,

        /// filter GC content (as a percentage) to the interval [a,b], both inclusive.
        /// a single value b is the same as `0,b`.
        #[arg(
            long,
            value_parser = |x: &str| BoundsSpec::<f64>::from_str(x),
            default_value = "0,100",
            verbatim_doc_comment
        )]
        gc: BoundsSpec<f64>,

        /// filter read lengths to the interval [a,b], both inclusive.
        /// a single value b is the same as `0,b`.
        #[arg(
            long,
            value_parser = |x: &str| BoundsSpec::<u64>::from_str(x),
            default_value = "0,4294967296",
            verbatim_doc_comment
        )]
        len: BoundsSpec<u64>,

        /// minimum average read quality (Phred score)
        #[arg(long, default_value_t = 0.0)]
        quality: f64,

        /// the number of threads to use
        #[arg(short, long, default_value_t = 1)]
        threads: usize,

        /// also write a per-read .tsv report of the computed metrics
        #[arg(long)]
        report: Option<PathBuf>,
    },

    /// Apply a transform to one or more nucleic acid sequences. Sequences which are not
    /// nucleic acids, or which the transform does not apply to, are reported and skipped
    #[command(arg_required_else_help = true)]
    Na {
        #[arg(value_enum)]
        operation: NaOperation,

        /// the sequences to transform
        #[arg(required = true)]
        sequences: Vec<String>,
    },

    /// Check that an amino acid sequence is a plausible protein
    #[command(arg_required_else_help = true)]
    Protein {
        sequence: String,
    },

    /// Convert a multi-line FASTA file to one line per sequence
    #[command(arg_required_else_help = true)]
    FastaOneline {
        /// the input FASTA file
        input: PathBuf,

        /// the output file
        #[arg(short, default_value = "output_fasta_conversion.fasta")]
        output: PathBuf,
    },

    /// Write the translations of the genes neighbouring genes of interest in a GenBank file
    /// to FASTA
    #[command(arg_required_else_help = true)]
    GbkNeighbours {
        /// the input .gbk file
        input: PathBuf,

        /// (parts of) names of the genes of interest
        #[arg(long, num_args = 1.., required = true)]
        genes: Vec<String>,

        /// the number of genes to take before each gene of interest
        #[arg(long, default_value_t = 1)]
        before: usize,

        /// the number of genes to take after each gene of interest
        #[arg(long, default_value_t = 1)]
        after: usize,

        /// the output FASTA file
        #[arg(short, default_value = "neighbor_genes_from_gbk_search.fasta")]
        output: PathBuf,
    },

    /// List the best hit description of each query in a text BLAST report
    #[command(arg_required_else_help = true)]
    BlastBest {
        /// the BLAST report (text format)
        input: PathBuf,

        /// the output file
        #[arg(short, default_value = "output_blast.txt")]
        output: PathBuf,
    },
}
