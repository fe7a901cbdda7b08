extern crate env_logger;
#[macro_use]
extern crate log;
use std::{
    fs::File,
    io::{prelude::*, BufReader, BufWriter},
    path::Path,
};

use anyhow::{Context, Result};
use clap::Parser;

use seqtools::output::FsDirCreator;
use seqtools::seq::{run_na_batch, validate_protein, BatchOutput};
use seqtools::{blast, fasta, genbank, report, FilterOpts};

mod cli;

use cli::{Cli, Commands};

/// Creates a `BufWriter` for a new file at `output`, replacing any existing file.
fn get_writer(output: &Path) -> Result<impl Write> {
    let file = File::create(output)
        .with_context(|| format!("Unable to create output file {}", output.display()))?;
    Ok(BufWriter::new(file))
}

/// Opens `input` for buffered reading.
fn get_reader(input: &Path) -> Result<impl BufRead> {
    let file =
        File::open(input).with_context(|| format!("Unable to open file {}", input.display()))?;
    Ok(BufReader::new(file))
}

fn try_main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_target(false)
        .init();

    let cli = Cli::parse();

    match &cli.command {
        Commands::Filter {
            input,
            output_dir,
            output,
            gc,
            len,
            quality,
            threads,
            report: report_path,
        } => {
            let opts = FilterOpts::new(*gc, *len, *quality);
            info!(
                "Filtering with GC content {:?}, length {:?}, minimum quality {}",
                (opts.gc.lo, opts.gc.hi),
                (opts.len.lo, opts.len.hi),
                opts.quality
            );

            let output_path = output_dir.join(output);
            let run = seqtools::filter_fastq(input, &output_path, &opts, *threads, &FsDirCreator)?;

            if let Some(report_path) = report_path {
                report::save_report(report_path, input, &opts, &run, &FsDirCreator)?;
            }

            info!("Completed successfully.")
        }
        Commands::Na {
            operation,
            sequences,
        } => {
            let outcome = run_na_batch(sequences.as_slice(), *operation);

            match &outcome.output {
                BatchOutput::Single(s) => println!("{s}"),
                BatchOutput::Many(v) => v.iter().for_each(|s| println!("{s}")),
            }

            if !outcome.diagnostics.is_empty() {
                warn!(
                    "{} of {} sequences were skipped",
                    outcome.diagnostics.len(),
                    sequences.len()
                );
            }
        }
        Commands::Protein { sequence } => {
            let protein = validate_protein(sequence)
                .with_context(|| format!("`{sequence}` is not a valid protein"))?;
            println!("valid protein of {} residues", protein.len());
        }
        Commands::FastaOneline { input, output } => {
            let reader = get_reader(input)?;
            let mut writer = get_writer(output)?;
            let n = fasta::convert_to_oneline(reader, &mut writer)?;
            writer.flush()?;
            info!("Converted {n} records to {}", output.display());
        }
        Commands::GbkNeighbours {
            input,
            genes,
            before,
            after,
            output,
        } => {
            let all_genes = genbank::genes_from_gbk(get_reader(input)?)?;
            let neighbours = genbank::find_neighbours(&all_genes, genes.as_slice(), *before, *after);

            let mut writer = get_writer(output)?;
            let n = fasta::write_genes(&mut writer, neighbours)?;
            writer.flush()?;
            info!("Wrote {n} neighbouring genes to {}", output.display());
        }
        Commands::BlastBest { input, output } => {
            let descriptions = blast::best_hit_descriptions(get_reader(input)?)?;

            let mut writer = get_writer(output)?;
            blast::write_descriptions(&mut writer, &descriptions)?;
            writer.flush()?;
            info!("Wrote {} descriptions to {}", descriptions.len(), output.display());
        }
    };
    Ok(())
}

fn main() {
    if let Err(err) = try_main() {
        error!("{}", err);

        // report any errors that are produced
        err.chain()
            .skip(1)
            .for_each(|cause| error!("  because: {}", cause));

        std::process::exit(1);
    }
}
