use anyhow::Context;
use clap::Parser;
use log::info;
use pepscreen_core::filter::{BloomPeptideSet, ExactPeptideSet, KmerMembership};
use pepscreen_core::io::fasta::read_fasta_records_from_path;
use pepscreen_core::io::read_records_from_path;
use pepscreen_core::oracle::PeptideOracle;
use pepscreen_core::pipeline::{write_score_table_to_path, BatchPipeline, LogProgress};
use pepscreen_core::score::{ReadScorer, ScoreConfig, Verdict};
use pepscreen_core::seq::peptide::PeptideSeq;
use simplelog::{ColorChoice, Config, LevelFilter, TermLogger, TerminalMode};
use std::fs::File;
use std::io::{self, BufWriter};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "pepscreen",
    version,
    about = "Screen sequencing reads for protein-coding frames against a reference peptide set"
)]
struct CliOptions {
    /// Reference peptide FASTA file
    peptides: PathBuf,

    /// Reads to screen, FASTA or FASTQ (detected from the first record)
    reads: PathBuf,

    /// Peptide k-mer size
    #[arg(long, default_value_t = 7)]
    peptide_ksize: usize,

    /// A read is coding when its best frame's k-mer hit fraction strictly
    /// exceeds this
    #[arg(long, default_value_t = 0.5)]
    coding_threshold: f64,

    /// Frames with complexity at or below this are treated as low-complexity
    #[arg(long, default_value_t = 0.3)]
    complexity_threshold: f64,

    /// Store reference k-mers exactly instead of in a Bloom filter
    #[arg(long)]
    exact: bool,

    /// Target false-positive rate of the Bloom filter
    #[arg(long, default_value_t = 1e-4, conflicts_with = "exact")]
    fpr: f64,

    /// Write the per-read score table to this CSV file
    #[arg(long)]
    csv: Option<PathBuf>,

    /// Write coding peptide FASTA here instead of stdout
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// Log a progress line every N reads
    #[arg(long, default_value_t = 100_000)]
    progress_every: usize,

    /// Only log warnings and errors
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> anyhow::Result<()> {
    let options = CliOptions::parse();
    initialise_logging(options.quiet);

    let references = read_fasta_records_from_path::<PeptideSeq>(&options.peptides)
        .with_context(|| format!("reading reference peptides from {}", options.peptides.display()))?;
    info!("loaded {} reference peptide records", references.len());

    if options.exact {
        let filter = ExactPeptideSet::from_records(&references, options.peptide_ksize)
            .context("building exact reference k-mer set")?;
        info!(
            "exact reference set: {} distinct {}-mers",
            filter.len(),
            filter.ksize()
        );
        screen(&options, PeptideOracle::new(filter)?)
    } else {
        let filter = BloomPeptideSet::from_records(&references, options.peptide_ksize, options.fpr)
            .context("building reference Bloom filter")?;
        info!(
            "reference Bloom filter: {} bits, {} hashes, target fpr {}",
            filter.nbits(),
            filter.nhashes(),
            filter.false_positive_rate()
        );
        screen(&options, PeptideOracle::new(filter)?)
    }
}

fn screen<F: KmerMembership>(options: &CliOptions, oracle: PeptideOracle<F>) -> anyhow::Result<()> {
    let config = ScoreConfig {
        coding_threshold: options.coding_threshold,
        complexity_threshold: options.complexity_threshold,
    };
    let scorer = ReadScorer::new(&oracle, config)?;
    let pipeline = BatchPipeline::new(&scorer);
    let mut progress = LogProgress::new(options.progress_every);

    let reads = read_records_from_path(&options.reads)
        .with_context(|| format!("opening reads from {}", options.reads.display()))?;

    let table = match &options.out {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("creating output file {}", path.display()))?;
            let mut writer = BufWriter::new(file);
            pipeline.run(reads, &mut writer, &mut progress)?
        }
        None => {
            let stdout = io::stdout();
            let mut writer = BufWriter::new(stdout.lock());
            pipeline.run(reads, &mut writer, &mut progress)?
        }
    };

    let coding = table.iter().filter(|r| r.is_coding()).count();
    let low_complexity = table
        .iter()
        .filter(|r| r.verdict == Verdict::LowComplexity)
        .count();
    info!(
        "{} reads screened: {} coding, {} low-complexity",
        table.len(),
        coding,
        low_complexity
    );

    if let Some(path) = &options.csv {
        write_score_table_to_path(path, &table)
            .with_context(|| format!("writing score table to {}", path.display()))?;
        info!("score table written to {}", path.display());
    }

    Ok(())
}

fn initialise_logging(quiet: bool) {
    let level = if quiet {
        LevelFilter::Warn
    } else {
        LevelFilter::Info
    };
    TermLogger::init(
        level,
        Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    )
    .expect("logger initialised once");
}
