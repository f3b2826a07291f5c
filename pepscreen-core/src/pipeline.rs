//! Batch orchestration: drive the scorer over a read stream, collect the
//! score table, and emit coding peptides as FASTA.

use crate::error::ScreenResult;
use crate::filter::KmerMembership;
use crate::io::fasta::write_fasta_record;
use crate::score::{ReadScoreRecord, ReadScorer, ScoredRead};
use crate::seq::dna::DnaSeq;
use crate::seq::SeqRecord;
use log::info;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Column order of the persisted score table.
pub const SCORE_TABLE_HEADER: [&str; 6] = [
    "read_id",
    "frame",
    "kmer_fraction",
    "kmers_tested",
    "low_complexity",
    "verdict",
];

/// Per-read progress callback. `reads_processed` is the running total and
/// reaches the input read count exactly once, on the final read.
pub trait ProgressSink {
    fn tick(&mut self, reads_processed: usize);
}

/// Discards progress. Useful in tests and library embedding.
pub struct NullProgress;

impl ProgressSink for NullProgress {
    fn tick(&mut self, _reads_processed: usize) {}
}

/// Logs a progress line every `every` reads.
pub struct LogProgress {
    every: usize,
}

impl LogProgress {
    pub fn new(every: usize) -> Self {
        Self {
            every: every.max(1),
        }
    }
}

impl ProgressSink for LogProgress {
    fn tick(&mut self, reads_processed: usize) {
        if reads_processed % self.every == 0 {
            info!("processed {reads_processed} reads");
        }
    }
}

pub struct BatchPipeline<'a, F: KmerMembership> {
    scorer: &'a ReadScorer<'a, F>,
}

impl<'a, F: KmerMembership> BatchPipeline<'a, F> {
    pub fn new(scorer: &'a ReadScorer<'a, F>) -> Self {
        Self { scorer }
    }

    /// Consume a fallible read stream, writing coding peptides to
    /// `coding_out` in encounter order and returning one record per read in
    /// input order. A stream error aborts the batch before any table is
    /// returned; partial tables are never observable.
    pub fn run<I, W, P>(
        &self,
        reads: I,
        coding_out: &mut W,
        progress: &mut P,
    ) -> ScreenResult<Vec<ReadScoreRecord>>
    where
        I: IntoIterator<Item = ScreenResult<SeqRecord<DnaSeq>>>,
        W: Write,
        P: ProgressSink,
    {
        let mut table = Vec::new();
        for read in reads {
            let read = read?;
            let scored = self.scorer.score_read(read.id(), read.seq());
            if let Some(peptide) = &scored.coding_peptide {
                let desc = coding_desc(&scored.record);
                write_fasta_record(
                    coding_out,
                    &scored.record.read_id,
                    Some(&desc),
                    peptide.as_bytes(),
                )?;
            }
            table.push(scored.record);
            progress.tick(table.len());
        }
        coding_out.flush()?;
        info!("batch complete: {} reads scored", table.len());
        Ok(table)
    }
}

/// Score an in-memory slice of reads, in input order. With the `parallel`
/// feature this fans out across a worker pool; the ordered collect keeps
/// the output aligned with the input.
pub fn score_batch<F>(
    scorer: &ReadScorer<'_, F>,
    reads: &[SeqRecord<DnaSeq>],
) -> Vec<ScoredRead>
where
    F: KmerMembership + Sync,
{
    par_map!(reads, |read| scorer.score_read(read.id(), read.seq()))
}

pub fn write_score_table<W: Write>(writer: W, records: &[ReadScoreRecord]) -> ScreenResult<()> {
    let mut writer = csv::Writer::from_writer(writer);
    writer.write_record(SCORE_TABLE_HEADER)?;
    for record in records {
        let frame = record
            .frame
            .map(|frame| frame.to_string())
            .unwrap_or_default();
        let fraction = record
            .kmer_fraction
            .map(|fraction| format!("{fraction:.6}"))
            .unwrap_or_default();
        writer.write_record([
            record.read_id.as_ref(),
            frame.as_str(),
            fraction.as_str(),
            record.kmers_tested.to_string().as_str(),
            if record.low_complexity { "true" } else { "false" },
            record.verdict.to_string().as_str(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

pub fn write_score_table_to_path(
    path: impl AsRef<Path>,
    records: &[ReadScoreRecord],
) -> ScreenResult<()> {
    let file = File::create(path)?;
    write_score_table(BufWriter::new(file), records)
}

fn coding_desc(record: &ReadScoreRecord) -> String {
    // both fields are Some for every coding record
    let frame = record.frame.map(|frame| frame.to_string()).unwrap_or_default();
    let fraction = record.kmer_fraction.unwrap_or(0.0);
    format!("frame {frame} fraction {fraction:.3}")
}
