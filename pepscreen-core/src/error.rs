use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScreenError {
    #[error("invalid character '{ch}' at position {pos}")]
    InvalidChar { ch: char, pos: usize },

    #[error("invalid peptide k-mer size: {ksize} (must be at least 1)")]
    InvalidKmerSize { ksize: usize },

    #[error("false positive rate {rate} out of range (expected 0.0 <= rate < 1.0)")]
    InvalidFalsePositiveRate { rate: f64 },

    #[error("invalid {name} threshold: {value} ({reason})")]
    InvalidThreshold {
        name: &'static str,
        value: f64,
        reason: String,
    },

    #[error("k-mer length {actual} does not match the set's k-mer size {expected}")]
    KmerLengthMismatch { expected: usize, actual: usize },

    #[error("reference peptide set is empty (no k-mers of size {ksize} could be extracted)")]
    EmptyReference { ksize: usize },

    #[error("fasta format error at line {line}: {msg}")]
    FastaFormat { msg: &'static str, line: usize },

    #[error("fastq format error at line {line}: {msg}")]
    FastqFormat { msg: &'static str, line: usize },

    #[error("unrecognized read file format: first record marker '{marker}' (expected '>' or '@')")]
    UnknownFormat { marker: char },

    #[error("io error: {0}")]
    Io(#[from] io::Error),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
}

pub type ScreenResult<T> = Result<T, ScreenError>;
