pub mod fasta;
pub mod fastq;

use crate::error::{ScreenError, ScreenResult};
use crate::seq::dna::DnaSeq;
use crate::seq::SeqRecord;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// On-disk layout of a read file, decided by the first record marker.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReadFormat {
    Fasta,
    Fastq,
}

/// Peek at the first non-whitespace byte without consuming it. An empty
/// stream counts as FASTA with zero records.
pub fn detect_read_format<R: BufRead>(reader: &mut R) -> ScreenResult<ReadFormat> {
    loop {
        let buf = reader.fill_buf()?;
        if buf.is_empty() {
            return Ok(ReadFormat::Fasta);
        }
        match buf.iter().position(|b| !b.is_ascii_whitespace()) {
            Some(pos) => {
                reader.consume(pos);
                let buf = reader.fill_buf()?;
                return match buf[0] {
                    b'>' => Ok(ReadFormat::Fasta),
                    b'@' => Ok(ReadFormat::Fastq),
                    other => Err(ScreenError::UnknownFormat {
                        marker: other as char,
                    }),
                };
            }
            None => {
                let len = buf.len();
                reader.consume(len);
            }
        }
    }
}

/// Streaming reads in either format, unified behind one iterator.
pub enum ReadRecords<R> {
    Fasta(fasta::FastaRecords<R, DnaSeq>),
    Fastq(fastq::FastqRecords<R, DnaSeq>),
}

impl<R: BufRead> Iterator for ReadRecords<R> {
    type Item = ScreenResult<SeqRecord<DnaSeq>>;

    fn next(&mut self) -> Option<Self::Item> {
        match self {
            ReadRecords::Fasta(records) => records.next(),
            ReadRecords::Fastq(records) => records.next(),
        }
    }
}

pub fn read_records_from_reader<R: BufRead>(mut reader: R) -> ScreenResult<ReadRecords<R>> {
    match detect_read_format(&mut reader)? {
        ReadFormat::Fasta => Ok(ReadRecords::Fasta(fasta::fasta_records_from_reader(reader))),
        ReadFormat::Fastq => Ok(ReadRecords::Fastq(fastq::fastq_records_from_reader(reader))),
    }
}

pub fn read_records_from_path(
    path: impl AsRef<Path>,
) -> ScreenResult<ReadRecords<BufReader<File>>> {
    let file = File::open(path)?;
    read_records_from_reader(BufReader::new(file))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn collect(data: &[u8]) -> ScreenResult<Vec<SeqRecord<DnaSeq>>> {
        read_records_from_reader(Cursor::new(data.to_vec()))?.collect()
    }

    #[test]
    fn detects_fasta_reads() {
        let records = collect(b">r1\nACGT\n>r2\nTTAA\n").unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].id(), "r1");
    }

    #[test]
    fn detects_fastq_reads() {
        let records = collect(b"@r1\nACGT\n+\nIIII\n").unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].seq().as_bytes(), b"ACGT");
    }

    #[test]
    fn leading_blank_lines_skipped() {
        let records = collect(b"\n\n>r1\nAC\n").unwrap();
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn empty_input_yields_no_records() {
        let records = collect(b"").unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn unknown_marker_rejected() {
        let err = collect(b"#comment\nACGT\n").unwrap_err();
        match err {
            ScreenError::UnknownFormat { marker } => assert_eq!(marker, '#'),
            other => panic!("expected unknown format error, got {other:?}"),
        }
    }
}
