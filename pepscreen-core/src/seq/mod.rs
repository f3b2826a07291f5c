pub mod dna;
pub mod peptide;
pub mod traits;

use crate::seq::traits::SeqBytes;
use std::fmt;

/// An identified sequence: a read to screen or a reference peptide entry.
///
/// `id` is the FASTA/FASTQ record identifier (up to the first whitespace);
/// `desc` carries the rest of the header line when present and is echoed
/// back on emitted coding-peptide records.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SeqRecord<S: SeqBytes> {
    pub id: Box<str>,
    pub desc: Option<Box<str>>,
    pub seq: S,
}

impl<S: SeqBytes> SeqRecord<S> {
    pub fn new(id: impl Into<Box<str>>, seq: S) -> Self {
        Self {
            id: id.into(),
            desc: None,
            seq,
        }
    }

    pub fn with_desc(mut self, desc: impl Into<Box<str>>) -> Self {
        self.desc = Some(desc.into());
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn desc(&self) -> Option<&str> {
        self.desc.as_deref()
    }

    pub fn seq(&self) -> &S {
        &self.seq
    }

    pub fn into_seq(self) -> S {
        self.seq
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Strand {
    Forward,
    Reverse,
}

/// One of the six reading frames of a double-stranded nucleotide sequence.
///
/// `offset` is the 0-based codon start (0, 1 or 2); reverse frames apply the
/// same offset to the reverse-complemented sequence. Modeled as strand plus
/// offset rather than a signed integer so the reverse-complement boundary
/// arithmetic stays in one place.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ReadingFrame {
    pub strand: Strand,
    pub offset: u8,
}

impl ReadingFrame {
    pub const ALL: [ReadingFrame; 6] = [
        ReadingFrame::forward(0),
        ReadingFrame::forward(1),
        ReadingFrame::forward(2),
        ReadingFrame::reverse(0),
        ReadingFrame::reverse(1),
        ReadingFrame::reverse(2),
    ];

    pub const fn forward(offset: u8) -> Self {
        Self {
            strand: Strand::Forward,
            offset,
        }
    }

    pub const fn reverse(offset: u8) -> Self {
        Self {
            strand: Strand::Reverse,
            offset,
        }
    }

    /// Conventional signed frame number: +1..+3 forward, -1..-3 reverse.
    pub fn number(&self) -> i8 {
        let n = self.offset as i8 + 1;
        match self.strand {
            Strand::Forward => n,
            Strand::Reverse => -n,
        }
    }

    /// Rank used to break score ties deterministically: lower offset first,
    /// forward strand before reverse at equal offset.
    pub fn tiebreak_rank(&self) -> u8 {
        let strand_bit = match self.strand {
            Strand::Forward => 0,
            Strand::Reverse => 1,
        };
        self.offset * 2 + strand_bit
    }
}

impl fmt::Display for ReadingFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:+}", self.number())
    }
}
