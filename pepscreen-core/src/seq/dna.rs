use crate::alphabets::dna;
use crate::error::ScreenResult;
use crate::seq::traits::SeqBytes;

/// A nucleotide sequence as read from input.
///
/// Construction never fails: sequencing reads routinely carry `N` and other
/// degenerate symbols, and a malformed read must degrade to a defined
/// non-coding verdict rather than abort a batch. Bases are uppercased on
/// construction; codons containing anything outside ACGT translate to `X`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct DnaSeq {
    bytes: Vec<u8>,
}

impl DnaSeq {
    pub fn new(mut bytes: Vec<u8>) -> Self {
        bytes.make_ascii_uppercase();
        Self { bytes }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// True if every base is a plain or degenerate IUPAC nucleotide symbol.
    pub fn is_iupac(&self) -> bool {
        dna::iupac_alphabet().is_word(self.as_bytes())
    }

    pub fn reverse_complement(&self) -> Self {
        let out = dna::reverse_complement(self.as_bytes());
        Self { bytes: out }
    }

    pub fn complement(&self) -> Self {
        let mut out = Vec::with_capacity(self.bytes.len());
        for &base in self.as_bytes() {
            out.push(dna::complement(base));
        }
        Self { bytes: out }
    }
}

impl SeqBytes for DnaSeq {
    fn as_bytes(&self) -> &[u8] {
        DnaSeq::as_bytes(self)
    }

    fn from_bytes(bytes: Vec<u8>) -> ScreenResult<Self> {
        Ok(DnaSeq::new(bytes))
    }
}
