//! Peptide k-mer membership backings.
//!
//! The scoring side only sees the [`KmerMembership`] capability: a k-mer
//! length, a declared false-positive rate, and a membership query. Two
//! backings are provided: an exact hash set (false-positive rate 0.0, the
//! test and small-reference path) and a Bloom filter sized for a target
//! false-positive rate over genome-scale peptide vocabularies.

use crate::error::{ScreenError, ScreenResult};
use crate::seq::peptide::PeptideSeq;
use crate::seq::SeqRecord;
use bit_set::BitSet;
use std::collections::hash_map::DefaultHasher;
use std::collections::HashSet;
use std::hash::{Hash, Hasher};

/// Approximate-membership capability over peptide k-mers.
pub trait KmerMembership {
    fn ksize(&self) -> usize;

    /// Declared false-positive rate of membership queries. A returned `true`
    /// is wrong with at most this probability; `false` is always right.
    fn false_positive_rate(&self) -> f64;

    fn contains(&self, kmer: &[u8]) -> bool;
}

/// Exact in-memory k-mer set.
#[derive(Clone, Debug, Default)]
pub struct ExactPeptideSet {
    ksize: usize,
    kmers: HashSet<Box<[u8]>>,
}

impl ExactPeptideSet {
    pub fn new(ksize: usize) -> ScreenResult<Self> {
        if ksize == 0 {
            return Err(ScreenError::InvalidKmerSize { ksize });
        }
        Ok(Self {
            ksize,
            kmers: HashSet::new(),
        })
    }

    pub fn from_records(
        records: &[SeqRecord<PeptideSeq>],
        ksize: usize,
    ) -> ScreenResult<Self> {
        let mut set = Self::new(ksize)?;
        for record in records {
            for segment in record.seq().segments() {
                for kmer in kmer_windows(segment, ksize) {
                    set.insert(kmer)?;
                }
            }
        }
        if set.kmers.is_empty() {
            return Err(ScreenError::EmptyReference { ksize });
        }
        Ok(set)
    }

    /// A k-mer of the wrong length could never match a query window, so it
    /// is rejected rather than stored.
    pub fn insert(&mut self, kmer: &[u8]) -> ScreenResult<()> {
        if kmer.len() != self.ksize {
            return Err(ScreenError::KmerLengthMismatch {
                expected: self.ksize,
                actual: kmer.len(),
            });
        }
        self.kmers.insert(kmer.into());
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.kmers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.kmers.is_empty()
    }
}

impl KmerMembership for ExactPeptideSet {
    fn ksize(&self) -> usize {
        self.ksize
    }

    fn false_positive_rate(&self) -> f64 {
        0.0
    }

    fn contains(&self, kmer: &[u8]) -> bool {
        self.kmers.contains(kmer)
    }
}

/// Bloom filter over peptide k-mers.
///
/// Sized from the expected item count and a target false-positive rate with
/// the standard formulas m = -n ln p / (ln 2)^2, h = (m / n) ln 2. Queries
/// use double hashing: the i-th probe index is h1 + i * h2 mod m.
#[derive(Clone, Debug)]
pub struct BloomPeptideSet {
    ksize: usize,
    bits: BitSet,
    nbits: usize,
    nhashes: u32,
    target_fpr: f64,
}

impl BloomPeptideSet {
    pub fn with_capacity(ksize: usize, expected_items: usize, target_fpr: f64) -> ScreenResult<Self> {
        if ksize == 0 {
            return Err(ScreenError::InvalidKmerSize { ksize });
        }
        if !(target_fpr > 0.0 && target_fpr < 1.0) {
            return Err(ScreenError::InvalidFalsePositiveRate { rate: target_fpr });
        }
        let n = expected_items.max(1) as f64;
        let ln2 = std::f64::consts::LN_2;
        let nbits = (-(n * target_fpr.ln()) / (ln2 * ln2)).ceil() as usize;
        let nbits = nbits.max(64);
        let nhashes = ((nbits as f64 / n) * ln2).round().max(1.0) as u32;
        Ok(Self {
            ksize,
            bits: BitSet::with_capacity(nbits),
            nbits,
            nhashes,
            target_fpr,
        })
    }

    pub fn from_records(
        records: &[SeqRecord<PeptideSeq>],
        ksize: usize,
        target_fpr: f64,
    ) -> ScreenResult<Self> {
        if ksize == 0 {
            return Err(ScreenError::InvalidKmerSize { ksize });
        }
        let expected: usize = records
            .iter()
            .flat_map(|r| r.seq().segments())
            .map(|segment| segment.len().saturating_sub(ksize - 1))
            .sum();
        if expected == 0 {
            return Err(ScreenError::EmptyReference { ksize });
        }
        let mut filter = Self::with_capacity(ksize, expected, target_fpr)?;
        for record in records {
            for segment in record.seq().segments() {
                for kmer in kmer_windows(segment, ksize) {
                    filter.insert(kmer)?;
                }
            }
        }
        Ok(filter)
    }

    pub fn insert(&mut self, kmer: &[u8]) -> ScreenResult<()> {
        if kmer.len() != self.ksize {
            return Err(ScreenError::KmerLengthMismatch {
                expected: self.ksize,
                actual: kmer.len(),
            });
        }
        let (h1, h2) = hash_pair(kmer);
        for i in 0..self.nhashes {
            self.bits.insert(self.probe(h1, h2, i));
        }
        Ok(())
    }

    #[inline]
    fn probe(&self, h1: u64, h2: u64, i: u32) -> usize {
        (h1.wrapping_add((i as u64).wrapping_mul(h2)) % self.nbits as u64) as usize
    }

    pub fn nbits(&self) -> usize {
        self.nbits
    }

    pub fn nhashes(&self) -> u32 {
        self.nhashes
    }
}

impl KmerMembership for BloomPeptideSet {
    fn ksize(&self) -> usize {
        self.ksize
    }

    fn false_positive_rate(&self) -> f64 {
        self.target_fpr
    }

    fn contains(&self, kmer: &[u8]) -> bool {
        let (h1, h2) = hash_pair(kmer);
        (0..self.nhashes).all(|i| self.bits.contains(self.probe(h1, h2, i)))
    }
}

/// Overlapping k-mer windows of a segment; empty when the segment is shorter
/// than k.
pub fn kmer_windows(segment: &[u8], ksize: usize) -> impl Iterator<Item = &[u8]> {
    segment.windows(ksize)
}

fn hash_pair(kmer: &[u8]) -> (u64, u64) {
    let mut hasher = DefaultHasher::new();
    kmer.hash(&mut hasher);
    let h1 = hasher.finish();
    // extend the same hasher state for the second hash; force h2 odd so the
    // probe stride never collapses
    0xa5a5_5a5a_u64.hash(&mut hasher);
    let h2 = hasher.finish() | 1;
    (h1, h2)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn peptide_records(seqs: &[&[u8]]) -> Vec<SeqRecord<PeptideSeq>> {
        seqs.iter()
            .enumerate()
            .map(|(i, s)| {
                SeqRecord::new(
                    format!("ref{i}"),
                    PeptideSeq::new(s.to_vec()).unwrap(),
                )
            })
            .collect()
    }

    #[test]
    fn exact_set_membership() {
        let records = peptide_records(&[b"ACDEFGH"]);
        let set = ExactPeptideSet::from_records(&records, 3).unwrap();
        assert_eq!(set.len(), 5);
        assert!(set.contains(b"ACD"));
        assert!(set.contains(b"FGH"));
        assert!(!set.contains(b"HGF"));
        assert_eq!(set.false_positive_rate(), 0.0);
    }

    #[test]
    fn exact_set_splits_reference_at_stops() {
        let records = peptide_records(&[b"ACD*EFG"]);
        let set = ExactPeptideSet::from_records(&records, 3).unwrap();
        assert!(set.contains(b"ACD"));
        assert!(set.contains(b"EFG"));
        // no k-mer spans the stop
        assert!(!set.contains(b"CD*"));
        assert!(!set.contains(b"D*E"));
    }

    #[test]
    fn wrong_length_kmer_rejected() {
        let mut set = ExactPeptideSet::new(3).unwrap();
        assert!(matches!(
            set.insert(b"AC"),
            Err(ScreenError::KmerLengthMismatch {
                expected: 3,
                actual: 2
            })
        ));
        assert!(set.insert(b"ACDE").is_err());
        set.insert(b"ACD").unwrap();
        assert_eq!(set.len(), 1);
        // a wrong-length insert never lands in the set
        assert!(!set.contains(b"AC"));

        let mut bloom = BloomPeptideSet::with_capacity(3, 8, 0.01).unwrap();
        assert!(bloom.insert(b"AC").is_err());
        bloom.insert(b"ACD").unwrap();
        assert!(bloom.contains(b"ACD"));
    }

    #[test]
    fn zero_ksize_rejected() {
        assert!(matches!(
            ExactPeptideSet::new(0),
            Err(ScreenError::InvalidKmerSize { ksize: 0 })
        ));
        assert!(BloomPeptideSet::with_capacity(0, 10, 0.01).is_err());
    }

    #[test]
    fn empty_reference_rejected() {
        let records = peptide_records(&[b"AC"]);
        assert!(matches!(
            ExactPeptideSet::from_records(&records, 5),
            Err(ScreenError::EmptyReference { ksize: 5 })
        ));
        assert!(BloomPeptideSet::from_records(&records, 5, 0.01).is_err());
    }

    #[test]
    fn bloom_fpr_must_be_a_probability() {
        assert!(BloomPeptideSet::with_capacity(3, 10, 0.0).is_err());
        assert!(BloomPeptideSet::with_capacity(3, 10, 1.0).is_err());
        assert!(BloomPeptideSet::with_capacity(3, 10, 0.5).is_ok());
    }

    #[test]
    fn bloom_has_no_false_negatives() {
        let records = peptide_records(&[b"MKVLASTQWERTYIPASDFGH"]);
        let bloom = BloomPeptideSet::from_records(&records, 4, 0.01).unwrap();
        let exact = ExactPeptideSet::from_records(&records, 4).unwrap();
        for record in &records {
            for segment in record.seq().segments() {
                for kmer in kmer_windows(segment, 4) {
                    assert!(bloom.contains(kmer));
                    assert!(exact.contains(kmer));
                }
            }
        }
        assert_eq!(bloom.false_positive_rate(), 0.01);
    }

    #[test]
    fn bloom_sizing_grows_with_items_and_precision() {
        let small = BloomPeptideSet::with_capacity(3, 100, 0.01).unwrap();
        let more_items = BloomPeptideSet::with_capacity(3, 1000, 0.01).unwrap();
        let more_precise = BloomPeptideSet::with_capacity(3, 100, 0.0001).unwrap();
        assert!(more_items.nbits() > small.nbits());
        assert!(more_precise.nbits() > small.nbits());
        assert!(small.nhashes() >= 1);
    }

    #[test]
    fn kmer_windows_short_segment_is_empty() {
        assert_eq!(kmer_windows(b"AB", 3).count(), 0);
        assert_eq!(kmer_windows(b"ABC", 3).count(), 1);
        assert_eq!(kmer_windows(b"ABCD", 3).count(), 2);
    }
}
