use crate::error::{ScreenError, ScreenResult};
use crate::filter::{kmer_windows, KmerMembership};

/// Outcome of scoring one stop-free peptide segment against the reference
/// k-mer filter.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MembershipVerdict {
    /// Fraction of the segment's k-mers found in the filter, in [0, 1].
    /// `None` when the segment is shorter than k (nothing to test).
    pub fraction: Option<f64>,
    pub kmers_tested: usize,
    pub kmers_found: usize,
    /// The filter's declared false-positive rate at query time. Constant per
    /// oracle, recorded so callers can reason about the noise floor.
    pub false_positive_rate: f64,
}

/// Wraps a pre-built membership filter and scores peptide segments against
/// it. Because the filter is approximate, a fraction of 1.0 is a statistical
/// signal, not proof of a true match.
#[derive(Clone, Debug)]
pub struct PeptideOracle<F: KmerMembership> {
    filter: F,
}

impl<F: KmerMembership> PeptideOracle<F> {
    /// A misconfigured filter poisons every downstream score, so it is
    /// rejected here rather than detected per query.
    pub fn new(filter: F) -> ScreenResult<Self> {
        if filter.ksize() == 0 {
            return Err(ScreenError::InvalidKmerSize {
                ksize: filter.ksize(),
            });
        }
        let rate = filter.false_positive_rate();
        if !(0.0..1.0).contains(&rate) {
            return Err(ScreenError::InvalidFalsePositiveRate { rate });
        }
        Ok(Self { filter })
    }

    pub fn ksize(&self) -> usize {
        self.filter.ksize()
    }

    pub fn false_positive_rate(&self) -> f64 {
        self.filter.false_positive_rate()
    }

    pub fn score(&self, segment: &[u8]) -> MembershipVerdict {
        let ksize = self.filter.ksize();
        if segment.len() < ksize {
            return MembershipVerdict {
                fraction: None,
                kmers_tested: 0,
                kmers_found: 0,
                false_positive_rate: self.false_positive_rate(),
            };
        }
        let mut tested = 0usize;
        let mut found = 0usize;
        for kmer in kmer_windows(segment, ksize) {
            tested += 1;
            if self.filter.contains(kmer) {
                found += 1;
            }
        }
        MembershipVerdict {
            fraction: Some(found as f64 / tested as f64),
            kmers_tested: tested,
            kmers_found: found,
            false_positive_rate: self.false_positive_rate(),
        }
    }
}
