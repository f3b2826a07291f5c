//! Per-read scoring: six-frame translation, complexity filtering, k-mer
//! membership, and the coding/non-coding decision.

use crate::complexity::{is_low_complexity, DEFAULT_COMPLEXITY_THRESHOLD};
use crate::error::{ScreenError, ScreenResult};
use crate::filter::KmerMembership;
use crate::oracle::PeptideOracle;
use crate::seq::dna::DnaSeq;
use crate::seq::peptide::PeptideSeq;
use crate::seq::ReadingFrame;
use crate::translate::six_frame_translation_no_stops;
use std::fmt;

pub const DEFAULT_CODING_THRESHOLD: f64 = 0.5;

/// Why a read was or was not emitted as coding.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Verdict {
    /// A non-low-complexity frame exceeded the coding threshold.
    Coding,
    /// A frame was selected but its k-mer fraction did not clear the
    /// threshold, or no frame survived the stop filter at all.
    NonCoding,
    /// Every stop-free frame was flagged low-complexity.
    LowComplexity,
    /// Stop-free frames existed, but none was long enough to carry a single
    /// peptide k-mer.
    TooShort,
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Verdict::Coding => "coding",
            Verdict::NonCoding => "non_coding",
            Verdict::LowComplexity => "low_complexity",
            Verdict::TooShort => "too_short",
        };
        f.write_str(s)
    }
}

/// One row of the per-batch score table. Never mutated after creation.
#[derive(Clone, Debug, PartialEq)]
pub struct ReadScoreRecord {
    pub read_id: Box<str>,
    /// Selected frame; `None` when no frame was selectable.
    pub frame: Option<ReadingFrame>,
    /// K-mer hit fraction of the selected frame.
    pub kmer_fraction: Option<f64>,
    pub kmers_tested: usize,
    /// True when at least one stop-free frame was flagged low-complexity.
    pub low_complexity: bool,
    pub verdict: Verdict,
}

impl ReadScoreRecord {
    pub fn is_coding(&self) -> bool {
        self.verdict == Verdict::Coding
    }
}

/// A score record plus, for coding reads, the peptide to emit.
#[derive(Clone, Debug, PartialEq)]
pub struct ScoredRead {
    pub record: ReadScoreRecord,
    pub coding_peptide: Option<PeptideSeq>,
}

/// Thresholds threaded into the scorer and pipeline; no module-level state.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScoreConfig {
    /// A read is coding iff its selected fraction strictly exceeds this.
    pub coding_threshold: f64,
    /// Segments scoring at or below this are low-complexity.
    pub complexity_threshold: f64,
}

impl Default for ScoreConfig {
    fn default() -> Self {
        Self {
            coding_threshold: DEFAULT_CODING_THRESHOLD,
            complexity_threshold: DEFAULT_COMPLEXITY_THRESHOLD,
        }
    }
}

impl ScoreConfig {
    /// The filter's false-positive rate is the noise floor of every k-mer
    /// fraction; a coding threshold at or below it would classify noise as
    /// signal, so it is rejected up front.
    pub fn validate(&self, false_positive_rate: f64) -> ScreenResult<()> {
        if !(0.0..=1.0).contains(&self.coding_threshold) {
            return Err(ScreenError::InvalidThreshold {
                name: "coding",
                value: self.coding_threshold,
                reason: "must be within [0, 1]".into(),
            });
        }
        if self.coding_threshold <= false_positive_rate {
            return Err(ScreenError::InvalidThreshold {
                name: "coding",
                value: self.coding_threshold,
                reason: format!(
                    "must be strictly above the filter false-positive rate {false_positive_rate}"
                ),
            });
        }
        if !(0.0..=1.0).contains(&self.complexity_threshold) {
            return Err(ScreenError::InvalidThreshold {
                name: "complexity",
                value: self.complexity_threshold,
                reason: "must be within [0, 1]".into(),
            });
        }
        Ok(())
    }
}

pub struct ReadScorer<'a, F: KmerMembership> {
    oracle: &'a PeptideOracle<F>,
    config: ScoreConfig,
}

impl<'a, F: KmerMembership> ReadScorer<'a, F> {
    pub fn new(oracle: &'a PeptideOracle<F>, config: ScoreConfig) -> ScreenResult<Self> {
        config.validate(oracle.false_positive_rate())?;
        Ok(Self { oracle, config })
    }

    pub fn config(&self) -> ScoreConfig {
        self.config
    }

    /// Score one read. Pure with respect to the read and the oracle: two
    /// invocations on the same pair yield identical records.
    pub fn score_read(&self, read_id: &str, read: &DnaSeq) -> ScoredRead {
        let candidates = six_frame_translation_no_stops(read);

        let mut best: Option<(ReadingFrame, f64, usize, PeptideSeq)> = None;
        let mut any_low_complexity = false;
        let mut any_too_short = false;

        for (frame, peptide) in candidates.iter() {
            let segment = peptide.as_bytes();
            if is_low_complexity(segment, self.config.complexity_threshold) {
                any_low_complexity = true;
                continue;
            }
            let verdict = self.oracle.score(segment);
            let fraction = match verdict.fraction {
                Some(fraction) => fraction,
                None => {
                    any_too_short = true;
                    continue;
                }
            };
            let better = match &best {
                None => true,
                Some((best_frame, best_fraction, _, _)) => {
                    fraction > *best_fraction
                        || (fraction == *best_fraction
                            && frame.tiebreak_rank() < best_frame.tiebreak_rank())
                }
            };
            if better {
                best = Some((*frame, fraction, verdict.kmers_tested, peptide.clone()));
            }
        }

        match best {
            Some((frame, fraction, kmers_tested, peptide)) => {
                let coding = fraction > self.config.coding_threshold;
                let record = ReadScoreRecord {
                    read_id: read_id.into(),
                    frame: Some(frame),
                    kmer_fraction: Some(fraction),
                    kmers_tested,
                    low_complexity: any_low_complexity,
                    verdict: if coding {
                        Verdict::Coding
                    } else {
                        Verdict::NonCoding
                    },
                };
                ScoredRead {
                    record,
                    coding_peptide: coding.then_some(peptide),
                }
            }
            None => {
                let verdict = if any_too_short {
                    Verdict::TooShort
                } else if any_low_complexity {
                    Verdict::LowComplexity
                } else {
                    Verdict::NonCoding
                };
                ScoredRead {
                    record: ReadScoreRecord {
                        read_id: read_id.into(),
                        frame: None,
                        kmer_fraction: None,
                        kmers_tested: 0,
                        low_complexity: any_low_complexity,
                        verdict,
                    },
                    coding_peptide: None,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::ExactPeptideSet;
    use crate::seq::SeqRecord;

    const FIXTURE: &[u8] = b"CGCTTGCTTAATACTGACATCAATAATATTAGGAAAATCGCAATATAACTGTAAATCCTGTTCTGTC";
    const FIXTURE_FRAME2: &[u8] = b"ACLILTSIILGKSQYNCKSCSV";

    fn oracle_from_peptides(peptides: &[&[u8]], ksize: usize) -> PeptideOracle<ExactPeptideSet> {
        let records: Vec<SeqRecord<PeptideSeq>> = peptides
            .iter()
            .enumerate()
            .map(|(i, p)| SeqRecord::new(format!("p{i}"), PeptideSeq::new(p.to_vec()).unwrap()))
            .collect();
        PeptideOracle::new(ExactPeptideSet::from_records(&records, ksize).unwrap()).unwrap()
    }

    #[test]
    fn coding_read_selects_matching_frame() {
        let oracle = oracle_from_peptides(&[FIXTURE_FRAME2], 7);
        let scorer = ReadScorer::new(&oracle, ScoreConfig::default()).unwrap();
        let scored = scorer.score_read("read1", &DnaSeq::new(FIXTURE.to_vec()));

        let record = &scored.record;
        assert_eq!(record.verdict, Verdict::Coding);
        assert_eq!(record.frame.unwrap().number(), 2);
        assert_eq!(record.kmer_fraction, Some(1.0));
        assert_eq!(record.kmers_tested, FIXTURE_FRAME2.len() - 7 + 1);
        assert_eq!(
            scored.coding_peptide.unwrap().as_bytes(),
            FIXTURE_FRAME2
        );
    }

    #[test]
    fn unmatched_read_is_non_coding() {
        let oracle = oracle_from_peptides(&[b"WWWWWWWWWWWW"], 7);
        let scorer = ReadScorer::new(&oracle, ScoreConfig::default()).unwrap();
        let scored = scorer.score_read("read1", &DnaSeq::new(FIXTURE.to_vec()));

        assert_eq!(scored.record.verdict, Verdict::NonCoding);
        assert_eq!(scored.record.kmer_fraction, Some(0.0));
        assert!(scored.coding_peptide.is_none());
        // a frame is still named so the table shows what was evaluated
        assert!(scored.record.frame.is_some());
    }

    #[test]
    fn low_complexity_frame_never_selected() {
        // poly-A read translates to poly-K / poly-F in every frame; even
        // with every poly-K k-mer in the reference the read is rejected
        let oracle = oracle_from_peptides(&[b"KKKKKKKKKK"], 3);
        let scorer = ReadScorer::new(&oracle, ScoreConfig::default()).unwrap();
        let read = DnaSeq::new(b"AAAAAAAAAAAAAAAAAAAAAAAA".to_vec());
        let scored = scorer.score_read("polya", &read);

        assert_eq!(scored.record.verdict, Verdict::LowComplexity);
        assert!(scored.record.frame.is_none());
        assert!(scored.record.low_complexity);
        assert!(scored.coding_peptide.is_none());
    }

    #[test]
    fn short_read_too_short_for_kmers() {
        let oracle = oracle_from_peptides(&[b"ACDEFGHIKLMNPQ"], 10);
        let scorer = ReadScorer::new(&oracle, ScoreConfig::default()).unwrap();
        // GATTACA translates to 2-residue peptides at best
        let scored = scorer.score_read("tiny", &DnaSeq::new(b"GATTACA".to_vec()));

        assert_eq!(scored.record.verdict, Verdict::TooShort);
        assert!(scored.record.frame.is_none());
        assert_eq!(scored.record.kmer_fraction, None);
    }

    #[test]
    fn empty_read_is_low_complexity() {
        let oracle = oracle_from_peptides(&[b"ACDEFGH"], 3);
        let scorer = ReadScorer::new(&oracle, ScoreConfig::default()).unwrap();
        let scored = scorer.score_read("empty", &DnaSeq::new(Vec::new()));

        assert_eq!(scored.record.verdict, Verdict::LowComplexity);
        assert!(scored.record.frame.is_none());
    }

    #[test]
    fn coding_threshold_is_strict() {
        // read frame +2 has 16 k-mers, half of which are in the reference
        let oracle = oracle_from_peptides(&[&FIXTURE_FRAME2[..14]], 7);
        let scorer = ReadScorer::new(
            &oracle,
            ScoreConfig {
                coding_threshold: 0.5,
                ..ScoreConfig::default()
            },
        )
        .unwrap();
        let scored = scorer.score_read("read1", &DnaSeq::new(FIXTURE.to_vec()));
        let fraction = scored.record.kmer_fraction.unwrap();
        assert_eq!(fraction, 0.5);
        // exactly at the threshold is not coding
        assert_eq!(scored.record.verdict, Verdict::NonCoding);
    }

    #[test]
    fn scoring_is_idempotent() {
        let oracle = oracle_from_peptides(&[FIXTURE_FRAME2], 7);
        let scorer = ReadScorer::new(&oracle, ScoreConfig::default()).unwrap();
        let read = DnaSeq::new(FIXTURE.to_vec());
        assert_eq!(
            scorer.score_read("read1", &read),
            scorer.score_read("read1", &read)
        );
    }

    #[test]
    fn config_rejects_threshold_at_noise_floor() {
        let config = ScoreConfig {
            coding_threshold: 0.01,
            ..ScoreConfig::default()
        };
        assert!(config.validate(0.05).is_err());
        assert!(config.validate(0.001).is_ok());
        assert!(ScoreConfig {
            coding_threshold: 1.5,
            ..ScoreConfig::default()
        }
        .validate(0.0)
        .is_err());
        assert!(ScoreConfig {
            complexity_threshold: -0.1,
            ..ScoreConfig::default()
        }
        .validate(0.0)
        .is_err());
    }
}
