//! Compositional complexity of a sequence, nucleotide or peptide alike.
//!
//! The score is the fraction of adjacent positions whose symbol differs from
//! the previous one, over the total sequence length (the fastp measure). A
//! homopolymer scores near 0, a high-entropy sequence approaches
//! (len - 1) / len. Alphabet-agnostic: only symbol identity matters.

pub const DEFAULT_COMPLEXITY_THRESHOLD: f64 = 0.3;

/// Complexity score in [0, 1). Sequences shorter than 2 symbols have no
/// transition to measure and score 0.0.
pub fn complexity(seq: &[u8]) -> f64 {
    if seq.len() < 2 {
        return 0.0;
    }
    let transitions = seq.windows(2).filter(|pair| pair[0] != pair[1]).count();
    transitions as f64 / seq.len() as f64
}

/// A sequence is low-complexity when its score is at or below `threshold`.
pub fn is_low_complexity(seq: &[u8], threshold: f64) -> bool {
    complexity(seq) <= threshold
}
