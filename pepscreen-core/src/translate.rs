//! Six-frame translation of nucleotide reads.
//!
//! Forward frames translate the read at codon offsets 0, 1 and 2; reverse
//! frames apply the same offsets to the reverse complement. Trailing bases
//! that do not fill a codon are dropped, and any codon containing a base
//! outside ACGT translates to the unknown symbol `X`.

use crate::seq::dna::DnaSeq;
use crate::seq::peptide::PeptideSeq;
use crate::seq::{ReadingFrame, Strand};
use std::sync::LazyLock;

/// Translate a nucleotide slice in frame 0, truncating trailing bases.
pub fn translate(bytes: &[u8]) -> PeptideSeq {
    PeptideSeq::from_bytes_unchecked(translate_to_vec(bytes))
}

/// All six reading frames of a read, in the fixed order +1,+2,+3,-1,-2,-3.
///
/// Always yields exactly six entries regardless of read length; frames whose
/// offset starts past the end of the read translate to an empty peptide.
/// Pure: depends only on the input sequence.
pub fn six_frame_translation(dna: &DnaSeq) -> [(ReadingFrame, PeptideSeq); 6] {
    let forward = dna.as_bytes();
    let reverse = dna.reverse_complement();

    ReadingFrame::ALL.map(|frame| {
        let strand_bytes = match frame.strand {
            Strand::Forward => forward,
            Strand::Reverse => reverse.as_bytes(),
        };
        let offset = frame.offset as usize;
        let peptide = if strand_bytes.len() > offset {
            translate(&strand_bytes[offset..])
        } else {
            PeptideSeq::from_bytes_unchecked(Vec::new())
        };
        (frame, peptide)
    })
}

/// The frames of [`six_frame_translation`] whose translation contains no
/// stop symbol at any position. A stop at position 0 excludes the frame like
/// any other; empty translations (sub-codon reads) are kept and left for the
/// complexity check to flag.
pub fn six_frame_translation_no_stops(dna: &DnaSeq) -> Vec<(ReadingFrame, PeptideSeq)> {
    six_frame_translation(dna)
        .into_iter()
        .filter(|(_, peptide)| !peptide.has_stop())
        .collect()
}

fn translate_to_vec(bytes: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(bytes.len() / 3);
    for codon in bytes.chunks_exact(3) {
        let i1 = BASE_INDEX[codon[0] as usize];
        let i2 = BASE_INDEX[codon[1] as usize];
        let i3 = BASE_INDEX[codon[2] as usize];
        let aa = if i1 < 4 && i2 < 4 && i3 < 4 {
            let idx = ((i1 as usize) << 4) | ((i2 as usize) << 2) | (i3 as usize);
            CODON_TABLE[idx]
        } else {
            b'X'
        };
        out.push(aa);
    }
    out
}

static BASE_INDEX: LazyLock<[u8; 256]> = LazyLock::new(|| {
    let mut map = [255u8; 256];
    map[b'A' as usize] = 0;
    map[b'C' as usize] = 1;
    map[b'G' as usize] = 2;
    map[b'T' as usize] = 3;
    map[b'a' as usize] = 0;
    map[b'c' as usize] = 1;
    map[b'g' as usize] = 2;
    map[b't' as usize] = 3;
    map
});

// Standard genetic code indexed by (base1 << 4) | (base2 << 2) | base3 with
// A=0, C=1, G=2, T=3.
const CODON_TABLE: [u8; 64] = *b"KNKNTTTTRSRSIIMIQHQHPPPPRRRRLLLLEDEDAAAAGGGGVVVV*Y*YSSSS*CWCLFLF";

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::HashMap;

    const FIXTURE: &[u8] = b"CGCTTGCTTAATACTGACATCAATAATATTAGGAAAATCGCAATATAACTGTAAATCCTGTTCTGTC";

    fn frames_by_number(dna: &DnaSeq) -> HashMap<i8, String> {
        six_frame_translation(dna)
            .into_iter()
            .map(|(f, p)| (f.number(), p.to_string()))
            .collect()
    }

    #[test]
    fn gattaca_forward_frames() {
        let frames = frames_by_number(&DnaSeq::new(b"GATTACA".to_vec()));
        assert_eq!(frames[&1], "DY");
        assert_eq!(frames[&2], "IT");
        assert_eq!(frames[&3], "L");
    }

    #[test]
    fn fixture_all_six_frames() {
        let frames = frames_by_number(&DnaSeq::new(FIXTURE.to_vec()));
        assert_eq!(frames[&1], "RLLNTDINNIRKIAI*L*ILFC");
        assert_eq!(frames[&2], "ACLILTSIILGKSQYNCKSCSV");
        assert_eq!(frames[&3], "LA*Y*HQ*Y*ENRNITVNPVL");
        assert_eq!(frames[&-1], "DRTGFTVILRFS*YY*CQY*AS");
        assert_eq!(frames[&-2], "TEQDLQLYCDFPNIIDVSIKQA");
        assert_eq!(frames[&-3], "QNRIYSYIAIFLILLMSVLSK");
    }

    #[test]
    fn fixture_no_stop_frames() {
        let survivors: HashMap<i8, String> =
            six_frame_translation_no_stops(&DnaSeq::new(FIXTURE.to_vec()))
                .into_iter()
                .map(|(f, p)| (f.number(), p.to_string()))
                .collect();
        assert_eq!(survivors.len(), 3);
        assert_eq!(survivors[&2], "ACLILTSIILGKSQYNCKSCSV");
        assert_eq!(survivors[&-2], "TEQDLQLYCDFPNIIDVSIKQA");
        assert_eq!(survivors[&-3], "QNRIYSYIAIFLILLMSVLSK");
    }

    #[test]
    fn internal_stop_frame_excluded() {
        // frame +1 of TAAACG is '*T'
        let dna = DnaSeq::new(b"TAAACG".to_vec());
        let survivors = six_frame_translation_no_stops(&dna);
        assert!(survivors.iter().all(|(f, _)| f.number() != 1));
    }

    #[test]
    fn short_reads_still_attempt_six_frames() {
        for read in [&b""[..], b"A", b"AC", b"ACG"] {
            let frames = six_frame_translation(&DnaSeq::new(read.to_vec()));
            assert_eq!(frames.len(), 6);
        }
        // sub-codon read: every frame empty
        let frames = six_frame_translation(&DnaSeq::new(b"AC".to_vec()));
        assert!(frames.iter().all(|(_, p)| p.is_empty()));
    }

    #[test]
    fn unknown_codon_translates_to_x() {
        let frames = frames_by_number(&DnaSeq::new(b"ATGNNNATG".to_vec()));
        assert_eq!(frames[&1], "MXM");
    }

    #[test]
    fn reverse_frames_mirror_forward_of_revcomp() {
        let dna = DnaSeq::new(FIXTURE.to_vec());
        let rc = dna.reverse_complement();
        let frames = frames_by_number(&dna);
        let rc_frames = frames_by_number(&rc);
        for n in 1..=3i8 {
            assert_eq!(frames[&-n], rc_frames[&n]);
        }
    }

    proptest! {
        #[test]
        fn always_exactly_six_frames(
            read in prop::collection::vec(
                prop_oneof![Just(b'A'), Just(b'C'), Just(b'G'), Just(b'T'), Just(b'N')],
                0..200,
            )
        ) {
            let frames = six_frame_translation(&DnaSeq::new(read));
            prop_assert_eq!(frames.len(), 6);
            let numbers: Vec<i8> = frames.iter().map(|(f, _)| f.number()).collect();
            prop_assert_eq!(numbers, vec![1, 2, 3, -1, -2, -3]);
        }

        #[test]
        fn translation_is_pure(
            read in prop::collection::vec(
                prop_oneof![Just(b'A'), Just(b'C'), Just(b'G'), Just(b'T')],
                0..120,
            )
        ) {
            let dna = DnaSeq::new(read);
            prop_assert_eq!(six_frame_translation(&dna), six_frame_translation(&dna));
        }
    }
}
