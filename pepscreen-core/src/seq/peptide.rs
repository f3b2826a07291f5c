use crate::alphabets::protein;
use crate::error::{ScreenError, ScreenResult};
use crate::seq::traits::SeqBytes;
use memchr::{memchr, memchr_iter};
use std::fmt;

pub const STOP: u8 = b'*';
pub const UNKNOWN_AA: u8 = b'X';

/// An amino-acid sequence over the IUPAC protein alphabet plus the stop
/// symbol `*` and the unknown symbol `X`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct PeptideSeq {
    bytes: Vec<u8>,
}

impl PeptideSeq {
    pub fn new(bytes: Vec<u8>) -> ScreenResult<Self> {
        let alphabet = protein::iupac_alphabet();
        for (pos, &b) in bytes.iter().enumerate() {
            if !alphabet.contains(b) {
                return Err(ScreenError::InvalidChar { ch: b as char, pos });
            }
        }
        Ok(Self { bytes })
    }

    #[inline]
    pub(crate) fn from_bytes_unchecked(bytes: Vec<u8>) -> Self {
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

    /// True if the translation contains a stop symbol at any position.
    pub fn has_stop(&self) -> bool {
        memchr(STOP, &self.bytes).is_some()
    }

    /// Maximal stop-free subsequences, in order. A translation with an
    /// internal stop is biologically two (or more) fragments; the segment is
    /// the unit that gets complexity-checked and k-mer-scored. Empty
    /// fragments between consecutive stops are dropped.
    pub fn segments(&self) -> Vec<&[u8]> {
        let mut out = Vec::new();
        let mut start = 0usize;
        for stop in memchr_iter(STOP, &self.bytes) {
            if stop > start {
                out.push(&self.bytes[start..stop]);
            }
            start = stop + 1;
        }
        if start < self.bytes.len() {
            out.push(&self.bytes[start..]);
        }
        out
    }
}

impl fmt::Display for PeptideSeq {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // the alphabet is pure ASCII
        f.write_str(&String::from_utf8_lossy(&self.bytes))
    }
}

impl SeqBytes for PeptideSeq {
    fn as_bytes(&self) -> &[u8] {
        PeptideSeq::as_bytes(self)
    }

    fn from_bytes(bytes: Vec<u8>) -> ScreenResult<Self> {
        PeptideSeq::new(bytes)
    }
}
