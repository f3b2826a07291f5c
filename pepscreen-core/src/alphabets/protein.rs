use crate::alphabets::Alphabet;

pub fn alphabet() -> Alphabet {
    Alphabet::new(&b"ARNDCEQGHILKMFPSTWYVarndceqghilkmfpstwyv"[..])
}

/// The 20 amino acids plus ambiguity codes, the unknown symbol `X` and the
/// stop symbol `*`.
pub fn iupac_alphabet() -> Alphabet {
    Alphabet::new(b"ABCDEFGHIKLMNPQRSTUVWXYZ*abcdefghiklmnpqrstuvwxyz")
}
