// File: src/core/keys.rs
use crate::core::types::{Pronunciation, RhymeKeys, VowelSet};

/// Derives every rhyme key of a pronunciation.
///
/// The key of order N is the suffix starting at the N-th-from-last
/// vowel-bearing syllable, space-joined. Index build and queries both go
/// through this function, so keys always compare by plain string equality.
/// O(k) where k is the number of syllables.
pub fn derive_keys(pronunciation: &Pronunciation, vowels: &VowelSet) -> RhymeKeys {
    let syllables = pronunciation.syllables();
    let pairs = syllables
        .iter()
        .enumerate()
        .filter(|(_, syl)| vowels.is_vowel(syl))
        .map(|(idx, _)| idx)
        .rev()
        .enumerate()
        .map(|(from_end, start)| (from_end + 1, syllables[start..].join(" ")))
        .collect();
    RhymeKeys::from_pairs(pairs)
}
