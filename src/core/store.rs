// File: src/core/store.rs
use crate::core::keys::derive_keys;
use crate::core::types::{Pronunciation, VariantRecord, VowelSet};
use crate::error::{Result, RhymeError};
use std::collections::BTreeMap;

/// Word → ordered pronunciation variants. Built once, never mutated.
///
/// Words are stored in canonical uppercase form and kept sorted so that
/// everything derived from the store is produced in a stable order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PronunciationStore {
    entries: BTreeMap<String, Vec<Pronunciation>>,
}

/// Canonical form of a word for lookups.
pub fn normalize_word(word: &str) -> String {
    word.to_uppercase()
}

impl PronunciationStore {
    /// Builds a store from bulk input. Words differing only in case are merged,
    /// keeping their variants in input order.
    pub fn from_entries<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (S, Vec<Pronunciation>)>,
        S: AsRef<str>,
    {
        let mut map: BTreeMap<String, Vec<Pronunciation>> = BTreeMap::new();
        for (word, variants) in entries {
            map.entry(normalize_word(word.as_ref()))
                .or_default()
                .extend(variants);
        }
        Self { entries: map }
    }

    pub fn contains(&self, word: &str) -> bool {
        self.entries.contains_key(&normalize_word(word))
    }

    /// True only for a word already in canonical form with an entry.
    pub fn contains_canonical(&self, word: &str) -> bool {
        self.entries.contains_key(word)
    }

    /// All variants of a word, in their original order.
    pub fn variants(&self, word: &str) -> Result<&[Pronunciation]> {
        self.entries
            .get(&normalize_word(word))
            .map(Vec::as_slice)
            .ok_or_else(|| RhymeError::UnknownWord(normalize_word(word)))
    }

    /// One variant, numbered from 1.
    pub fn variant(&self, word: &str, variant: usize) -> Result<&Pronunciation> {
        let variants = self.variants(word)?;
        if variant == 0 || variant > variants.len() {
            return Err(RhymeError::InvalidVariant {
                word: normalize_word(word),
                variant,
                available: variants.len(),
            });
        }
        Ok(&variants[variant - 1])
    }

    /// Tagged per-variant records for one word, keys derived on demand.
    pub fn records(&self, word: &str, vowels: &VowelSet) -> Result<Vec<VariantRecord>> {
        let word = normalize_word(word);
        let variants = self.variants(&word)?;
        Ok(variants
            .iter()
            .enumerate()
            .map(|(variant, pronunciation)| VariantRecord {
                word: word.clone(),
                variant,
                pronunciation: pronunciation.clone(),
                keys: derive_keys(pronunciation, vowels),
            })
            .collect())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Pronunciation])> {
        self.entries
            .iter()
            .map(|(word, variants)| (word.as_str(), variants.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn variant_count(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }

    pub fn syllable_count(&self) -> usize {
        self.entries
            .values()
            .flat_map(|variants| variants.iter().map(Pronunciation::len))
            .sum()
    }
}
