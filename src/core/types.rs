// src/core/types.rs
use serde::{Deserialize, Serialize};
use std::fmt;

/// A rhyme order: 1 = single, 2 = double, 3 = dactylic, and so on.
pub type RhymeOrder = usize;

/// Human-readable name of a rhyme order.
pub fn order_label(order: RhymeOrder) -> String {
    match order {
        1 => "single".to_string(),
        2 => "double".to_string(),
        3 => "dactylic".to_string(),
        n => format!("order {}", n),
    }
}

/// The set of leading characters that mark a syllable symbol as vowel-bearing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VowelSet {
    chars: Vec<char>,
}

impl VowelSet {
    pub fn new(chars: &str) -> Self {
        let mut chars: Vec<char> = chars.chars().collect();
        chars.sort_unstable();
        chars.dedup();
        Self { chars }
    }

    /// True if the syllable's first character is in the set. Empty symbols never are.
    pub fn is_vowel(&self, syllable: &str) -> bool {
        syllable
            .chars()
            .next()
            .map_or(false, |c| self.chars.binary_search(&c).is_ok())
    }

    pub fn as_string(&self) -> String {
        self.chars.iter().collect()
    }
}

impl Default for VowelSet {
    fn default() -> Self {
        Self::new("AEIOU")
    }
}

impl fmt::Display for VowelSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_string())
    }
}

/// One phonetic transcription of a word, e.g. `K EH1 R IH0 NG`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Pronunciation(Vec<String>);

impl Pronunciation {
    pub fn new<I, S>(syllables: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(syllables.into_iter().map(Into::into).collect())
    }

    pub fn syllables(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Pronunciation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join(" "))
    }
}

/// The rhyme keys of one pronunciation, ascending by order.
///
/// Orders are always `1..=len()`, so this is a short sequence of pairs rather
/// than a map.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RhymeKeys(Vec<(RhymeOrder, String)>);

impl RhymeKeys {
    pub(crate) fn from_pairs(pairs: Vec<(RhymeOrder, String)>) -> Self {
        Self(pairs)
    }

    pub fn get(&self, order: RhymeOrder) -> Option<&str> {
        self.0
            .iter()
            .find(|(o, _)| *o == order)
            .map(|(_, key)| key.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (RhymeOrder, &str)> {
        self.0.iter().map(|(order, key)| (*order, key.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// A single pronunciation variant of a word together with its derived keys.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantRecord {
    pub word: String,
    /// 0-based position in the word's variant list.
    pub variant: usize,
    pub pronunciation: Pronunciation,
    pub keys: RhymeKeys,
}

/// All words rhyming with a query word at one order, sorted ascending.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RhymeSet {
    pub order: RhymeOrder,
    pub words: Vec<String>,
}

impl RhymeSet {
    pub fn label(&self) -> String {
        order_label(self.order)
    }
}
