// File: src/inspect.rs
use crate::core::index::RhymeIndex;
use crate::core::store::PronunciationStore;
use crate::core::types::{RhymeOrder, VowelSet};
use std::collections::BTreeMap;
use std::fmt;

const MAX_VALUE_WIDTH: usize = 80;

/// Size statistics of one order of the index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderStats {
    pub order: RhymeOrder,
    pub keys: usize,
    pub word_refs: usize,
    /// Key with the most words, ties broken by key.
    pub largest: Option<(String, usize)>,
    /// Group size → number of keys with that many word references.
    pub group_sizes: BTreeMap<usize, usize>,
}

/// Diagnostic summary of a rhyming dictionary. Only meant for humans.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Inspection {
    pub vowels: String,
    pub words: usize,
    pub variants: usize,
    pub syllables: usize,
    /// Variant-list length → number of words with that many variants.
    pub variants_per_word: BTreeMap<usize, usize>,
    pub orders: Vec<OrderStats>,
    pub sample: Vec<String>,
}

impl Inspection {
    pub fn collect(store: &PronunciationStore, index: &RhymeIndex, vowels: &VowelSet) -> Self {
        let orders = index
            .orders()
            .map(|(order, groups)| OrderStats {
                order,
                keys: groups.len(),
                word_refs: groups.values().map(Vec::len).sum(),
                largest: groups
                    .iter()
                    .max_by(|a, b| a.1.len().cmp(&b.1.len()).then_with(|| b.0.cmp(a.0)))
                    .map(|(key, words)| (key.clone(), words.len())),
                group_sizes: histogram(groups.values().map(Vec::len)),
            })
            .collect();
        let sample = store
            .iter()
            .take(8)
            .map(|(word, variants)| {
                let shown: Vec<String> = variants.iter().map(ToString::to_string).collect();
                format!("{} [{}]", word, shown.join(" | "))
            })
            .collect();
        Self {
            vowels: vowels.as_string(),
            words: store.len(),
            variants: store.variant_count(),
            syllables: store.syllable_count(),
            variants_per_word: histogram(store.iter().map(|(_, variants)| variants.len())),
            orders,
            sample,
        }
    }
}

fn histogram(lengths: impl Iterator<Item = usize>) -> BTreeMap<usize, usize> {
    let mut counts = BTreeMap::new();
    for len in lengths {
        *counts.entry(len).or_insert(0) += 1;
    }
    counts
}

/// `size:count` pairs, smallest size first.
fn render_histogram(counts: &BTreeMap<usize, usize>) -> String {
    let parts: Vec<String> = counts
        .iter()
        .map(|(size, count)| format!("{}:{}", size, count))
        .collect();
    ellipses(&parts.join(", "))
}

fn ellipses(value: &str) -> String {
    if value.chars().count() <= MAX_VALUE_WIDTH {
        return value.to_string();
    }
    let head: String = value.chars().take(MAX_VALUE_WIDTH - 3).collect();
    format!("{}...", head)
}

impl fmt::Display for Inspection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Vowels: {}", self.vowels)?;
        writeln!(
            f,
            "Entries: {} words, {} variants, {} syllables",
            self.words, self.variants, self.syllables
        )?;
        writeln!(
            f,
            "Entries variants per word: {}",
            render_histogram(&self.variants_per_word)
        )?;
        writeln!(f, "Entries sample: {}", ellipses(&self.sample.join(", ")))?;
        writeln!(f, "Perfect: {} orders", self.orders.len())?;
        for stats in &self.orders {
            write!(
                f,
                "Perfect order {}: {} keys, {} words",
                stats.order, stats.keys, stats.word_refs
            )?;
            if let Some((key, count)) = &stats.largest {
                write!(f, ", largest {:?} ({})", ellipses(key), count)?;
            }
            writeln!(f)?;
            writeln!(
                f,
                "Perfect order {} words per key: {}",
                stats.order,
                render_histogram(&stats.group_sizes)
            )?;
        }
        Ok(())
    }
}
