// --- File: src/core/index.rs
use crate::core::keys::derive_keys;
use crate::core::store::PronunciationStore;
use crate::core::types::{RhymeOrder, VowelSet};
use crate::diagnostics::{Diagnostic, DiagnosticSink, PhaseTimer};
use std::collections::{BTreeMap, HashMap};

/// Rhyme key → words sharing it, for one order.
pub type KeyGroups = HashMap<String, Vec<String>>;

/// Inverted index: (order, rhyme key) → words having that key.
///
/// A word appears once per variant carrying the key, so a group may list the
/// same word more than once. Queries deduplicate.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RhymeIndex {
    orders: BTreeMap<RhymeOrder, KeyGroups>,
}

impl RhymeIndex {
    /// Builds the index from every variant of every word.
    /// O(total syllables). Words with no variants contribute nothing.
    pub fn build(
        store: &PronunciationStore,
        vowels: &VowelSet,
        sink: &dyn DiagnosticSink,
    ) -> Self {
        let _timer = PhaseTimer::start("build", sink);
        let mut orders: BTreeMap<RhymeOrder, KeyGroups> = BTreeMap::new();

        for (word, variants) in store.iter() {
            for pronunciation in variants {
                for (order, key) in derive_keys(pronunciation, vowels).iter() {
                    orders
                        .entry(order)
                        .or_default()
                        .entry(key.to_string())
                        .or_default()
                        .push(word.to_string());
                }
            }
        }

        let index = Self { orders };
        for (order, groups) in &index.orders {
            sink.record(Diagnostic::OrderBuilt {
                order: *order,
                keys: groups.len(),
                words: groups.values().map(Vec::len).sum(),
            });
        }
        index
    }

    pub(crate) fn from_orders(orders: BTreeMap<RhymeOrder, KeyGroups>) -> Self {
        Self { orders }
    }

    /// All key groups of one order, if the index has any.
    pub fn order(&self, order: RhymeOrder) -> Option<&KeyGroups> {
        self.orders.get(&order)
    }

    /// Words filed under `key` at `order`.
    pub fn group(&self, order: RhymeOrder, key: &str) -> Option<&[String]> {
        self.orders
            .get(&order)
            .and_then(|groups| groups.get(key))
            .map(Vec::as_slice)
    }

    /// Orders present, ascending.
    pub fn orders(&self) -> impl Iterator<Item = (RhymeOrder, &KeyGroups)> {
        self.orders.iter().map(|(order, groups)| (*order, groups))
    }

    pub fn order_count(&self) -> usize {
        self.orders.len()
    }

    /// Every word referenced anywhere in the index.
    pub fn words(&self) -> impl Iterator<Item = &str> {
        self.orders
            .values()
            .flat_map(|groups| groups.values())
            .flat_map(|words| words.iter().map(String::as_str))
    }
}
