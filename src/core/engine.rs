use crate::config::RhymeConfig;
use crate::core::index::RhymeIndex;
use crate::core::keys::derive_keys;
use crate::core::query;
use crate::core::store::PronunciationStore;
use crate::core::types::{Pronunciation, RhymeKeys, RhymeOrder, RhymeSet, VariantRecord, VowelSet};
use crate::diagnostics::{Diagnostic, DiagnosticSink};
use crate::error::{Result, RhymeError};
use crate::inspect::Inspection;
use crate::loader::load_cmu;
use crate::persistence::{load_from_disk, save_to_disk};
use std::path::Path;

/// A rhyming dictionary: pronunciation store, derived rhyme index and the
/// vowel set both were keyed with. Immutable once built, so shared references
/// can be queried from several threads.
#[derive(Debug, Clone)]
pub struct RhymeDict {
    store: PronunciationStore,
    index: RhymeIndex,
    vowels: VowelSet,
}

impl RhymeDict {
    /// Raw mode: derives the index from the store.
    pub fn from_store(store: PronunciationStore, vowels: VowelSet, sink: &dyn DiagnosticSink) -> Self {
        let index = RhymeIndex::build(&store, &vowels, sink);
        Self { store, index, vowels }
    }

    /// Assembles a dictionary from an already derived index.
    pub fn from_parts(store: PronunciationStore, index: RhymeIndex, vowels: VowelSet) -> Self {
        Self { store, index, vowels }
    }

    /// Reads a raw CMU dictionary and derives the index.
    pub fn from_cmu(path: &Path, config: &RhymeConfig, sink: &dyn DiagnosticSink) -> Result<Self> {
        let store = load_cmu(path, config)?;
        Ok(Self::from_store(store, config.vowels.clone(), sink))
    }

    /// Deserialized mode: loads a saved store and index verbatim.
    ///
    /// `vowels` must match the set the index was saved with, or query keys
    /// will not line up with the stored ones.
    pub fn load(path: &Path, vowels: VowelSet, sink: &dyn DiagnosticSink) -> Result<Self> {
        let (store, index) = load_from_disk(path)?;
        sink.record(Diagnostic::Loaded {
            entries: store.len(),
            orders: index.order_count(),
        });
        Ok(Self { store, index, vowels })
    }

    /// Builds from a saved index if given, otherwise from the raw dictionary.
    pub fn open(
        cmu: Option<&Path>,
        saved: Option<&Path>,
        config: &RhymeConfig,
        sink: &dyn DiagnosticSink,
    ) -> Result<Self> {
        match (saved, cmu) {
            (Some(saved), _) => Self::load(saved, config.vowels.clone(), sink),
            (None, Some(cmu)) => Self::from_cmu(cmu, config, sink),
            (None, None) => Err(RhymeError::NoDictionary),
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        save_to_disk(&self.store, &self.index, &self.vowels, path)
    }

    pub fn store(&self) -> &PronunciationStore {
        &self.store
    }

    pub fn index(&self) -> &RhymeIndex {
        &self.index
    }

    pub fn vowels(&self) -> &VowelSet {
        &self.vowels
    }

    /// All variants of `word`.
    pub fn pronunciations(&self, word: &str) -> Result<&[Pronunciation]> {
        self.store.variants(word)
    }

    /// Variant number `variant` (1-based) of `word`.
    pub fn pronunciation(&self, word: &str, variant: usize) -> Result<&Pronunciation> {
        self.store.variant(word, variant)
    }

    pub fn rhyme_keys(&self, pronunciation: &Pronunciation) -> RhymeKeys {
        derive_keys(pronunciation, &self.vowels)
    }

    pub fn variant_records(&self, word: &str) -> Result<Vec<VariantRecord>> {
        self.store.records(word, &self.vowels)
    }

    pub fn perfect_rhymes(
        &self,
        word: &str,
        order: Option<RhymeOrder>,
        sink: &dyn DiagnosticSink,
    ) -> Result<Vec<RhymeSet>> {
        query::perfect_rhymes(word, &self.store, &self.index, &self.vowels, order, sink)
    }

    pub fn consonant_perfect_rhymes(&self, word: &str, order: Option<RhymeOrder>) -> Result<Vec<RhymeSet>> {
        query::consonant_perfect_rhymes(word, order)
    }

    pub fn inspect(&self) -> Inspection {
        Inspection::collect(&self.store, &self.index, &self.vowels)
    }
}
