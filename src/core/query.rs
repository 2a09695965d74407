// File: src/core/query.rs
use crate::core::index::RhymeIndex;
use crate::core::keys::derive_keys;
use crate::core::store::{normalize_word, PronunciationStore};
use crate::core::types::{RhymeOrder, RhymeSet, VowelSet};
use crate::diagnostics::{Diagnostic, DiagnosticSink, PhaseTimer};
use crate::error::{Result, RhymeError};
use std::collections::{BTreeMap, BTreeSet};

/// Perfect rhymes of `word`, one `RhymeSet` per order, ascending by order.
///
/// Keys of every variant of the word are looked up and the matching groups
/// are unioned per order. The word itself is never part of the result, and
/// orders left empty are dropped. With `order` set, the result is either that
/// single set or empty.
pub fn perfect_rhymes(
    word: &str,
    store: &PronunciationStore,
    index: &RhymeIndex,
    vowels: &VowelSet,
    order: Option<RhymeOrder>,
    sink: &dyn DiagnosticSink,
) -> Result<Vec<RhymeSet>> {
    let _timer = PhaseTimer::start("query", sink);
    let word = normalize_word(word);
    let variants = store.variants(&word)?;

    let mut found: BTreeMap<RhymeOrder, BTreeSet<&str>> = BTreeMap::new();
    for pronunciation in variants {
        for (vorder, key) in derive_keys(pronunciation, vowels).iter() {
            sink.record(Diagnostic::QueryKey { word: &word, order: vorder, key });
            let Some(groups) = index.order(vorder) else {
                sink.record(Diagnostic::NoRhymesAtOrder { order: vorder });
                continue;
            };
            let Some(words) = groups.get(key) else {
                continue;
            };
            sink.record(Diagnostic::Candidates { order: vorder, count: words.len() });
            found.entry(vorder).or_default().extend(
                words
                    .iter()
                    .map(String::as_str)
                    .filter(|candidate| *candidate != word),
            );
        }
    }

    Ok(found
        .into_iter()
        .filter(|(vorder, words)| !words.is_empty() && order.map_or(true, |o| o == *vorder))
        .map(|(vorder, words)| RhymeSet {
            order: vorder,
            words: words.into_iter().map(str::to_string).collect(),
        })
        .collect())
}

/// Perfect rhymes that also share the syllable before the rhyming one.
/// Not supported; always fails, whether or not the word is known.
pub fn consonant_perfect_rhymes(
    _word: &str,
    _order: Option<RhymeOrder>,
) -> Result<Vec<RhymeSet>> {
    Err(RhymeError::UnsupportedFeature("consonant-perfect rhyme matching"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::Pronunciation;
    use crate::diagnostics::NullSink;

    fn fixture() -> (PronunciationStore, RhymeIndex, VowelSet) {
        let vowels = VowelSet::default();
        let store = PronunciationStore::from_entries(vec![
            ("CARING", vec![Pronunciation::new(["K", "EH1", "R", "IH0", "NG"])]),
            ("SHARING", vec![Pronunciation::new(["SH", "EH1", "R", "IH0", "NG"])]),
            ("BRING", vec![Pronunciation::new(["B", "R", "IH1", "NG"])]),
            (
                "WING",
                vec![
                    Pronunciation::new(["W", "IH1", "NG"]),
                    Pronunciation::new(["W", "IH0", "NG"]),
                ],
            ),
            ("HMM", vec![Pronunciation::new(["HH", "M"])]),
        ]);
        let index = RhymeIndex::build(&store, &vowels, &NullSink);
        (store, index, vowels)
    }

    fn rhymes(word: &str, order: Option<RhymeOrder>) -> Result<Vec<RhymeSet>> {
        let (store, index, vowels) = fixture();
        perfect_rhymes(word, &store, &index, &vowels, order, &NullSink)
    }

    #[test]
    fn caring_rhymes_with_sharing() {
        let sets = rhymes("caring", None).unwrap();
        assert_eq!(
            sets,
            vec![
                RhymeSet { order: 1, words: vec!["SHARING".into(), "WING".into()] },
                RhymeSet { order: 2, words: vec!["SHARING".into()] },
            ]
        );
    }

    #[test]
    fn variants_are_unioned_and_deduplicated() {
        let sets = rhymes("WING", Some(1)).unwrap();
        assert_eq!(sets.len(), 1);
        assert_eq!(sets[0].words, vec!["BRING", "CARING", "SHARING"]);
    }

    #[test]
    fn never_rhymes_with_itself() {
        for word in ["CARING", "SHARING", "BRING", "WING"] {
            for set in rhymes(word, None).unwrap() {
                assert!(!set.words.iter().any(|w| w == word));
            }
        }
    }

    #[test]
    fn absent_order_is_empty_not_an_error() {
        assert!(rhymes("BRING", Some(2)).unwrap().is_empty());
        assert!(rhymes("HMM", None).unwrap().is_empty());
    }

    #[test]
    fn order_filter_matches_unfiltered_result() {
        let all = rhymes("CARING", None).unwrap();
        let double = rhymes("CARING", Some(2)).unwrap();
        assert_eq!(double.as_slice(), &all[1..2]);
    }

    #[test]
    fn unknown_word_fails() {
        assert!(matches!(rhymes("XYZZY", None), Err(RhymeError::UnknownWord(_))));
    }

    #[test]
    fn consonant_perfect_is_unsupported() {
        assert!(matches!(
            consonant_perfect_rhymes("CARING", None),
            Err(RhymeError::UnsupportedFeature(_))
        ));
        assert!(matches!(
            consonant_perfect_rhymes("XYZZY", Some(1)),
            Err(RhymeError::UnsupportedFeature(_))
        ));
    }
}
