// File: src/persistence.rs
use crate::core::index::{KeyGroups, RhymeIndex};
use crate::core::keys::derive_keys;
use crate::core::store::PronunciationStore;
use crate::core::types::{Pronunciation, RhymeKeys, RhymeOrder, VowelSet};
use crate::error::{Result, RhymeError};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;
use tempfile::NamedTempFile;

/// On-disk encoding of a rhyme index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexFormat {
    /// Portable JSON text.
    Json,
    /// Compact bincode snapshot of the same document.
    Binary,
}

impl IndexFormat {
    /// `.bin` files are binary snapshots; everything else is JSON.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("bin") => Self::Binary,
            _ => Self::Json,
        }
    }
}

/// Per-variant row of the informational `table` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct TableRow {
    #[serde(rename = "v")]
    variant: usize,
    #[serde(rename = "s")]
    syllables: Pronunciation,
    #[serde(rename = "o")]
    orders: RhymeKeys,
}

/// The persisted document. Order keys of `perfect` are strings.
#[derive(Debug, Serialize, Deserialize)]
struct IndexDocument {
    entries: BTreeMap<String, Vec<Pronunciation>>,
    #[serde(default)]
    table: Option<BTreeMap<String, Vec<TableRow>>>,
    perfect: BTreeMap<String, BTreeMap<String, Vec<String>>>,
}

impl IndexDocument {
    fn capture(store: &PronunciationStore, index: &RhymeIndex, vowels: &VowelSet) -> Self {
        let entries = store
            .iter()
            .map(|(word, variants)| (word.to_string(), variants.to_vec()))
            .collect();
        let table = store
            .iter()
            .map(|(word, variants)| {
                let rows = variants
                    .iter()
                    .enumerate()
                    .map(|(variant, syllables)| TableRow {
                        variant,
                        syllables: syllables.clone(),
                        orders: derive_keys(syllables, vowels),
                    })
                    .collect();
                (word.to_string(), rows)
            })
            .collect();
        let perfect = index
            .orders()
            .map(|(order, groups)| {
                let groups = groups
                    .iter()
                    .map(|(key, words)| (key.clone(), words.clone()))
                    .collect();
                (order.to_string(), groups)
            })
            .collect();
        Self { entries, table: Some(table), perfect }
    }

    fn restore(self) -> Result<(PronunciationStore, RhymeIndex)> {
        let mut orders: BTreeMap<RhymeOrder, KeyGroups> = BTreeMap::new();
        for (raw, groups) in self.perfect {
            let order: RhymeOrder = raw
                .parse()
                .ok()
                .filter(|order| *order > 0)
                .ok_or_else(|| RhymeError::CorruptIndex(format!("invalid rhyme order {:?}", raw)))?;
            if orders.insert(order, groups.into_iter().collect()).is_some() {
                return Err(RhymeError::CorruptIndex(format!("duplicate rhyme order {:?}", raw)));
            }
        }

        let store = PronunciationStore::from_entries(self.entries);
        let index = RhymeIndex::from_orders(orders);
        // Indexed words must match an entry exactly; the query excludes the
        // word itself by its canonical form.
        let missing: BTreeSet<&str> = index
            .words()
            .filter(|w| !store.contains_canonical(w))
            .collect();
        if let Some(word) = missing.iter().next() {
            return Err(RhymeError::CorruptIndex(format!(
                "{} indexed words have no entry, e.g. {}",
                missing.len(),
                word
            )));
        }
        Ok((store, index))
    }
}

/// Encodes store and index as a JSON document.
pub fn serialize(
    store: &PronunciationStore,
    index: &RhymeIndex,
    vowels: &VowelSet,
) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    write_document(&mut out, &IndexDocument::capture(store, index, vowels), IndexFormat::Json)?;
    Ok(out)
}

/// Decodes a JSON document produced by [`serialize`].
pub fn deserialize(bytes: &[u8]) -> Result<(PronunciationStore, RhymeIndex)> {
    read_document(bytes, IndexFormat::Json)?.restore()
}

fn write_document<W: Write>(writer: W, doc: &IndexDocument, format: IndexFormat) -> Result<()> {
    match format {
        IndexFormat::Json => {
            serde_json::to_writer(writer, doc).map_err(|e| RhymeError::Encode(e.to_string()))
        }
        IndexFormat::Binary => {
            bincode::serialize_into(writer, doc).map_err(|e| RhymeError::Encode(e.to_string()))
        }
    }
}

fn read_document<R: Read>(reader: R, format: IndexFormat) -> Result<IndexDocument> {
    match format {
        IndexFormat::Json => {
            serde_json::from_reader(reader).map_err(|e| RhymeError::CorruptIndex(e.to_string()))
        }
        IndexFormat::Binary => {
            bincode::deserialize_from(reader).map_err(|e| RhymeError::CorruptIndex(e.to_string()))
        }
    }
}

/// Writes the index atomically: the target is replaced only once the whole
/// document has been written.
pub fn save_to_disk(
    store: &PronunciationStore,
    index: &RhymeIndex,
    vowels: &VowelSet,
    path: &Path,
) -> Result<()> {
    let parent_dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent_dir).map_err(|e| RhymeError::io(parent_dir, e))?;

    let doc = IndexDocument::capture(store, index, vowels);
    let temp_file = NamedTempFile::new_in(parent_dir).map_err(|e| RhymeError::io(parent_dir, e))?;
    {
        let mut writer = BufWriter::new(temp_file.as_file());
        write_document(&mut writer, &doc, IndexFormat::from_path(path))?;
        writer.flush().map_err(|e| RhymeError::io(path, e))?;
    }

    temp_file
        .persist(path)
        .map_err(|e| RhymeError::io(path, e.error))?;
    tracing::debug!(path = %path.display(), words = store.len(), "saved rhyme index");
    Ok(())
}

/// Loads an index saved by [`save_to_disk`]. A failed load leaves no state behind.
pub fn load_from_disk(path: &Path) -> Result<(PronunciationStore, RhymeIndex)> {
    let file = File::open(path).map_err(|e| RhymeError::io(path, e))?;
    let reader = BufReader::new(file);
    read_document(reader, IndexFormat::from_path(path))?.restore()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::NullSink;

    fn fixture() -> (PronunciationStore, RhymeIndex, VowelSet) {
        let vowels = VowelSet::default();
        let store = PronunciationStore::from_entries(vec![
            ("CARING", vec![Pronunciation::new(["K", "EH1", "R", "IH0", "NG"])]),
            ("SHARING", vec![Pronunciation::new(["SH", "EH1", "R", "IH0", "NG"])]),
            (
                "READ",
                vec![
                    Pronunciation::new(["R", "EH1", "D"]),
                    Pronunciation::new(["R", "IY1", "D"]),
                ],
            ),
        ]);
        let index = RhymeIndex::build(&store, &vowels, &NullSink);
        (store, index, vowels)
    }

    #[test]
    fn json_round_trip() {
        let (store, index, vowels) = fixture();
        let bytes = serialize(&store, &index, &vowels).unwrap();
        let (store2, index2) = deserialize(&bytes).unwrap();
        assert_eq!(store, store2);
        assert_eq!(index, index2);
    }

    #[test]
    fn document_has_three_sections_with_string_orders() {
        let (store, index, vowels) = fixture();
        let bytes = serialize(&store, &index, &vowels).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(value["entries"]["READ"][1], serde_json::json!(["R", "IY1", "D"]));
        assert_eq!(value["table"]["READ"][1]["v"], 1);
        assert_eq!(value["table"]["CARING"][0]["o"][1], serde_json::json!([2, "EH1 R IH0 NG"]));
        assert_eq!(
            value["perfect"]["2"]["EH1 R IH0 NG"],
            serde_json::json!(["CARING", "SHARING"])
        );
    }

    #[test]
    fn table_section_is_optional() {
        let doc = br#"{"entries": {"A": [["AH0"]]}, "perfect": {"1": {"AH0": ["A"]}}}"#;
        let (store, index) = deserialize(doc).unwrap();
        assert_eq!(store.len(), 1);
        assert_eq!(index.group(1, "AH0").unwrap(), &["A"]);
    }

    #[test]
    fn missing_sections_are_corrupt() {
        assert!(matches!(
            deserialize(br#"{"entries": {}}"#),
            Err(RhymeError::CorruptIndex(_))
        ));
        assert!(matches!(
            deserialize(br#"{"perfect": {}}"#),
            Err(RhymeError::CorruptIndex(_))
        ));
        assert!(matches!(deserialize(b"not json"), Err(RhymeError::CorruptIndex(_))));
    }

    #[test]
    fn non_integer_orders_are_corrupt() {
        for order in ["one", "0", "-1", "1.5"] {
            let doc = format!(r#"{{"entries": {{}}, "perfect": {{"{}": {{}}}}}}"#, order);
            assert!(
                matches!(deserialize(doc.as_bytes()), Err(RhymeError::CorruptIndex(_))),
                "order {:?} accepted",
                order
            );
        }
    }

    #[test]
    fn indexed_words_must_have_entries() {
        let doc = br#"{"entries": {}, "perfect": {"1": {"AH0": ["GHOST"]}}}"#;
        match deserialize(doc) {
            Err(RhymeError::CorruptIndex(msg)) => assert!(msg.contains("GHOST")),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn indexed_words_must_be_canonical() {
        let doc = br#"{
            "entries": {"CARING": [["K", "EH1", "R", "IH0", "NG"]], "SHARING": [["SH", "EH1", "R", "IH0", "NG"]]},
            "perfect": {"1": {"IH0 NG": ["caring", "sharing"]}}
        }"#;
        match deserialize(doc) {
            Err(RhymeError::CorruptIndex(msg)) => assert!(msg.contains("caring")),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn loaded_index_never_returns_the_query_word() {
        let (store, index, vowels) = fixture();
        let bytes = serialize(&store, &index, &vowels).unwrap();
        let (store, index) = deserialize(&bytes).unwrap();
        let sets = crate::core::query::perfect_rhymes(
            "caring",
            &store,
            &index,
            &vowels,
            None,
            &NullSink,
        )
        .unwrap();
        assert!(!sets.is_empty());
        for set in sets {
            assert!(!set.words.iter().any(|w| w.eq_ignore_ascii_case("CARING")));
        }
    }

    #[test]
    fn format_follows_extension() {
        assert_eq!(IndexFormat::from_path(Path::new("rhymes.bin")), IndexFormat::Binary);
        assert_eq!(IndexFormat::from_path(Path::new("rhymes.json")), IndexFormat::Json);
        assert_eq!(IndexFormat::from_path(Path::new("rhymes")), IndexFormat::Json);
    }

    #[test]
    fn disk_round_trip_in_both_formats() {
        let (store, index, vowels) = fixture();
        let dir = tempfile::tempdir().unwrap();
        for name in ["nested/rhymes.json", "rhymes.bin"] {
            let path = dir.path().join(name);
            save_to_disk(&store, &index, &vowels, &path).unwrap();
            let (store2, index2) = load_from_disk(&path).unwrap();
            assert_eq!(store, store2, "{}", name);
            assert_eq!(index, index2, "{}", name);
        }
    }

    #[test]
    fn write_failures_are_encode_errors() {
        struct Broken;
        impl Write for Broken {
            fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
                Err(std::io::Error::new(std::io::ErrorKind::Other, "disk full"))
            }
            fn flush(&mut self) -> std::io::Result<()> {
                Ok(())
            }
        }
        let (store, index, vowels) = fixture();
        let doc = IndexDocument::capture(&store, &index, &vowels);
        for format in [IndexFormat::Json, IndexFormat::Binary] {
            match write_document(Broken, &doc, format) {
                Err(RhymeError::Encode(msg)) => assert!(msg.contains("disk full"), "{}", msg),
                other => panic!("unexpected {:?}", other),
            }
        }
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            load_from_disk(&dir.path().join("absent.json")),
            Err(RhymeError::Io { .. })
        ));
    }
}
