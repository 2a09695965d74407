use rhyme_core::loader::parse_cmu;
use rhyme_core::persistence::{deserialize, serialize};
use rhyme_core::{NullSink, RhymeDict, RhymeError, VowelSet};

const CMU_SAMPLE: &str = "\
CARING  K EH1 R IH0 NG
READ  R EH1 D
READ(1)  R IY1 D
RED  R EH1 D
SHARING  SH EH1 R IH0 NG
THE  DH AH0
THE(1)  DH AH0
";

fn dict() -> RhymeDict {
    RhymeDict::from_store(parse_cmu(CMU_SAMPLE, "sample", false), VowelSet::default(), &NullSink)
}

#[test]
fn serialized_index_restores_equal_structures() {
    let dict = dict();
    let bytes = serialize(dict.store(), dict.index(), dict.vowels()).unwrap();
    let (store, index) = deserialize(&bytes).unwrap();
    assert_eq!(&store, dict.store());
    assert_eq!(&index, dict.index());
    assert_eq!(index.group(1, "AH0").unwrap(), &["THE", "THE"]);
}

#[test]
fn saved_dictionary_answers_the_same_queries() {
    let dir = tempfile::tempdir().unwrap();
    let original = dict();
    for name in ["rhymes.json", "rhymes.bin"] {
        let path = dir.path().join(name);
        original.save(&path).unwrap();
        let loaded = RhymeDict::load(&path, VowelSet::default(), &NullSink).unwrap();
        for (word, _) in original.store().iter() {
            assert_eq!(
                original.perfect_rhymes(word, None, &NullSink).unwrap(),
                loaded.perfect_rhymes(word, None, &NullSink).unwrap(),
                "{} via {}",
                word,
                name
            );
        }
        assert_eq!(loaded.pronunciation("READ", 2).unwrap().to_string(), "R IY1 D");
    }
}

#[test]
fn corrupt_file_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.json");
    std::fs::write(&path, r#"{"entries": {"A": [["AH0"]]}, "perfect": {"first": {}}}"#).unwrap();
    assert!(matches!(
        RhymeDict::load(&path, VowelSet::default(), &NullSink),
        Err(RhymeError::CorruptIndex(_))
    ));
}

#[test]
fn failed_load_leaves_saved_file_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("rhymes.json");
    dict().save(&path).unwrap();
    let before = std::fs::read(&path).unwrap();

    let (store, index) = deserialize(&before).unwrap();
    assert!(store.contains("CARING"));
    assert!(index.order_count() >= 2);

    assert!(RhymeDict::load(&dir.path().join("missing.json"), VowelSet::default(), &NullSink).is_err());
    assert_eq!(std::fs::read(&path).unwrap(), before);
}
