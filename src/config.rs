// File: src/config.rs
use crate::core::types::VowelSet;
use crate::error::{Result, RhymeError};
use std::env;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// CMU dictionary file names tried, in order, under `$DATA_DIR`.
const CMU_FILE_NAMES: &[&str] = &[
    "cmudict-0.7b.utf8",
    "cmudict-0.7b",
    "cmudict.0.7b",
    "cmudict-0.7a.utf8",
    "cmudict-0.7a",
    "cmudict.0.7a",
];

/// System word lists tried, in order.
const WORD_LIST_PATHS: &[&str] = &["/usr/share/dict/words", "/etc/dictionaries-common/words"];

const DEFAULT_DATA_DIR: &str = "data";

/// Text encoding of a raw pronunciation dictionary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Encoding {
    #[default]
    Utf8,
    /// ISO-8859-1: every byte is the code point of the same value.
    Latin1,
}

impl FromStr for Encoding {
    type Err = RhymeError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().replace('_', "-").as_str() {
            "utf-8" | "utf8" => Ok(Self::Utf8),
            "latin-1" | "latin1" | "iso-8859-1" | "iso8859-1" => Ok(Self::Latin1),
            _ => Err(RhymeError::UnknownEncoding(s.to_string())),
        }
    }
}

/// How a rhyming dictionary is read and keyed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RhymeConfig {
    /// Syllables starting with one of these characters carry a rhyme.
    pub vowels: VowelSet,
    /// Strip stress digits (`EH1` → `EH`) so rhymes may differ in stress.
    pub remove_stresses: bool,
    pub encoding: Encoding,
}

/// Default locations of the input files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DictionaryPaths {
    pub cmu: Vec<PathBuf>,
    pub word_lists: Vec<PathBuf>,
}

impl DictionaryPaths {
    /// Defaults rooted at `$DATA_DIR`, or `data` when unset.
    pub fn from_env() -> Self {
        let data_dir = env::var_os("DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR));
        Self::with_data_dir(&data_dir)
    }

    pub fn with_data_dir(data_dir: &Path) -> Self {
        Self {
            cmu: CMU_FILE_NAMES.iter().map(|name| data_dir.join(name)).collect(),
            word_lists: WORD_LIST_PATHS.iter().map(PathBuf::from).collect(),
        }
    }
}

/// The explicit path if it exists, else the first existing default.
pub fn first_existing(explicit: Option<&Path>, defaults: &[PathBuf]) -> Option<PathBuf> {
    explicit
        .into_iter()
        .chain(defaults.iter().map(PathBuf::as_path))
        .find(|path| path.exists())
        .map(Path::to_path_buf)
}
