// File: src/loader.rs
use crate::config::{Encoding, RhymeConfig};
use crate::core::store::PronunciationStore;
use crate::core::types::Pronunciation;
use crate::error::{Result, RhymeError};
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;

/// Parses one CMU dictionary line: `WORD  SYL SYL ...` or `WORD(2)  SYL ...`.
///
/// The alternate-pronunciation marker is dropped; the variant order in the
/// file is what numbers variants.
pub fn parse_cmu_line(line: &str, remove_stresses: bool) -> Option<(String, Pronunciation)> {
    let (head, tail) = line.split_once("  ")?;
    let word_end = head.find(|c: char| c == ' ' || c == '(').unwrap_or(head.len());
    let (word, rest) = head.split_at(word_end);
    if word.is_empty() {
        return None;
    }
    if !rest.is_empty() {
        let digits = rest.strip_prefix('(')?.strip_suffix(')')?;
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
    }

    let syllables = tail.split_whitespace().map(|syl| {
        if remove_stresses {
            syl.trim_end_matches(|c: char| c.is_ascii_digit())
        } else {
            syl
        }
    });
    Some((word.to_string(), Pronunciation::new(syllables)))
}

/// Parses the text of a whole CMU dictionary.
///
/// Comments (`;;;`) and entries starting with punctuation are skipped;
/// malformed lines are logged and dropped, never passed through.
pub fn parse_cmu(text: &str, origin: &str, remove_stresses: bool) -> PronunciationStore {
    let mut entries: BTreeMap<String, Vec<Pronunciation>> = BTreeMap::new();
    for (lnr, line) in text.lines().enumerate() {
        let line = line.trim_end();
        if line.is_empty() || line.starts_with(";;;") {
            continue;
        }
        if !line.contains("  ") {
            tracing::warn!("{}:{}: line missing '  ': {:?}", origin, lnr, line);
            continue;
        }
        if !line.starts_with(|c: char| c.is_ascii_uppercase()) {
            continue;
        }
        match parse_cmu_line(line, remove_stresses) {
            Some((word, pronunciation)) => entries.entry(word).or_default().push(pronunciation),
            None => tracing::error!("{}:{}: failed to parse CMU line {:?}", origin, lnr, line),
        }
    }
    tracing::debug!("read {} words from {}", entries.len(), origin);
    PronunciationStore::from_entries(entries)
}

/// Reads and parses a CMU dictionary file.
pub fn load_cmu(path: &Path, config: &RhymeConfig) -> Result<PronunciationStore> {
    let bytes = fs::read(path).map_err(|e| RhymeError::io(path, e))?;
    let text = decode(bytes, config.encoding, path)?;
    Ok(parse_cmu(&text, &path.display().to_string(), config.remove_stresses))
}

fn decode(bytes: Vec<u8>, encoding: Encoding, path: &Path) -> Result<String> {
    match encoding {
        Encoding::Latin1 => Ok(bytes.iter().map(|&b| b as char).collect()),
        Encoding::Utf8 => String::from_utf8(bytes).map_err(|e| {
            let valid = e.utf8_error().valid_up_to();
            let line = e.as_bytes()[..valid].iter().filter(|&&b| b == b'\n').count();
            RhymeError::Decode { path: path.to_path_buf(), line }
        }),
    }
}

/// Loads a plain word list, one word per line, keyed by uppercase form.
/// A missing file yields an empty list.
pub fn load_word_list(path: &Path) -> Result<HashMap<String, String>> {
    if !path.exists() {
        return Ok(HashMap::new());
    }
    let text = fs::read_to_string(path).map_err(|e| RhymeError::io(path, e))?;
    let words: HashMap<String, String> = text
        .lines()
        .map(str::trim_end)
        .filter(|line| !line.is_empty())
        .map(|line| (line.to_uppercase(), line.to_string()))
        .collect();
    tracing::debug!("read {} words from {}", words.len(), path.display());
    Ok(words)
}
