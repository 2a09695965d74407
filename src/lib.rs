// src/lib.rs

pub mod config;
pub mod core;
pub mod diagnostics;
pub mod error;
pub mod inspect;
pub mod loader;
pub mod persistence;

pub use crate::config::{DictionaryPaths, Encoding, RhymeConfig};
pub use crate::core::engine::RhymeDict;
pub use crate::core::keys::derive_keys;
pub use crate::core::types::{order_label, Pronunciation, RhymeKeys, RhymeOrder, RhymeSet, VowelSet};
pub use crate::diagnostics::{DiagnosticSink, NullSink, TracingSink};
pub use crate::error::{Result, RhymeError};
