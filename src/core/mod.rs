// src/core/mod.rs

pub mod engine;
pub mod index;
pub mod keys;
pub mod query;
pub mod store;
pub mod types;
