//! Catalog seed files.
//!
//! A seed is a JSON document with `authors`, `students`, `products` and
//! `lessons` arrays. Records are validated while deserializing (empty names,
//! inverted student bounds and non-URL videos are rejected).

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use classroom_catalog::{Author, Lesson, Product, Student};
use classroom_core::DomainError;

use super::InMemoryCatalog;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogSeed {
    #[serde(default)]
    pub authors: Vec<Author>,
    #[serde(default)]
    pub students: Vec<Student>,
    #[serde(default)]
    pub products: Vec<Product>,
    #[serde(default)]
    pub lessons: Vec<Lesson>,
}

#[derive(Debug, Error)]
pub enum SeedError {
    #[error("failed to read seed file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse seed: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid seed: {0}")]
    Invalid(#[from] DomainError),
}

impl CatalogSeed {
    pub fn from_json_str(json: &str) -> Result<Self, SeedError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, SeedError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| SeedError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&raw)
    }

    /// Build an in-memory catalog, checking references between records.
    pub fn into_catalog(self) -> Result<InMemoryCatalog, SeedError> {
        Ok(InMemoryCatalog::from_seed(self)?)
    }
}
