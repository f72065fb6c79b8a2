//! Obtaining the schema document.
//!
//! The editor never fetches anything itself. A host hands it a
//! [`SchemaSource`], which the session asks for the document text once per
//! load. Implement the trait over whatever transport the host uses; a file
//! and an in-memory source are provided.

use std::path::PathBuf;

use crate::document::SchemaDocument;
use crate::error::SchemaLoadError;

/// Abstraction over where the schema text comes from.
///
/// This trait enables testing with in-memory sources and supports different
/// transports.
pub trait SchemaSource: Send + Sync {
    /// The error type for fetch failures.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Produces the schema document text.
    fn fetch(&self) -> Result<String, Self::Error>;
}

/// Reads the schema from a file.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl SchemaSource for FileSource {
    type Error = std::io::Error;

    fn fetch(&self) -> Result<String, Self::Error> {
        std::fs::read_to_string(&self.path)
    }
}

/// Serves schema text held in memory.
#[derive(Debug, Clone)]
pub struct StaticSource {
    text: String,
}

impl StaticSource {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

impl SchemaSource for StaticSource {
    type Error = std::convert::Infallible;

    fn fetch(&self) -> Result<String, Self::Error> {
        Ok(self.text.clone())
    }
}

/// Fetches and parses a schema document.
///
/// # Example
///
/// ```rust
/// use schema_editor::loading::{load_document, StaticSource};
///
/// let doc = load_document(&StaticSource::new(r#"{"$defs": {"A": {"type": "string"}}}"#)).unwrap();
/// assert!(doc.definition("A").is_some());
///
/// assert!(load_document(&StaticSource::new("[1, 2]")).is_err());
/// ```
pub fn load_document<S: SchemaSource>(source: &S) -> Result<SchemaDocument, SchemaLoadError> {
    let text = source
        .fetch()
        .map_err(|e| SchemaLoadError::Fetch(Box::new(e)))?;
    SchemaDocument::from_json_str(&text)
}
