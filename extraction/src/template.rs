//! User-supplied example JSON shapes.

use serde_json::Value;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors raised while loading a template file.
#[derive(Debug, Error)]
pub enum TemplateError {
    /// The template file does not exist.
    #[error("Template file not found: {}", .0.display())]
    NotFound(PathBuf),

    /// The template file exists but holds only whitespace.
    #[error("Template file is empty: {}", .0.display())]
    Empty(PathBuf),

    /// The template file could not be read.
    #[error("Failed to read template {}: {source}", .path.display())]
    Io {
        /// Path that failed.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
}

/// An example JSON structure, embedded verbatim in the prompt.
///
/// The text is not required to be valid JSON; no schema validation is done.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    text: String,
}

impl Template {
    /// Wraps template text as-is.
    #[must_use]
    pub fn from_text(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// Reads a `.json` or `.txt` template file.
    ///
    /// # Errors
    ///
    /// Returns `TemplateError` if the file is missing, unreadable, or blank.
    pub fn load(path: &Path) -> Result<Self, TemplateError> {
        let text = std::fs::read_to_string(path).map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                TemplateError::NotFound(path.to_path_buf())
            } else {
                TemplateError::Io {
                    path: path.to_path_buf(),
                    source,
                }
            }
        })?;

        if text.trim().is_empty() {
            return Err(TemplateError::Empty(path.to_path_buf()));
        }

        let template = Self { text };
        if template.keys().is_none() {
            tracing::warn!(
                path = %path.display(),
                "Template is not a JSON object; using it verbatim"
            );
        }
        Ok(template)
    }

    /// The template text exactly as supplied.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Top-level keys, when the text parses as a JSON object.
    #[must_use]
    pub fn keys(&self) -> Option<Vec<String>> {
        match serde_json::from_str::<Value>(self.text.trim()) {
            Ok(Value::Object(map)) => Some(map.keys().cloned().collect()),
            _ => None,
        }
    }
}
