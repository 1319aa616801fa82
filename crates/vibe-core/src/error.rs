//! Domain-level error types.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;
use thiserror::Error;

/// Validation failures keyed by form field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_default().push(message.into());
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    pub fn into_map(self) -> BTreeMap<String, Vec<String>> {
        self.0
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, messages) in self.iter() {
            if !first {
                write!(f, "; ")?;
            }
            first = false;
            write!(f, "{}: {}", field, messages.join(", "))?;
        }
        Ok(())
    }
}

/// Post storage errors.
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Stored posts are unreadable: {0}")]
    Read(String),

    #[error("Failed to serialize posts: {0}")]
    Serialization(String),

    #[error("Failed to write posts: {0}")]
    Write(String),
}

/// Image persistence errors.
#[derive(Debug, Error)]
pub enum UploadError {
    #[error("Failed to prepare upload directory: {0}")]
    Directory(String),

    #[error("Failed to write image: {0}")]
    Write(String),

    #[error("Failed to remove image: {0}")]
    Remove(String),
}

/// Failures of the post submission flow.
#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("Validation failed: {0}")]
    Validation(FieldErrors),

    #[error("Image upload failed: {0}")]
    Upload(#[from] UploadError),

    #[error("Post persistence failed: {0}")]
    Persistence(#[from] RepoError),
}

/// Hashtag suggestion backend errors. Never surfaced to users.
#[derive(Debug, Error)]
pub enum SuggestionError {
    #[error("Suggestion service is not configured")]
    NotConfigured,

    #[error("Suggestion request failed: {0}")]
    Request(String),

    #[error("Suggestion service returned an invalid response: {0}")]
    InvalidResponse(String),
}
