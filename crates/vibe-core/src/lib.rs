//! # Vibe Core
//!
//! The domain layer of VibeCheck.
//! Entities, ports and the submission/suggestion services live here, with zero
//! infrastructure dependencies.

pub mod domain;
pub mod error;
pub mod ports;
pub mod services;

pub use error::{RepoError, SubmitError, SuggestionError, UploadError};
