//! Use cases built on top of the ports.

mod post_service;
mod suggestion_service;

pub use post_service::{POSTED_MESSAGE, PostService, Submitted};
pub use suggestion_service::SuggestionService;
