//! Image upload storage.

mod disk;

pub use disk::{DiskImageStore, sanitize_file_name};
