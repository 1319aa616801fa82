//! Uploaded images stored as plain files in one directory.

use std::io;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::Utc;
use tokio::fs;
use tokio::io::AsyncWriteExt;

use vibe_core::domain::ImageUpload;
use vibe_core::error::UploadError;
use vibe_core::ports::{ImageStore, StoredImage};

/// Attempts at finding a free file name before giving up.
const MAX_NAME_ATTEMPTS: i64 = 16;

/// Image store writing `<unix-millis>-<name>` files into a directory.
#[derive(Debug, Clone)]
pub struct DiskImageStore {
    dir: PathBuf,
    url_prefix: String,
}

impl DiskImageStore {
    /// `url_prefix` is the public path the directory is served under.
    pub fn new(dir: impl Into<PathBuf>, url_prefix: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            url_prefix: url_prefix.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of a stored file, if `file_name` is a plain name inside the store.
    pub fn resolve(&self, file_name: &str) -> Option<PathBuf> {
        let plain = !file_name.is_empty()
            && file_name != "."
            && file_name != ".."
            && !file_name.contains(['/', '\\']);
        plain.then(|| self.dir.join(file_name))
    }

    async fn create_exclusive(&self, name: &str) -> Result<(String, fs::File), UploadError> {
        let millis = Utc::now().timestamp_millis();
        for attempt in 0..MAX_NAME_ATTEMPTS {
            let file_name = format!("{}-{}", millis + attempt, name);
            let result = fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(self.dir.join(&file_name))
                .await;
            match result {
                Ok(file) => return Ok((file_name, file)),
                Err(e) if e.kind() == io::ErrorKind::AlreadyExists => continue,
                Err(e) => return Err(UploadError::Write(e.to_string())),
            }
        }
        Err(UploadError::Write(format!(
            "no free file name for {name} after {MAX_NAME_ATTEMPTS} attempts"
        )))
    }

    async fn write_all(mut file: fs::File, bytes: &[u8]) -> io::Result<()> {
        file.write_all(bytes).await?;
        file.sync_all().await
    }
}

/// File name safe to store: last path component, whitespace runs as `-`.
pub fn sanitize_file_name(original: &str) -> String {
    let base = original.rsplit(['/', '\\']).next().unwrap_or_default();
    let name = base.split_whitespace().collect::<Vec<_>>().join("-");
    match name.as_str() {
        "" | "." | ".." => "image".to_string(),
        _ => name,
    }
}

#[async_trait]
impl ImageStore for DiskImageStore {
    async fn save(&self, image: &ImageUpload) -> Result<StoredImage, UploadError> {
        fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| UploadError::Directory(e.to_string()))?;

        let name = sanitize_file_name(&image.file_name);
        let (file_name, file) = self.create_exclusive(&name).await?;

        if let Err(e) = Self::write_all(file, &image.bytes).await {
            let _ = fs::remove_file(self.dir.join(&file_name)).await;
            return Err(UploadError::Write(e.to_string()));
        }

        Ok(StoredImage {
            url: format!("{}/{}", self.url_prefix, file_name),
            file_name,
        })
    }

    async fn remove(&self, image: &StoredImage) -> Result<(), UploadError> {
        let path = self
            .resolve(&image.file_name)
            .ok_or_else(|| UploadError::Remove(format!("invalid file name {}", image.file_name)))?;

        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(UploadError::Remove(e.to_string())),
        }
    }
}
