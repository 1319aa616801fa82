//! JSON file post store.
//!
//! The whole feed lives in one pretty-printed JSON array. Every append
//! rewrites the file: the new content goes to a sibling temp file which is
//! then renamed over the original, so readers see either the old or the new
//! collection and never a partial write.

use std::io;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::Utc;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

use vibe_core::domain::{Post, PostDraft, next_timestamp, sort_newest_first};
use vibe_core::error::RepoError;
use vibe_core::ports::PostRepository;

/// Post store backed by a single JSON document.
///
/// Read-modify-write cycles are serialised within the process. Several
/// processes writing the same file are not supported.
pub struct JsonFilePostStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonFilePostStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "posts.json".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    /// Stored posts in file order (newest first). A missing file is empty.
    async fn load(&self) -> Result<Vec<Post>, RepoError> {
        let bytes = match fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(RepoError::Read(e.to_string())),
        };

        serde_json::from_slice(&bytes).map_err(|e| RepoError::Read(e.to_string()))
    }

    async fn store(&self, posts: &[Post]) -> Result<(), RepoError> {
        let json =
            serde_json::to_vec_pretty(posts).map_err(|e| RepoError::Serialization(e.to_string()))?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| RepoError::Write(e.to_string()))?;
        }

        let temp = self.temp_path();
        if let Err(e) = Self::write_synced(&temp, &json).await {
            let _ = fs::remove_file(&temp).await;
            return Err(RepoError::Write(e.to_string()));
        }

        if let Err(e) = fs::rename(&temp, &self.path).await {
            let _ = fs::remove_file(&temp).await;
            return Err(RepoError::Write(e.to_string()));
        }

        Ok(())
    }

    async fn write_synced(path: &Path, contents: &[u8]) -> io::Result<()> {
        let mut file = fs::File::create(path).await?;
        file.write_all(contents).await?;
        file.sync_all().await
    }
}

#[async_trait]
impl PostRepository for JsonFilePostStore {
    async fn list(&self) -> Vec<Post> {
        match self.load().await {
            Ok(mut posts) => {
                sort_newest_first(&mut posts);
                posts
            }
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "Serving empty feed");
                Vec::new()
            }
        }
    }

    async fn append(&self, draft: PostDraft) -> Result<Post, RepoError> {
        let _guard = self.write_lock.lock().await;

        // An unreadable file is left alone rather than replaced.
        let mut posts = self.load().await?;

        let latest = posts.iter().map(|p| p.timestamp).max();
        let post = Post::from_draft(draft, next_timestamp(Utc::now(), latest));
        posts.insert(0, post.clone());

        self.store(&posts).await?;

        tracing::debug!(
            path = %self.path.display(),
            post_id = %post.id,
            total = posts.len(),
            "Posts file rewritten"
        );

        Ok(post)
    }
}
