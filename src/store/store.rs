use super::error::{Result, StoreError};
use super::types::{Post, PostDraft};

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;

/// File-backed collection of posts.
///
/// Every read parses the whole document and every write replaces it. The file is the
/// single source of truth between calls; nothing is cached here.
pub struct PostStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

/// Outcome of a lookup inside a mutation closure.
enum Lookup {
    Missing,
    Store(StoreError),
}

impl From<StoreError> for Lookup {
    fn from(err: StoreError) -> Self {
        Lookup::Store(err)
    }
}

impl PostStore {
    /// Creates a store over `path` without touching the filesystem.
    ///
    /// The document must exist before the first read. Use [`PostStore::open`] to
    /// initialize a fresh document.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// Opens the document at `path`, writing an empty collection if it is absent.
    ///
    /// An existing document is never overwritten; it is parsed once so that a corrupt
    /// file is reported at startup instead of on the first request.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let store = Self::new(path);

        let exists = tokio::fs::try_exists(&store.path)
            .await
            .map_err(|e| StoreError::io(&store.path, e))?;

        if !exists {
            if let Some(parent) = store.path.parent()
                && !parent.as_os_str().is_empty()
            {
                tokio::fs::create_dir_all(parent)
                    .await
                    .map_err(|e| StoreError::io(parent, e))?;
            }
            store.replace_all(Vec::new()).await?;
            tracing::info!("Initialized empty post document at {}", store.path.display());
        }

        let posts = store.load_all().await?;
        tracing::info!(
            "Opened post document {} ({} records)",
            store.path.display(),
            posts.len()
        );

        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the whole document, newest first.
    ///
    /// A document holding an id of `0` or the same id twice is rejected as
    /// `StoreError::Inconsistent`.
    pub async fn load_all(&self) -> Result<Vec<Post>> {
        let raw = tokio::fs::read(&self.path)
            .await
            .map_err(|e| StoreError::io(&self.path, e))?;

        let mut posts: Vec<Post> =
            serde_json::from_slice(&raw).map_err(|e| StoreError::format(&self.path, e))?;

        posts.sort_by(|a, b| b.id.cmp(&a.id));

        if posts.last().is_some_and(|post| post.id == 0) {
            return Err(StoreError::inconsistent(&self.path, "post id 0"));
        }
        if let Some(pair) = posts.windows(2).find(|pair| pair[0].id == pair[1].id) {
            return Err(StoreError::inconsistent(
                &self.path,
                format!("duplicate post id {}", pair[0].id),
            ));
        }

        Ok(posts)
    }

    /// Overwrites the document with `posts` and hands them back.
    ///
    /// The new content is written to a sibling temporary file and renamed into place,
    /// so readers see either the old document or the new one.
    pub async fn replace_all(&self, posts: Vec<Post>) -> Result<Vec<Post>> {
        let encoded = serde_json::to_vec(&posts).map_err(|e| StoreError::format(&self.path, e))?;
        let tmp_path = self.tmp_path();

        tokio::fs::write(&tmp_path, &encoded)
            .await
            .map_err(|e| StoreError::io(&tmp_path, e))?;
        tokio::fs::rename(&tmp_path, &self.path)
            .await
            .map_err(|e| StoreError::io(&self.path, e))?;

        tracing::debug!(
            "Wrote {} records ({} bytes) to {}",
            posts.len(),
            encoded.len(),
            self.path.display()
        );

        Ok(posts)
    }

    /// Runs one load-modify-write cycle under the store's lock.
    ///
    /// `f` receives the current collection (newest first) and may change it freely.
    /// The collection is written back only if `f` returns `Ok`; on `Err` the document
    /// is left untouched.
    pub async fn mutate<T, E, F>(&self, f: F) -> std::result::Result<T, E>
    where
        F: FnOnce(&mut Vec<Post>) -> std::result::Result<T, E>,
        E: From<StoreError>,
    {
        let _guard = self.write_lock.lock().await;

        let mut posts = self.load_all().await?;
        let out = f(&mut posts)?;
        self.replace_all(posts).await?;

        Ok(out)
    }

    pub async fn list(&self) -> Result<Vec<Post>> {
        self.load_all().await
    }

    pub async fn get(&self, id: u64) -> Result<Option<Post>> {
        let posts = self.load_all().await?;
        Ok(posts.into_iter().find(|post| post.id == id))
    }

    /// Appends a new post with a fresh identifier.
    pub async fn create(&self, draft: PostDraft) -> Result<Post> {
        let post = self
            .mutate(|posts| -> Result<Post> {
                let id = next_id(posts).ok_or(StoreError::IdsExhausted)?;
                let post = draft.into_post(id);
                posts.push(post.clone());
                Ok(post)
            })
            .await?;

        tracing::info!("Created post {}", post.id);
        Ok(post)
    }

    /// Replaces heading and content of post `id`. `None` if there is no such post.
    pub async fn update(&self, id: u64, draft: PostDraft) -> Result<Option<Post>> {
        let outcome = self
            .mutate(|posts| -> std::result::Result<Post, Lookup> {
                let post = posts
                    .iter_mut()
                    .find(|post| post.id == id)
                    .ok_or(Lookup::Missing)?;
                post.apply(draft);
                Ok(post.clone())
            })
            .await;

        match outcome {
            Ok(post) => {
                tracing::info!("Updated post {}", id);
                Ok(Some(post))
            }
            Err(Lookup::Missing) => Ok(None),
            Err(Lookup::Store(e)) => Err(e),
        }
    }

    /// Removes post `id` and returns the remaining collection, newest first.
    pub async fn delete(&self, id: u64) -> Result<Option<Vec<Post>>> {
        let outcome = self
            .mutate(|posts| -> std::result::Result<Vec<Post>, Lookup> {
                let before = posts.len();
                posts.retain(|post| post.id != id);
                if posts.len() == before {
                    return Err(Lookup::Missing);
                }
                Ok(posts.clone())
            })
            .await;

        match outcome {
            Ok(remaining) => {
                tracing::info!("Deleted post {} ({} remaining)", id, remaining.len());
                Ok(Some(remaining))
            }
            Err(Lookup::Missing) => Ok(None),
            Err(Lookup::Store(e)) => Err(e),
        }
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = OsString::from(self.path.as_os_str());
        name.push(".tmp");
        PathBuf::from(name)
    }
}

/// Identifier for the next post: one past the largest id in use, `1` when empty.
///
/// `None` once the largest id is `u64::MAX`.
pub fn next_id(posts: &[Post]) -> Option<u64> {
    posts.iter().map(|post| post.id).max().unwrap_or(0).checked_add(1)
}
