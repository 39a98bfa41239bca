use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::Arc;

// 1. ImageStorage Contract
/// ImageStorage
///
/// The abstract contract for persisting uploaded binaries. The real
/// implementation writes under the local content root; the mock stands in
/// during tests so handler logic can be exercised without touching disk.
#[async_trait]
pub trait ImageStorage: Send + Sync {
    /// Ensures the content root exists. Safe to call at every startup.
    async fn ensure_content_root(&self);

    /// Writes the binary as `{file_name}{extension}` under the content root
    /// and returns the externally reachable URL it will be served from.
    ///
    /// Files are addressed by name only: a second upload with the same file
    /// name overwrites the first.
    async fn save(
        &self,
        file_name: &str,
        extension: &str,
        contents: &[u8],
    ) -> Result<String, String>;
}

// 2. The Real Implementation (Local Content Root)
/// LocalImageStorage
///
/// Persists uploads to a directory on the local filesystem. The same
/// directory is mounted read-only under the fixed `/Images/` URL prefix by
/// the router, which is how the returned URL resolves.
#[derive(Clone)]
pub struct LocalImageStorage {
    content_root: PathBuf,
    base_url: String,
}

impl LocalImageStorage {
    pub fn new(content_root: &str, base_url: &str) -> Self {
        Self {
            content_root: PathBuf::from(content_root),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl ImageStorage for LocalImageStorage {
    async fn ensure_content_root(&self) {
        let _ = tokio::fs::create_dir_all(&self.content_root).await;
    }

    async fn save(
        &self,
        file_name: &str,
        extension: &str,
        contents: &[u8],
    ) -> Result<String, String> {
        let stored_name = format!("{}{}", sanitize_file_name(file_name), extension);
        let local_path = self.content_root.join(&stored_name);

        tokio::fs::write(&local_path, contents)
            .await
            .map_err(|e| format!("writing {} failed: {e}", local_path.display()))?;

        Ok(format!("{}/Images/{}", self.base_url, stored_name))
    }
}

/// sanitize_file_name
///
/// Strips directory components from a user-provided file name so an upload
/// can never escape the content root.
fn sanitize_file_name(file_name: &str) -> String {
    file_name
        .split(['/', '\\'])
        .filter(|segment| !segment.is_empty() && *segment != ".." && *segment != ".")
        .collect::<Vec<_>>()
        .join("_")
}

// 3. The Mock Implementation (For Tests)
/// MockImageStorage
///
/// In-memory stand-in for `ImageStorage`, mirroring the real URL shape so
/// handler assertions hold without any filesystem access.
#[derive(Clone)]
pub struct MockImageStorage {
    /// When true, all operations return a simulated failure.
    pub should_fail: bool,
}

impl MockImageStorage {
    pub fn new() -> Self {
        Self { should_fail: false }
    }

    pub fn new_failing() -> Self {
        Self { should_fail: true }
    }
}

impl Default for MockImageStorage {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ImageStorage for MockImageStorage {
    async fn ensure_content_root(&self) {
        // No-op in mock environment.
    }

    async fn save(
        &self,
        file_name: &str,
        extension: &str,
        _contents: &[u8],
    ) -> Result<String, String> {
        if self.should_fail {
            return Err("Mock Storage Error: Simulation requested".to_string());
        }

        Ok(format!(
            "http://localhost:3000/Images/{}{}",
            sanitize_file_name(file_name),
            extension
        ))
    }
}

/// StorageState
///
/// The concrete type used to share the storage service across the application
/// state.
pub type StorageState = Arc<dyn ImageStorage>;
