use std::path::PathBuf;

use anyhow::Context;
use async_trait::async_trait;
use bytes::Bytes;
use lazy_static::lazy_static;
use regex::Regex;
use tracing::debug;

/// Where identity-document images end up. Returns the path recorded in the log.
#[async_trait]
pub trait AttachmentStore: Send + Sync {
    async fn put_object(&self, file_name: &str, body: Bytes) -> anyhow::Result<String>;
}

/// Writes attachments as plain files under the uploads directory.
#[derive(Debug, Clone)]
pub struct LocalAttachmentStore {
    uploads_dir: PathBuf,
}

impl LocalAttachmentStore {
    pub fn new(uploads_dir: impl Into<PathBuf>) -> Self {
        Self {
            uploads_dir: uploads_dir.into(),
        }
    }
}

#[async_trait]
impl AttachmentStore for LocalAttachmentStore {
    async fn put_object(&self, file_name: &str, body: Bytes) -> anyhow::Result<String> {
        let path = self.uploads_dir.join(file_name);
        // Overwrites an existing file of the same name.
        tokio::fs::write(&path, &body)
            .await
            .with_context(|| format!("write attachment {}", path.display()))?;
        debug!(path = %path.display(), bytes = body.len(), "attachment written");
        Ok(path.to_string_lossy().into_owned())
    }
}

/// Whitespace and path separators become `_`.
pub fn sanitize_name(name: &str) -> String {
    lazy_static! {
        static ref UNSAFE_RE: Regex = Regex::new(r"[\s/\\]").unwrap();
    }
    UNSAFE_RE.replace_all(name, "_").into_owned()
}

/// `{name}_{role}_{token}.jpg`, or `{name}_{token}.jpg` without a role.
pub fn attachment_file_name(name: &str, role: Option<&str>, token: &str) -> String {
    let name = sanitize_name(name);
    match role {
        Some(role) => format!("{}_{}_{}.jpg", name, role, token),
        None => format!("{}_{}.jpg", name, token),
    }
}
