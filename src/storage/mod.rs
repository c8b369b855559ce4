// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Access to the hosted storage backend.
//!
//! Every activity goes through the same two traits: [`ObjectStore`] for
//! binary uploads and signed URLs, [`RowStore`] for entry metadata. The
//! concrete backend is chosen once in `main` and handed to the app.

pub mod local;
pub mod remote;
pub mod urls;

use crate::config::{StorageConfig, API_KEY_ENV};
use crate::models::entry::JarEntry;
use chrono::{DateTime, Duration, Utc};
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

/// Default lifetime of a signed URL, in seconds.
pub const DEFAULT_URL_EXPIRY_SECS: u64 = 3600;

/// Errors reported by a storage backend.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("backend rejected request with status {status}: {body}")]
    Rejected { status: u16, body: String },
    #[error("object not found: {0}")]
    NotFound(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("malformed response: {0}")]
    MalformedResponse(String),
    #[error("path cannot be expressed as a URL: {0}")]
    InvalidPath(String),
}

/// Kind of object being stored; decides its folder and content type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectKind {
    MoodJar,
}

impl ObjectKind {
    pub fn folder(self) -> &'static str {
        match self {
            ObjectKind::MoodJar => "mood-jars",
        }
    }

    pub fn content_type(self) -> &'static str {
        match self {
            ObjectKind::MoodJar => "image/png",
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            ObjectKind::MoodJar => "png",
        }
    }
}

/// Upload parameters.
#[derive(Debug, Clone, Copy)]
pub struct UploadRequest<'a> {
    pub bucket: &'a str,
    pub owner_id: &'a str,
    pub blob: &'a [u8],
    pub kind: ObjectKind,
}

/// Signed URL parameters.
#[derive(Debug, Clone, Copy)]
pub struct SignRequest<'a> {
    pub bucket: &'a str,
    pub path: &'a str,
    pub expiry_seconds: u64,
}

/// A time-limited URL together with the moment it stops working.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedUrl {
    pub url: String,
    pub expires_at: DateTime<Utc>,
}

impl SignedUrl {
    /// Whether the URL is still usable at `now` with `margin` to spare.
    pub fn is_fresh(&self, now: DateTime<Utc>, margin: Duration) -> bool {
        now + margin < self.expires_at
    }
}

/// Binary object storage.
pub trait ObjectStore: Send + Sync {
    /// Store a blob and return its path inside the bucket.
    fn upload(&self, request: &UploadRequest<'_>) -> Result<String, StorageError>;

    /// Issue a signed URL for a stored path.
    fn signed_url(&self, request: &SignRequest<'_>) -> Result<SignedUrl, StorageError>;
}

/// Row storage for activity metadata.
pub trait RowStore: Send + Sync {
    fn insert_entry(&self, entry: &JarEntry) -> Result<(), StorageError>;
}

/// The storage clients handed to the app.
#[derive(Clone)]
pub struct Backend {
    pub objects: Arc<dyn ObjectStore>,
    pub rows: Arc<dyn RowStore>,
}

impl Backend {
    /// Build the backend described by `config`.
    pub fn connect(config: &StorageConfig) -> Result<Self, StorageError> {
        match config {
            StorageConfig::Local { root } => {
                log::info!("Using local storage at {}", root.display());
                let store = Arc::new(local::LocalStore::new(root.clone()));
                Ok(Self {
                    objects: store.clone(),
                    rows: store,
                })
            }
            StorageConfig::Remote { base_url, api_key } => {
                log::info!("Using remote storage at {}", base_url);
                let api_key = resolve_api_key(api_key, std::env::var(API_KEY_ENV).ok());
                let store = Arc::new(remote::RemoteStore::new(base_url, api_key)?);
                Ok(Self {
                    objects: store.clone(),
                    rows: store,
                })
            }
        }
    }
}

/// The configured key, or the one from the environment when none is set.
pub fn resolve_api_key(configured: &str, from_env: Option<String>) -> String {
    match from_env {
        Some(key) if configured.is_empty() => key,
        _ => configured.to_string(),
    }
}

/// Path of a new object: `<owner>/<folder>/<uuid>.<ext>`.
pub fn object_path(owner_id: &str, kind: ObjectKind) -> String {
    format!(
        "{}/{}/{}.{}",
        owner_id,
        kind.folder(),
        Uuid::new_v4(),
        kind.extension()
    )
}

/// Expiry time for a URL issued at `issued_at`.
pub fn expiry_from(issued_at: DateTime<Utc>, expiry_seconds: u64) -> DateTime<Utc> {
    let seconds = i64::try_from(expiry_seconds).unwrap_or(i64::MAX);
    Duration::try_seconds(seconds)
        .and_then(|lifetime| issued_at.checked_add_signed(lifetime))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}
