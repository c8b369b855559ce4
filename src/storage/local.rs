// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Filesystem-backed storage for offline use and testing.
//!
//! Objects live under `<root>/<bucket>/<path>`; entry rows are appended to
//! `<root>/rows/mood_jar_entries.jsonl`. Signed URLs are absolute
//! `file:///` URLs even when the root is relative.

use super::{
    expiry_from, object_path, ObjectStore, RowStore, SignRequest, SignedUrl, StorageError,
    UploadRequest,
};
use crate::models::entry::JarEntry;
use chrono::Utc;
use reqwest::Url;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::PathBuf;
use std::sync::Mutex;

const ENTRY_TABLE: &str = "mood_jar_entries.jsonl";

/// Storage rooted at a local directory.
pub struct LocalStore {
    root: PathBuf,
    // Serializes appends to the rows file
    rows_lock: Mutex<()>,
}

impl LocalStore {
    pub fn new(root: PathBuf) -> Self {
        Self {
            root,
            rows_lock: Mutex::new(()),
        }
    }

    fn object_file(&self, bucket: &str, path: &str) -> PathBuf {
        self.root.join(bucket).join(path)
    }

    fn rows_file(&self) -> PathBuf {
        self.root.join("rows").join(ENTRY_TABLE)
    }
}

impl ObjectStore for LocalStore {
    fn upload(&self, request: &UploadRequest<'_>) -> Result<String, StorageError> {
        let path = object_path(request.owner_id, request.kind);
        let file = self.object_file(request.bucket, &path);
        if let Some(parent) = file.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&file, request.blob)?;

        log::info!("Stored {} bytes at {}", request.blob.len(), file.display());
        Ok(path)
    }

    fn signed_url(&self, request: &SignRequest<'_>) -> Result<SignedUrl, StorageError> {
        let file = self.object_file(request.bucket, request.path);
        if !file.is_file() {
            return Err(StorageError::NotFound(format!("{}/{}", request.bucket, request.path)));
        }

        // A relative root would otherwise end up as the URL host
        let file = if file.is_absolute() {
            file
        } else {
            std::env::current_dir()?.join(file)
        };
        let mut url = Url::from_file_path(&file)
            .map_err(|()| StorageError::InvalidPath(file.display().to_string()))?;

        let expires_at = expiry_from(Utc::now(), request.expiry_seconds);
        url.set_query(Some(&format!("expires={}", expires_at.timestamp())));
        Ok(SignedUrl {
            url: url.into(),
            expires_at,
        })
    }
}

impl RowStore for LocalStore {
    fn insert_entry(&self, entry: &JarEntry) -> Result<(), StorageError> {
        let line = serde_json::to_string(entry)?;
        let file = self.rows_file();

        let _guard = self.rows_lock.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Some(parent) = file.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut out = OpenOptions::new().create(true).append(true).open(&file)?;
        writeln!(out, "{}", line)?;

        log::debug!("Appended entry {} to {}", entry.id, file.display());
        Ok(())
    }
}
