// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Signed URL cache.
//!
//! URLs are reused until they come within `margin` of their recorded expiry.
//! A failed request falls back to the placeholder image and is not cached,
//! so the next lookup asks the backend again. Expired entries are dropped
//! whenever a new URL is stored.

use super::{ObjectStore, SignRequest, SignedUrl};
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::sync::Arc;

/// Settings for [`SignedUrlCache`].
#[derive(Debug, Clone)]
pub struct UrlPolicy {
    pub bucket: String,
    pub expiry_seconds: u64,
    pub refresh_margin: Duration,
    pub placeholder: String,
}

/// Per-path cache of signed URLs.
pub struct SignedUrlCache {
    store: Arc<dyn ObjectStore>,
    policy: UrlPolicy,
    urls: HashMap<String, SignedUrl>,
}

impl SignedUrlCache {
    pub fn new(store: Arc<dyn ObjectStore>, policy: UrlPolicy) -> Self {
        Self {
            store,
            policy,
            urls: HashMap::new(),
        }
    }

    /// URL for `path`, refreshed if it is missing or about to expire.
    pub fn get(&mut self, path: &str) -> String {
        self.get_at(path, Utc::now())
    }

    /// Same as [`get`](Self::get) with an explicit clock.
    pub fn get_at(&mut self, path: &str, now: DateTime<Utc>) -> String {
        if let Some(cached) = self.urls.get(path) {
            if cached.is_fresh(now, self.policy.refresh_margin) {
                return cached.url.clone();
            }
            log::debug!("Signed URL for {} is expiring, refreshing", path);
        }

        let request = SignRequest {
            bucket: &self.policy.bucket,
            path,
            expiry_seconds: self.policy.expiry_seconds,
        };
        match self.store.signed_url(&request) {
            Ok(signed) => {
                let url = signed.url.clone();
                self.urls.retain(|_, cached| cached.expires_at > now);
                self.urls.insert(path.to_string(), signed);
                url
            }
            Err(e) => {
                log::warn!("Failed to sign {}: {}; using placeholder", path, e);
                self.urls.remove(path);
                self.policy.placeholder.clone()
            }
        }
    }
}
