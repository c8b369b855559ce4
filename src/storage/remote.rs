// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! REST client for the hosted backend.
//!
//! Object endpoints live under `/storage/v1`, row endpoints under `/rest/v1`.
//! Calls are blocking and are only made from background threads.

use super::{
    expiry_from, object_path, ObjectStore, RowStore, SignRequest, SignedUrl, StorageError,
    UploadRequest,
};
use crate::models::entry::JarEntry;
use chrono::Utc;
use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::header::CONTENT_TYPE;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const ENTRY_TABLE: &str = "mood_jar_entries";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SignBody {
    expires_in: u64,
}

#[derive(Deserialize)]
struct SignResponse {
    #[serde(rename = "signedURL")]
    signed_url: String,
}

/// Client for a hosted storage + rows backend.
pub struct RemoteStore {
    client: Client,
    base_url: String,
    api_key: String,
}

impl RemoteStore {
    pub fn new(base_url: &str, api_key: String) -> Result<Self, StorageError> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        })
    }

    fn object_url(&self, bucket: &str, path: &str) -> String {
        format!("{}/storage/v1/object/{}/{}", self.base_url, bucket, path)
    }

    fn sign_url(&self, bucket: &str, path: &str) -> String {
        format!("{}/storage/v1/object/sign/{}/{}", self.base_url, bucket, path)
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    /// The sign endpoint answers with a path relative to `/storage/v1`.
    fn absolute_signed_url(&self, signed_path: &str) -> String {
        if signed_path.starts_with("http://") || signed_path.starts_with("https://") {
            return signed_path.to_string();
        }
        let separator = if signed_path.starts_with('/') { "" } else { "/" };
        format!("{}/storage/v1{}{}", self.base_url, separator, signed_path)
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .bearer_auth(&self.api_key)
            .header("apikey", &self.api_key)
    }
}

/// Turn a non-success status into [`StorageError::Rejected`].
fn check(response: Response) -> Result<Response, StorageError> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        let body = response.text().unwrap_or_default();
        Err(StorageError::Rejected {
            status: status.as_u16(),
            body,
        })
    }
}

impl ObjectStore for RemoteStore {
    fn upload(&self, request: &UploadRequest<'_>) -> Result<String, StorageError> {
        let path = object_path(request.owner_id, request.kind);
        let response = self
            .authorized(self.client.post(self.object_url(request.bucket, &path)))
            .header(CONTENT_TYPE, request.kind.content_type())
            .body(request.blob.to_vec())
            .send()?;
        check(response)?;

        log::info!("Uploaded {} bytes to {}/{}", request.blob.len(), request.bucket, path);
        Ok(path)
    }

    fn signed_url(&self, request: &SignRequest<'_>) -> Result<SignedUrl, StorageError> {
        // Expiry is counted from just before the request so it never overshoots
        let issued_at = Utc::now();
        let response = self
            .authorized(self.client.post(self.sign_url(request.bucket, request.path)))
            .json(&SignBody {
                expires_in: request.expiry_seconds,
            })
            .send()?;
        let body: SignResponse = check(response)?.json()?;

        if body.signed_url.is_empty() {
            return Err(StorageError::MalformedResponse("empty signedURL".to_string()));
        }

        Ok(SignedUrl {
            url: self.absolute_signed_url(&body.signed_url),
            expires_at: expiry_from(issued_at, request.expiry_seconds),
        })
    }
}

impl RowStore for RemoteStore {
    fn insert_entry(&self, entry: &JarEntry) -> Result<(), StorageError> {
        let response = self
            .authorized(self.client.post(self.table_url(ENTRY_TABLE)))
            .header("Prefer", "return=minimal")
            .json(entry)
            .send()?;
        check(response)?;

        log::debug!("Inserted entry {} into {}", entry.id, ENTRY_TABLE);
        Ok(())
    }
}
