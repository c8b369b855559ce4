// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Mood jar entry metadata.
//!
//! One row per saved jar: who drew it, which emotions went in, and where the
//! image lives in object storage.

use crate::drawing::palette::Emotion;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Metadata for a saved jar drawing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JarEntry {
    pub id: Uuid,
    pub owner_id: String,
    pub image_path: String,
    pub emotions: Vec<Emotion>,
    pub created_at: DateTime<Utc>,
}

impl JarEntry {
    /// Create a new entry stamped with the current time.
    pub fn new(owner_id: impl Into<String>, image_path: impl Into<String>, emotions: Vec<Emotion>) -> Self {
        Self {
            id: Uuid::new_v4(),
            owner_id: owner_id.into(),
            image_path: image_path.into(),
            emotions,
            created_at: Utc::now(),
        }
    }
}
