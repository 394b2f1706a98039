use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Media document. Created on upload, never updated or deleted.
///
/// `filename` is the generated on-disk reference, not the original upload
/// name. `uploader_id` is the string form of the uploader's store-assigned
/// id so it compares across store backends.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Media {
    pub filename: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub caption: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    /// Ordered, trimmed, empty entries dropped
    #[serde(default)]
    pub people: Vec<String>,
    pub uploader_name: String,
    pub uploader_id: String,
    pub created_at: DateTime<Utc>,
}
