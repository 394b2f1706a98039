use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Comment document. Created on submission, never updated or deleted.
///
/// `media_id` holds the string form of a media identifier; nothing checks
/// that the referenced media still (or ever) exists. Orphaned comments are
/// stored and served like any other.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    pub media_id: String,
    pub user_id: String,
    pub user_name: String,
    pub text: String,
    pub created_at: DateTime<Utc>,
}
