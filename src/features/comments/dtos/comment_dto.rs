use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// Comment submission
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateCommentDto {
    #[validate(length(min = 1, message = "text is required"))]
    pub text: String,
}

/// Public view of a comment
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CommentResponseDto {
    pub id: String,
    /// String form of the media identifier the comment was left on
    pub media_id: String,
    pub user_id: String,
    pub user_name: String,
    pub text: String,
    pub created_at: DateTime<Utc>,
}
