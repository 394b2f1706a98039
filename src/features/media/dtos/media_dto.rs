use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::features::comments::dtos::CommentResponseDto;
use crate::shared::constants::ALLOWED_EXTENSIONS;

/// Search query for the browse listing. A missing or empty `q` matches
/// every media record.
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct SearchQuery {
    pub q: Option<String>,
}

/// Upload request DTO for OpenAPI documentation
/// Note: This struct is for Swagger UI documentation only.
/// The actual handler uses axum's Multipart extractor directly.
#[derive(Debug, ToSchema)]
#[allow(dead_code)]
pub struct UploadMediaDto {
    /// The media file to upload
    #[schema(format = Binary, content_media_type = "application/octet-stream")]
    pub file: String,
    pub title: Option<String>,
    pub caption: Option<String>,
    pub location: Option<String>,
    /// Comma-separated list of people pictured
    #[schema(example = "Ayu, Bima")]
    pub people: Option<String>,
}

/// Public view of a media record
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MediaResponseDto {
    /// Store-assigned identifier in canonical string form
    pub id: String,
    /// Generated file reference, servable under /uploads/{filename}
    pub filename: String,
    pub title: Option<String>,
    pub caption: Option<String>,
    pub location: Option<String>,
    pub people: Vec<String>,
    pub uploader_name: String,
    pub uploader_id: String,
    pub created_at: DateTime<Utc>,
}

/// A single media record together with its comments
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MediaDetailDto {
    pub media: MediaResponseDto,
    pub comments: Vec<CommentResponseDto>,
}

/// Extract the lowercased extension if the filename carries an allowed one
pub fn allowed_extension(filename: &str) -> Option<String> {
    let (_, ext) = filename.rsplit_once('.')?;
    let ext = ext.to_lowercase();
    ALLOWED_EXTENSIONS.contains(&ext.as_str()).then_some(ext)
}

/// Content type for serving a stored file, derived from its extension
pub fn content_type_for(filename: &str) -> &'static str {
    match filename.rsplit_once('.').map(|(_, ext)| ext) {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("mp4") => "video/mp4",
        Some("webm") => "video/webm",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allowed_extension_accepts_listed_types_case_insensitively() {
        assert_eq!(allowed_extension("a.png"), Some("png".to_string()));
        assert_eq!(allowed_extension("b.JPG"), Some("jpg".to_string()));
        assert_eq!(allowed_extension("c.tar.webm"), Some("webm".to_string()));
    }

    #[test]
    fn allowed_extension_rejects_everything_else() {
        assert_eq!(allowed_extension("evil.exe"), None);
        assert_eq!(allowed_extension("noext"), None);
        assert_eq!(allowed_extension("archive.svg"), None);
    }

    #[test]
    fn content_types_match_extensions() {
        assert_eq!(content_type_for("x.png"), "image/png");
        assert_eq!(content_type_for("x.jpeg"), "image/jpeg");
        assert_eq!(content_type_for("x.mp4"), "video/mp4");
        assert_eq!(content_type_for("x"), "application/octet-stream");
    }
}
