// =============================================================================
// ROLE CONSTANTS
// =============================================================================

/// Creator role - can upload media
pub const ROLE_CREATOR: &str = "creator";

/// Consumer role - can search and browse media
pub const ROLE_CONSUMER: &str = "consumer";

// =============================================================================
// UPLOAD LIMITS
// =============================================================================

/// File extensions accepted for upload, matched against the original
/// filename's extension (lowercased)
pub const ALLOWED_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "mp4", "webm"];

/// Maximum upload payload size in bytes (50 MB)
pub const MAX_UPLOAD_SIZE: usize = 50 * 1024 * 1024;

/// Name of the signed session cookie
pub const SESSION_COOKIE: &str = "galeri_session";
