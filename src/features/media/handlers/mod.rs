pub mod media_handler;

pub use media_handler::{media_detail, my_uploads, search_media, serve_upload, upload_media};
