use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use crate::features::comments::services::CommentService;
use crate::features::media::handlers;
use crate::features::media::services::MediaService;

/// Shared state for media routes. The detail view embeds comments, so the
/// comment service rides along with the media service.
#[derive(Clone)]
pub struct MediaState {
    pub service: Arc<MediaService>,
    pub comments: Arc<CommentService>,
}

/// Session-gated media routes (search, own uploads, upload)
pub fn routes(service: Arc<MediaService>, comments: Arc<CommentService>) -> Router {
    let state = MediaState { service, comments };

    Router::new()
        .route("/api/media", get(handlers::search_media))
        .route("/api/media/mine", get(handlers::my_uploads))
        .route("/api/media/upload", post(handlers::upload_media))
        .with_state(state)
}

/// Public media routes (detail view, stored file serving)
pub fn public_routes(service: Arc<MediaService>, comments: Arc<CommentService>) -> Router {
    let state = MediaState { service, comments };

    Router::new()
        .route("/api/media/{id}", get(handlers::media_detail))
        .route("/uploads/{filename}", get(handlers::serve_upload))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::StorageConfig;
    use crate::modules::store::MemoryCollection;
    use crate::modules::storage::DiskStorage;
    use crate::shared::test_helpers::with_session;
    use axum::http::StatusCode;
    use axum_test::multipart::{MultipartForm, Part};
    use axum_test::TestServer;
    use uuid::Uuid;

    async fn build_services() -> (Arc<MediaService>, Arc<CommentService>) {
        let dir = std::env::temp_dir().join(format!("galeri-test-{}", Uuid::new_v4().simple()));
        let storage = DiskStorage::new(&StorageConfig { upload_dir: dir })
            .await
            .unwrap();
        let media = Arc::new(MediaService::new(
            Arc::new(MemoryCollection::new()),
            Arc::new(storage),
        ));
        let comments = Arc::new(CommentService::new(Arc::new(MemoryCollection::new())));
        (media, comments)
    }

    fn photo_form(title: &str) -> MultipartForm {
        MultipartForm::new()
            .add_text("title", title.to_string())
            .add_text("caption", "from the trip")
            .add_text("location", "Bali")
            .add_text("people", "Ayu, Bima")
            .add_part(
                "file",
                Part::bytes(b"not-really-a-png".to_vec()).file_name("pic.png"),
            )
    }

    #[tokio::test]
    async fn anonymous_request_is_redirected_to_login() {
        let (media, comments) = build_services().await;
        let server = TestServer::new(routes(media, comments)).unwrap();

        let response = server.get("/api/media").await;

        assert_eq!(response.status_code(), StatusCode::SEE_OTHER);
        assert_eq!(response.header("location"), "/login");
    }

    #[tokio::test]
    async fn anonymous_upload_is_bounced_and_stores_nothing() {
        let (media, comments) = build_services().await;
        let server = TestServer::new(routes(Arc::clone(&media), comments)).unwrap();

        let response = server
            .post("/api/media/upload")
            .multipart(photo_form("Sunset at Kuta"))
            .await;

        assert_eq!(response.status_code(), StatusCode::SEE_OTHER);
        assert!(media.search("").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn upload_then_search_finds_the_item() {
        let (media, comments) = build_services().await;
        let server = TestServer::new(with_session(routes(media, comments))).unwrap();

        let created = server
            .post("/api/media/upload")
            .multipart(photo_form("Sunset at Kuta"))
            .await;
        assert_eq!(created.status_code(), StatusCode::CREATED);

        let found = server.get("/api/media").add_query_param("q", "kuta").await;
        assert_eq!(found.status_code(), StatusCode::OK);
        let body: serde_json::Value = found.json();
        assert_eq!(body["data"].as_array().unwrap().len(), 1);
        assert_eq!(body["data"][0]["title"], "Sunset at Kuta");
    }

    #[tokio::test]
    async fn upload_rejects_disallowed_extension() {
        let (media, comments) = build_services().await;
        let server = TestServer::new(with_session(routes(media, comments))).unwrap();

        let form = MultipartForm::new().add_text("title", "Nope").add_part(
            "file",
            Part::bytes(b"MZ".to_vec()).file_name("payload.exe"),
        );
        let response = server.post("/api/media/upload").multipart(form).await;

        assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn detail_view_is_public_and_embeds_comments() {
        let (media, comments) = build_services().await;
        let gated = TestServer::new(with_session(routes(
            Arc::clone(&media),
            Arc::clone(&comments),
        )))
        .unwrap();
        let public = TestServer::new(public_routes(media, comments)).unwrap();

        let created = gated
            .post("/api/media/upload")
            .multipart(photo_form("Sunset at Kuta"))
            .await;
        assert_eq!(created.status_code(), StatusCode::CREATED);
        let body: serde_json::Value = created.json();
        let id = body["data"]["id"].as_str().unwrap().to_string();

        let detail = public.get(&format!("/api/media/{}", id)).await;
        assert_eq!(detail.status_code(), StatusCode::OK);
        let detail_body: serde_json::Value = detail.json();
        assert_eq!(detail_body["data"]["media"]["title"], "Sunset at Kuta");
        assert!(detail_body["data"]["comments"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn unknown_media_id_is_not_found() {
        let (media, comments) = build_services().await;
        let server = TestServer::new(public_routes(media, comments)).unwrap();

        let response = server.get("/api/media/999").await;

        assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
    }
}
