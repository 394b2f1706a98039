use std::sync::Arc;

use axum::{routing::post, Router};

use crate::features::comments::handlers;
use crate::features::comments::services::CommentService;

pub fn routes(service: Arc<CommentService>) -> Router {
    Router::new()
        .route("/api/media/{id}/comments", post(handlers::create_comment))
        .with_state(service)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::store::MemoryCollection;
    use crate::shared::test_helpers::with_session;
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use serde_json::json;

    #[tokio::test]
    async fn posting_a_comment_requires_a_session() {
        let service = Arc::new(CommentService::new(Arc::new(MemoryCollection::new())));
        let server = TestServer::new(routes(service)).unwrap();

        let response = server
            .post("/api/media/1/comments")
            .json(&json!({"text": "Bagus!"}))
            .await;

        assert_eq!(response.status_code(), StatusCode::SEE_OTHER);
        assert_eq!(response.header("location"), "/login");
    }

    #[tokio::test]
    async fn comment_is_stored_under_the_given_media_id() {
        let service = Arc::new(CommentService::new(Arc::new(MemoryCollection::new())));
        let server = TestServer::new(with_session(routes(Arc::clone(&service)))).unwrap();

        let response = server
            .post("/api/media/7/comments")
            .json(&json!({"text": "Bagus!"}))
            .await;

        assert_eq!(response.status_code(), StatusCode::CREATED);
        let body: serde_json::Value = response.json();
        assert_eq!(body["data"]["media_id"], "7");
        assert_eq!(body["data"]["text"], "Bagus!");

        let listed = service.list_for_media("7").await.unwrap();
        assert_eq!(listed.len(), 1);
    }

    #[tokio::test]
    async fn empty_comment_text_is_rejected() {
        let service = Arc::new(CommentService::new(Arc::new(MemoryCollection::new())));
        let server = TestServer::new(with_session(routes(service))).unwrap();

        let response = server
            .post("/api/media/1/comments")
            .json(&json!({"text": ""}))
            .await;

        assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    }
}
