use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::AppJson;
use crate::features::auth::session::SessionUser;
use crate::features::comments::dtos::{CommentResponseDto, CreateCommentDto};
use crate::features::comments::services::CommentService;
use crate::shared::types::ApiResponse;

/// Post a comment on a media record
///
/// The media identifier is taken as-is; whether it references an existing
/// record is deliberately not checked.
#[utoipa::path(
    post,
    path = "/api/media/{id}/comments",
    tag = "comments",
    params(
        ("id" = String, Path, description = "Media identifier (string form)")
    ),
    request_body = CreateCommentDto,
    responses(
        (status = 201, description = "Comment stored", body = ApiResponse<CommentResponseDto>),
        (status = 303, description = "No session, redirected to login"),
        (status = 400, description = "Validation error")
    ),
    security(("session_cookie" = []))
)]
pub async fn create_comment(
    user: SessionUser,
    State(service): State<Arc<CommentService>>,
    Path(id): Path<String>,
    AppJson(dto): AppJson<CreateCommentDto>,
) -> Result<(StatusCode, Json<ApiResponse<CommentResponseDto>>)> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let stored = service.add(&id, &user, dto.text).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            Some(CommentService::to_response(&stored)),
            None,
            None,
        )),
    ))
}
