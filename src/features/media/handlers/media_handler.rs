use axum::{
    body::Body,
    extract::{Multipart, Path, Query, State},
    http::{header, StatusCode},
    response::Response,
    Json,
};
use tokio_util::io::ReaderStream;
use tracing::debug;

use crate::core::error::{AppError, Result};
use crate::features::auth::session::SessionUser;
use crate::features::comments::services::CommentService;
use crate::features::media::dtos::{
    allowed_extension, content_type_for, MediaDetailDto, MediaResponseDto, SearchQuery,
    UploadMediaDto,
};
use crate::features::media::routes::MediaState;
use crate::features::media::services::{MediaService, UploadFields};
use crate::shared::constants::MAX_UPLOAD_SIZE;
use crate::shared::types::{ApiResponse, Meta};

/// Browse/search media
///
/// Case-insensitive substring search across title, caption and location;
/// an empty or missing query returns every record.
#[utoipa::path(
    get,
    path = "/api/media",
    tag = "media",
    params(SearchQuery),
    responses(
        (status = 200, description = "Matching media", body = ApiResponse<Vec<MediaResponseDto>>),
        (status = 303, description = "No session, redirected to login")
    ),
    security(("session_cookie" = []))
)]
pub async fn search_media(
    _user: SessionUser,
    State(state): State<MediaState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<ApiResponse<Vec<MediaResponseDto>>>> {
    let results = state.service.search(query.q.as_deref().unwrap_or("")).await?;
    let total = results.len() as i64;
    let items = results.iter().map(MediaService::to_response).collect();

    Ok(Json(ApiResponse::success(
        Some(items),
        None,
        Some(Meta { total }),
    )))
}

/// The current user's own uploads
#[utoipa::path(
    get,
    path = "/api/media/mine",
    tag = "media",
    responses(
        (status = 200, description = "Uploads of the session user", body = ApiResponse<Vec<MediaResponseDto>>),
        (status = 303, description = "No session, redirected to login")
    ),
    security(("session_cookie" = []))
)]
pub async fn my_uploads(
    user: SessionUser,
    State(state): State<MediaState>,
) -> Result<Json<ApiResponse<Vec<MediaResponseDto>>>> {
    let results = state.service.my_uploads(&user.user_id).await?;
    let total = results.len() as i64;
    let items = results.iter().map(MediaService::to_response).collect();

    Ok(Json(ApiResponse::success(
        Some(items),
        None,
        Some(Meta { total }),
    )))
}

/// Upload a media file with metadata
///
/// Accepts multipart/form-data with:
/// - `file`: the media file (required, allow-listed extension, max 50 MB)
/// - `title`, `caption`, `location`: optional metadata
/// - `people`: optional comma-separated names
#[utoipa::path(
    post,
    path = "/api/media/upload",
    tag = "media",
    request_body(
        content = UploadMediaDto,
        content_type = "multipart/form-data",
        description = "Media file plus optional title/caption/location/people fields",
    ),
    responses(
        (status = 201, description = "Media uploaded", body = ApiResponse<MediaResponseDto>),
        (status = 303, description = "No session, redirected to login"),
        (status = 400, description = "Missing file, disallowed type or oversized payload")
    ),
    security(("session_cookie" = []))
)]
pub async fn upload_media(
    user: SessionUser,
    State(state): State<MediaState>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<ApiResponse<MediaResponseDto>>)> {
    let mut file_data: Option<Vec<u8>> = None;
    let mut file_name: Option<String> = None;
    let mut fields = UploadFields::default();

    // Process multipart fields
    while let Some(field) = multipart.next_field().await.map_err(|e| {
        debug!("Failed to read multipart field: {}", e);
        AppError::BadRequest(format!("Failed to read multipart data: {}", e))
    })? {
        let field_name = field.name().unwrap_or("").to_string();

        match field_name.as_str() {
            "file" => {
                let fname = field
                    .file_name()
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| "unnamed".to_string());

                let data = field.bytes().await.map_err(|e| {
                    debug!("Failed to read file bytes: {}", e);
                    AppError::BadRequest(format!("Failed to read file data: {}", e))
                })?;

                file_data = Some(data.to_vec());
                file_name = Some(fname);
            }
            "title" => fields.title = read_text(field).await?,
            "caption" => fields.caption = read_text(field).await?,
            "location" => fields.location = read_text(field).await?,
            "people" => fields.people = read_text(field).await?,
            _ => {
                debug!("Ignoring unknown field: {}", field_name);
            }
        }
    }

    let file_data = file_data.ok_or_else(|| AppError::BadRequest("File is required".to_string()))?;
    let file_name =
        file_name.ok_or_else(|| AppError::BadRequest("Filename is required".to_string()))?;

    if file_data.len() > MAX_UPLOAD_SIZE {
        return Err(AppError::BadRequest(format!(
            "File too large. Maximum size is {} bytes ({} MB)",
            MAX_UPLOAD_SIZE,
            MAX_UPLOAD_SIZE / 1024 / 1024
        )));
    }

    let extension = allowed_extension(&file_name)
        .ok_or_else(|| AppError::BadRequest("Invalid file type".to_string()))?;

    let stored = state
        .service
        .upload(&file_data, &extension, fields, &user)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            Some(MediaService::to_response(&stored)),
            None,
            None,
        )),
    ))
}

/// A single media record with its comments
///
/// The identifier is resolved through both tiers (structured, then string
/// fallback), so it works against either store backend.
#[utoipa::path(
    get,
    path = "/api/media/{id}",
    tag = "media",
    params(
        ("id" = String, Path, description = "Media identifier (string form)")
    ),
    responses(
        (status = 200, description = "Media with comments", body = ApiResponse<MediaDetailDto>),
        (status = 404, description = "Unresolvable identifier")
    )
)]
pub async fn media_detail(
    State(state): State<MediaState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<MediaDetailDto>>> {
    let media = state.service.resolve_by_id(&id).await?;

    // Comments are looked up by the raw identifier the caller used, which
    // matches how they were keyed when posted
    let comments = state.comments.list_for_media(&id).await?;

    let detail = MediaDetailDto {
        media: MediaService::to_response(&media),
        comments: comments.iter().map(CommentService::to_response).collect(),
    };

    Ok(Json(ApiResponse::success(Some(detail), None, None)))
}

/// Serve a stored upload as a byte stream
#[utoipa::path(
    get,
    path = "/uploads/{filename}",
    tag = "media",
    params(
        ("filename" = String, Path, description = "Generated on-disk filename from a media record")
    ),
    responses(
        (status = 200, description = "File bytes, content type derived from the extension"),
        (status = 404, description = "Unknown filename")
    )
)]
pub async fn serve_upload(
    State(state): State<MediaState>,
    Path(filename): Path<String>,
) -> Result<Response> {
    let file = state.service.open_file(&filename).await?;
    let body = Body::from_stream(ReaderStream::new(file));

    Response::builder()
        .header(header::CONTENT_TYPE, content_type_for(&filename))
        .body(body)
        .map_err(|e| AppError::Internal(format!("Failed to build response: {}", e)))
}

async fn read_text(field: axum::extract::multipart::Field<'_>) -> Result<Option<String>> {
    let text = field
        .text()
        .await
        .map_err(|e| AppError::BadRequest(format!("Failed to read form field: {}", e)))?;

    Ok((!text.is_empty()).then_some(text))
}
