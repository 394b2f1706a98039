use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::features::auth::dtos as auth_dtos;
use crate::features::auth::handlers as auth_handlers;
use crate::features::comments::dtos as comments_dtos;
use crate::features::comments::handlers as comments_handlers;
use crate::features::media::dtos as media_dtos;
use crate::features::media::handlers as media_handlers;
use crate::shared::types::{ApiResponse, Meta};

#[derive(OpenApi)]
#[openapi(
    paths(
        // Auth
        auth_handlers::auth_handler::register,
        auth_handlers::auth_handler::login,
        auth_handlers::auth_handler::logout,
        auth_handlers::auth_handler::me,
        // Media
        media_handlers::media_handler::search_media,
        media_handlers::media_handler::my_uploads,
        media_handlers::media_handler::upload_media,
        media_handlers::media_handler::media_detail,
        media_handlers::media_handler::serve_upload,
        // Comments
        comments_handlers::comment_handler::create_comment,
    ),
    components(
        schemas(
            // Shared
            Meta,
            // Auth
            crate::features::auth::models::UserRole,
            auth_dtos::RegisterDto,
            auth_dtos::LoginDto,
            auth_dtos::UserResponseDto,
            auth_dtos::SessionDto,
            ApiResponse<auth_dtos::UserResponseDto>,
            ApiResponse<auth_dtos::SessionDto>,
            // Media
            media_dtos::UploadMediaDto,
            media_dtos::MediaResponseDto,
            media_dtos::MediaDetailDto,
            ApiResponse<media_dtos::MediaResponseDto>,
            ApiResponse<Vec<media_dtos::MediaResponseDto>>,
            ApiResponse<media_dtos::MediaDetailDto>,
            // Comments
            comments_dtos::CreateCommentDto,
            comments_dtos::CommentResponseDto,
            ApiResponse<comments_dtos::CommentResponseDto>,
        )
    ),
    tags(
        (name = "auth", description = "Registration, login and sessions"),
        (name = "media", description = "Media upload, search and retrieval"),
        (name = "comments", description = "Comments on media"),
    ),
    modifiers(&SecurityAddon),
    info(
        title = "Galeri API",
        version = "0.1.0",
        description = "API documentation for Galeri",
    )
)]
pub struct ApiDoc;

/// Adds the session cookie security scheme to the OpenAPI spec
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "session_cookie",
                SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::new(
                    crate::shared::constants::SESSION_COOKIE,
                ))),
            );
        }
    }
}

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}
