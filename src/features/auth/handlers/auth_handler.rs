use axum::{extract::State, http::StatusCode, Json};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::AppJson;
use crate::features::auth::dtos::{LoginDto, RegisterDto, SessionDto, UserResponseDto};
use crate::features::auth::routes::AuthState;
use crate::features::auth::services::AuthService;
use crate::features::auth::session::SessionUser;
use crate::shared::constants::SESSION_COOKIE;
use crate::shared::types::ApiResponse;

fn session_cookie(token: String) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build()
}

/// Register a new user account
#[utoipa::path(
    post,
    path = "/api/users/register",
    tag = "auth",
    request_body = RegisterDto,
    responses(
        (status = 201, description = "User created", body = ApiResponse<UserResponseDto>),
        (status = 400, description = "Validation error")
    )
)]
pub async fn register(
    State(state): State<AuthState>,
    AppJson(dto): AppJson<RegisterDto>,
) -> Result<(StatusCode, Json<ApiResponse<UserResponseDto>>)> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let stored = state.service.register(dto).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            Some(AuthService::to_response(&stored)),
            None,
            None,
        )),
    ))
}

/// Log in and establish a session
///
/// On success the signed session cookie is set. A failed credential check
/// is an explicit 401, not a redirect.
#[utoipa::path(
    post,
    path = "/api/users/login",
    tag = "auth",
    request_body = LoginDto,
    responses(
        (status = 200, description = "Session established", body = ApiResponse<SessionDto>),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn login(
    State(state): State<AuthState>,
    jar: CookieJar,
    AppJson(dto): AppJson<LoginDto>,
) -> Result<(CookieJar, Json<ApiResponse<SessionDto>>)> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let stored = state.service.login(&dto.email, &dto.password).await?;

    let user = SessionUser {
        user_id: stored.id.to_string(),
        user_name: stored.doc.name.clone(),
        role: stored.doc.role,
    };
    let token = state.sessions.encode(&user);

    let session = SessionDto {
        user_id: user.user_id,
        user_name: user.user_name,
        role: user.role,
    };

    Ok((
        jar.add(session_cookie(token)),
        Json(ApiResponse::success(Some(session), None, None)),
    ))
}

/// Log out: clear the session cookie
#[utoipa::path(
    post,
    path = "/api/users/logout",
    tag = "auth",
    responses(
        (status = 200, description = "Session cleared")
    )
)]
pub async fn logout(jar: CookieJar) -> (CookieJar, Json<ApiResponse<()>>) {
    let removal = Cookie::build((SESSION_COOKIE, "")).path("/").build();

    (
        jar.remove(removal),
        Json(ApiResponse::success(
            None,
            Some("Logged out".to_string()),
            None,
        )),
    )
}

/// Identity of the current session
#[utoipa::path(
    get,
    path = "/api/users/me",
    tag = "auth",
    responses(
        (status = 200, description = "Current session identity", body = ApiResponse<SessionDto>),
        (status = 303, description = "No session, redirected to login")
    ),
    security(("session_cookie" = []))
)]
pub async fn me(user: SessionUser) -> Json<ApiResponse<SessionDto>> {
    Json(ApiResponse::success(
        Some(SessionDto {
            user_id: user.user_id,
            user_name: user.user_name,
            role: user.role,
        }),
        None,
        None,
    ))
}
