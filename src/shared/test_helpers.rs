#[cfg(test)]
use crate::features::auth::models::UserRole;

#[cfg(test)]
use crate::features::auth::session::SessionUser;

#[cfg(test)]
use axum::{extract::Request, middleware::Next, response::Response, Router};

#[cfg(test)]
pub fn create_session_user(user_id: &str, user_name: &str) -> SessionUser {
    SessionUser {
        user_id: user_id.to_string(),
        user_name: user_name.to_string(),
        role: UserRole::Creator,
    }
}

#[cfg(test)]
async fn inject_session_middleware(mut request: Request, next: Next) -> Response {
    request
        .extensions_mut()
        .insert(create_session_user("1", "Test User"));
    next.run(request).await
}

/// Wrap a router so every request carries an authenticated session,
/// bypassing the cookie transport in router tests.
#[cfg(test)]
pub fn with_session(router: Router) -> Router {
    router.layer(axum::middleware::from_fn(inject_session_middleware))
}
