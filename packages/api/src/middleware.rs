// ABOUTME: Bearer-token authentication and module access middleware
// ABOUTME: Resolves each route to a required (module, level) and gates it before handlers run

use axum::{
    extract::{Request, State},
    http::Method,
    middleware::Next,
    response::Response,
};
use tracing::{debug, warn};

use schoolgate_auth::{has_module_access, jwt, AccessLevel, Claims, Module};

use crate::error::AppError;
use crate::state::AppState;

/// Authenticated caller, inserted into request extensions for handlers.
#[derive(Debug, Clone)]
pub struct AuthUser(pub Claims);

/// Required access per route. `None` means the route is public.
///
/// Application submission is intentionally open: prospective guardians have
/// no account yet. Anything unmapped is denied by requiring admin on the
/// dashboard module, which only the admin role holds.
fn route_permission(method: &Method, path: &str) -> Option<(Module, AccessLevel)> {
    // Trailing slashes reach the same handlers through nesting; resolve
    // both spellings to the same permission.
    let path = path.trim_end_matches('/');
    if path == "/api/health" {
        return None;
    }
    if *method == Method::POST && path == "/api/admissions" {
        return None;
    }
    if path.starts_with("/api/admissions") {
        return if *method == Method::GET {
            Some((Module::Admissions, AccessLevel::Read))
        } else {
            Some((Module::Admissions, AccessLevel::Write))
        };
    }
    if path.starts_with("/api/students") {
        return Some((Module::Students, AccessLevel::Read));
    }
    Some((Module::Dashboard, AccessLevel::Admin))
}

/// Access-control middleware consulted on every request.
pub async fn access_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    let Some((module, level)) = route_permission(&method, &path) else {
        debug!(path = %path, "Public route, skipping access check");
        return Ok(next.run(request).await);
    };

    let token = request
        .headers()
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .ok_or_else(|| {
            warn!(path = %path, "Missing bearer token");
            AppError::Unauthorized("Bearer token required".to_string())
        })?;

    let claims = jwt::verify(token, &state.jwt_secret).map_err(|e| {
        warn!(path = %path, error = %e, "Token verification failed");
        AppError::from(e)
    })?;

    if !has_module_access(claims.role, module, level) {
        warn!(
            path = %path,
            role = ?claims.role,
            "Access denied: {:?} {:?} required", module, level
        );
        return Err(AppError::Forbidden(format!(
            "Role {:?} has no {:?} access to {:?}",
            claims.role, level, module
        )));
    }

    debug!(path = %path, user = %claims.username, "Access granted");

    request.extensions_mut().insert(AuthUser(claims));

    Ok(next.run(request).await)
}
