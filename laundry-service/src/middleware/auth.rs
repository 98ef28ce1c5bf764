use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts},
    middleware::Next,
    response::Response,
};
use service_core::error::AppError;

use crate::{models::Role, services::Claims, AppState};

/// Require a valid bearer token; the decoded claims go into request extensions.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let header_value = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok());

    let Some(header_value) = header_value else {
        tracing::warn!(path = %req.uri().path(), "Authorization header missing");
        return Err(AppError::unauthorized("Authorization header missing"));
    };

    let Some(token) = header_value.strip_prefix("Bearer ") else {
        tracing::warn!(path = %req.uri().path(), "Invalid token format");
        return Err(AppError::unauthorized("Invalid token format"));
    };

    let claims = state.jwt.validate_token(token).map_err(|e| {
        tracing::warn!(path = %req.uri().path(), error = %e, "Invalid token");
        AppError::unauthorized("Invalid token")
    })?;

    req.extensions_mut().insert(claims);

    Ok(next.run(req).await)
}

/// Reject callers whose role is not `required`. Must run after [`auth_middleware`].
pub async fn require_role(
    State(required): State<Role>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let Some(claims) = req.extensions().get::<Claims>() else {
        tracing::warn!("Role check reached without authenticated claims");
        return Err(AppError::unauthorized("Authorization header missing"));
    };

    if claims.role != required {
        tracing::warn!(
            username = %claims.username,
            role = %claims.role,
            required = %required,
            "Forbidden access for role"
        );
        return Err(AppError::forbidden("Forbidden"));
    }

    Ok(next.run(req).await)
}

/// Extractor for the authenticated caller.
pub struct AuthUser(pub Claims);

#[axum::async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let claims = parts.extensions.get::<Claims>().ok_or_else(|| {
            AppError::InternalError(anyhow::anyhow!(
                "Auth claims missing from request extensions"
            ))
        })?;

        Ok(AuthUser(claims.clone()))
    }
}
