use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::auth::sessions::resolve_session;
use crate::errors::AppError;
use crate::state::AppState;

/// Extracts `Authorization: Bearer <token>`, resolves the Redis session, and
/// injects an `AuthUser` extension. Every route behind this layer can rely on
/// the extension being present.
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = bearer_token(&request).ok_or(AppError::Unauthorized)?;
    let user = resolve_session(&state, &token).await?;
    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}

fn bearer_token(request: &Request) -> Option<String> {
    request
        .headers()
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request as HttpRequest;

    fn request_with_header(value: Option<&str>) -> Request {
        let mut builder = HttpRequest::builder().uri("/");
        if let Some(v) = value {
            builder = builder.header("authorization", v);
        }
        builder.body(Body::empty()).unwrap()
    }

    #[test]
    fn test_bearer_token_extracted() {
        let req = request_with_header(Some("Bearer abc123"));
        assert_eq!(bearer_token(&req).as_deref(), Some("abc123"));
    }

    #[test]
    fn test_missing_header() {
        let req = request_with_header(None);
        assert!(bearer_token(&req).is_none());
    }

    #[test]
    fn test_wrong_scheme_rejected() {
        let req = request_with_header(Some("Basic abc123"));
        assert!(bearer_token(&req).is_none());
    }

    #[test]
    fn test_empty_token_rejected() {
        let req = request_with_header(Some("Bearer "));
        assert!(bearer_token(&req).is_none());
    }
}
