use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::Response,
};

use crate::auth::{AuthError, TokenIssuer};
use crate::error::ApiError;
use crate::state::AppState;

/// Authenticated user context extracted from the bearer token
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthUser {
    pub user_id: String,
}

/// Resolve the caller from the Authorization header.
///
/// Pure: no request mutation, no I/O. The caller decides what to do with the
/// identity or the rejection.
pub fn authenticate(headers: &HeaderMap, tokens: &TokenIssuer) -> Result<AuthUser, AuthError> {
    let token = bearer_token(headers).ok_or(AuthError::MissingCredential)?;
    let user_id = tokens.verify(token)?;
    Ok(AuthUser { user_id })
}

/// Gate for protected routes; injects [`AuthUser`] into request extensions.
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let user = authenticate(request.headers(), &state.tokens).map_err(|e| {
        tracing::debug!("Rejected {} {}: {}", request.method(), request.uri().path(), e);
        ApiError::from(e)
    })?;

    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    // Exactly one space after the scheme; the token ends at the next space.
    let token = value.strip_prefix("Bearer ")?.split(' ').next()?;
    if token.is_empty() {
        None
    } else {
        Some(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;
    use chrono::{Duration, Utc};

    fn issuer() -> TokenIssuer {
        TokenIssuer::new("test-secret", Duration::minutes(60))
    }

    fn headers(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn missing_header_is_missing_credential() {
        let err = authenticate(&HeaderMap::new(), &issuer()).unwrap_err();
        assert!(matches!(err, AuthError::MissingCredential));
        assert_eq!(err.to_string(), "Missing token");
    }

    #[test]
    fn non_bearer_forms_are_missing_credential() {
        for value in ["Basic dXNlcjpwdw==", "Bearer", "Bearer ", "Bearer    ", "bearer abc", "Token abc"] {
            let err = authenticate(&headers(value), &issuer()).unwrap_err();
            assert!(matches!(err, AuthError::MissingCredential), "header {:?}", value);
        }
    }

    #[test]
    fn padded_token_is_missing_credential() {
        let token = issuer().sign("u1").unwrap();
        let err = authenticate(&headers(&format!("Bearer    {}", token)), &issuer()).unwrap_err();
        assert!(matches!(err, AuthError::MissingCredential));
    }

    #[test]
    fn garbage_token_is_invalid() {
        let err = authenticate(&headers("Bearer not.a.jwt"), &issuer()).unwrap_err();
        assert!(matches!(err, AuthError::InvalidToken));
        assert_eq!(err.to_string(), "Invalid/expired token");
    }

    #[test]
    fn expired_token_is_invalid() {
        let issuer = issuer();
        let token = issuer
            .sign_at("u1", Utc::now() - Duration::minutes(61))
            .unwrap();
        let err = authenticate(&headers(&format!("Bearer {}", token)), &issuer).unwrap_err();
        assert!(matches!(err, AuthError::InvalidToken));
    }

    #[test]
    fn foreign_secret_is_invalid() {
        let other = TokenIssuer::new("other-secret", Duration::minutes(60));
        let token = other.sign("u1").unwrap();
        let err = authenticate(&headers(&format!("Bearer {}", token)), &issuer()).unwrap_err();
        assert!(matches!(err, AuthError::InvalidToken));
    }

    #[test]
    fn valid_token_yields_subject() {
        let issuer = issuer();
        let token = issuer.sign("u1").unwrap();
        let user = authenticate(&headers(&format!("Bearer {}", token)), &issuer).unwrap();
        assert_eq!(user, AuthUser { user_id: "u1".to_string() });
    }
}
