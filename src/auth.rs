//! Opaque bearer-token authentication.
//!
//! Tokens are minted by the authentication endpoint against the configured
//! admin credentials and persisted in the auth_token table; a gated handler
//! only checks that the presented token exists.

use axum::http::header::AUTHORIZATION;
use axum::http::HeaderMap;
use rand::Rng;
use sqlx::PgPool;

use crate::db::model;
use crate::error::{ApiError, ApiResult};

/// Extracts the token from an `Authorization: Bearer <token>` header.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

/// True when the request carries a token we have issued. Used where an
/// invalid token narrows the response instead of rejecting the request.
pub async fn has_valid_token(conn: &PgPool, headers: &HeaderMap) -> anyhow::Result<bool> {
    match bearer_token(headers) {
        Some(token) => model::token_exists(conn, token).await,
        None => Ok(false),
    }
}

/// Rejects the request unless it carries a token we have issued.
pub async fn require_token(conn: &PgPool, headers: &HeaderMap) -> ApiResult<()> {
    let token = bearer_token(headers)
        .ok_or_else(|| ApiError::Unauthorized("Authentication credentials were not provided".to_owned()))?;

    if !model::token_exists(conn, token).await? {
        return Err(ApiError::Unauthorized("Invalid token".to_owned()));
    }

    Ok(())
}

/// 40 hex characters, matching the shape of classic DRF auth tokens.
pub fn mint_token() -> String {
    let mut rng = rand::thread_rng();
    (0..20).map(|_| format!("{:02x}", rng.gen::<u8>())).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(value: &str) -> HeaderMap {
        let mut h = HeaderMap::new();
        h.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        h
    }

    #[test]
    fn extracts_bearer_token() {
        assert_eq!(bearer_token(&headers("Bearer abc123")), Some("abc123"));
    }

    #[test]
    fn rejects_other_schemes() {
        assert_eq!(bearer_token(&headers("Token abc123")), None);
        assert_eq!(bearer_token(&headers("abc123")), None);
    }

    #[test]
    fn rejects_empty_token() {
        assert_eq!(bearer_token(&headers("Bearer ")), None);
        assert_eq!(bearer_token(&HeaderMap::new()), None);
    }

    #[test]
    fn minted_tokens_are_40_hex_chars() {
        let token = mint_token();

        assert_eq!(token.len(), 40);
        assert!(token.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(token, mint_token());
    }
}
