use std::sync::Arc;

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::{StatusCode, request::Parts},
};
use axum_extra::extract::CookieJar;
use jsonwebtoken::{DecodingKey, Validation, decode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Cookie read when the request carries no `Authorization` header.
pub const ACCESS_TOKEN_COOKIE: &str = "access_token";

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub email: Option<String>,
    pub exp: usize,
}

/// Verification material for bearer tokens, provided by router state.
#[derive(Clone)]
pub struct AuthKeys {
    jwt_secret: Arc<str>,
}

impl AuthKeys {
    pub fn new(jwt_secret: &str) -> Self {
        Self {
            jwt_secret: Arc::from(jwt_secret),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: Uuid,
    pub email: Option<String>,
}

#[derive(Debug)]
pub struct AuthError(anyhow::Error);

impl From<anyhow::Error> for AuthError {
    fn from(err: anyhow::Error) -> Self {
        AuthError(err)
    }
}

impl axum::response::IntoResponse for AuthError {
    fn into_response(self) -> axum::response::Response {
        (
            StatusCode::UNAUTHORIZED,
            format!("Unauthorized: {}", self.0),
        )
            .into_response()
    }
}

pub fn validate_jwt(token: &str, secret: &str) -> Result<Claims, AuthError> {
    let decoding_key = DecodingKey::from_secret(secret.as_bytes());
    let validation = Validation::new(jsonwebtoken::Algorithm::HS256);

    let token_data = decode::<Claims>(token, &decoding_key, &validation)
        .map_err(|e| anyhow::anyhow!("JWT validation failed: {}", e))?;

    Ok(token_data.claims)
}

fn bearer_token(parts: &Parts) -> Result<Option<String>, (StatusCode, String)> {
    let Some(auth_header) = parts.headers.get(axum::http::header::AUTHORIZATION) else {
        return Ok(None);
    };

    let auth_str = auth_header.to_str().map_err(|_| {
        (
            StatusCode::UNAUTHORIZED,
            "Invalid Authorization header".to_string(),
        )
    })?;

    auth_str
        .strip_prefix("Bearer ")
        .map(|token| Some(token.to_string()))
        .ok_or((
            StatusCode::UNAUTHORIZED,
            "Invalid Authorization header format".to_string(),
        ))
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    AuthKeys: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = (StatusCode, String);

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let keys = AuthKeys::from_ref(state);

        let token = match bearer_token(parts)? {
            Some(token) => token,
            None => CookieJar::from_headers(&parts.headers)
                .get(ACCESS_TOKEN_COOKIE)
                .map(|cookie| cookie.value().to_string())
                .ok_or((
                    StatusCode::UNAUTHORIZED,
                    "Missing Authorization header".to_string(),
                ))?,
        };

        let claims = validate_jwt(&token, &keys.jwt_secret)
            .map_err(|e| (StatusCode::UNAUTHORIZED, e.0.to_string()))?;

        let user_id = Uuid::parse_str(&claims.sub).map_err(|_| {
            (
                StatusCode::UNAUTHORIZED,
                "Invalid user ID in token".to_string(),
            )
        })?;

        Ok(AuthUser {
            user_id,
            email: claims.email,
        })
    }
}
