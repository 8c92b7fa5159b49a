use axum::{
    extract::Request,
    http::header,
    middleware::Next,
    response::{IntoResponse, Response},
};
use subtle::ConstantTimeEq;

use crate::error::ApiError;

/// Configured admin API keys. Empty means admin auth is disabled.
#[derive(Clone, Default)]
pub struct AdminAuth {
    keys: Vec<String>,
}

impl AdminAuth {
    pub fn new(keys: Vec<String>) -> Self {
        Self { keys }
    }

    pub fn is_enabled(&self) -> bool {
        !self.keys.is_empty()
    }

    /// Constant-time match against every configured key
    pub fn authenticate(&self, token: &str) -> bool {
        self.keys
            .iter()
            .fold(false, |found, key| {
                found | bool::from(key.as_bytes().ct_eq(token.as_bytes()))
            })
    }
}

/// Reject admin requests without a valid `Authorization: Bearer` key
pub async fn require_admin(request: Request, next: Next) -> Response {
    let Some(auth) = request.extensions().get::<AdminAuth>().cloned() else {
        return ApiError::Internal(anyhow::anyhow!("AdminAuth extension missing on admin route"))
            .into_response();
    };

    if !auth.is_enabled() {
        return next.run(request).await;
    }

    let token = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "));

    match token {
        Some(token) if auth.authenticate(token.trim()) => next.run(request).await,
        Some(_) => ApiError::Unauthorized("Invalid API key").into_response(),
        None => ApiError::Unauthorized("Missing Authorization header").into_response(),
    }
}
