// HTTP middleware
// Author: kelexine (https://github.com/kelexine)

use super::routes::AppState;
use crate::config::AuthConfig;
use crate::error::{AuthFailure, TranslateError};
use axum::extract::{Request, State};
use axum::http::header::AUTHORIZATION;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use base64::Engine;
use subtle::ConstantTimeEq;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tracing::warn;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Create request ID layers for the application
pub fn request_id_layers() -> (SetRequestIdLayer<MakeRequestUuid>, PropagateRequestIdLayer) {
    (
        SetRequestIdLayer::x_request_id(MakeRequestUuid),
        PropagateRequestIdLayer::x_request_id(),
    )
}

#[derive(Zeroize, ZeroizeOnDrop)]
struct Credentials {
    user: String,
    pass: String,
}

/// HTTP Basic Auth gate. Without both credentials configured it denies
/// every request.
pub struct BasicAuth {
    credentials: Option<Credentials>,
}

impl BasicAuth {
    pub fn from_config(config: &AuthConfig) -> Self {
        let credentials = match (&config.user, &config.pass) {
            (Some(user), Some(pass)) if !user.is_empty() && !pass.is_empty() => Some(Credentials {
                user: user.clone(),
                pass: pass.clone(),
            }),
            _ => None,
        };

        Self { credentials }
    }

    pub fn is_configured(&self) -> bool {
        self.credentials.is_some()
    }

    /// Check an `Authorization` header value.
    pub fn verify(&self, header: Option<&str>) -> Result<(), AuthFailure> {
        let expected = self.credentials.as_ref().ok_or(AuthFailure::NotConfigured)?;

        let encoded = header
            .and_then(|h| h.strip_prefix("Basic "))
            .ok_or(AuthFailure::MissingHeader)?;

        let mut decoded = base64::engine::general_purpose::STANDARD
            .decode(encoded.trim())
            .map_err(|_| AuthFailure::InvalidCredentials)?;

        let matched = match std::str::from_utf8(&decoded).ok().and_then(|s| s.split_once(':')) {
            Some((user, pass)) => {
                let user_ok = user.as_bytes().ct_eq(expected.user.as_bytes());
                let pass_ok = pass.as_bytes().ct_eq(expected.pass.as_bytes());
                bool::from(user_ok & pass_ok)
            }
            None => false,
        };
        decoded.zeroize();

        if matched {
            Ok(())
        } else {
            Err(AuthFailure::InvalidCredentials)
        }
    }
}

/// Axum middleware guarding the `/api` routes.
pub async fn basic_auth(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok());

    match state.auth.verify(header) {
        Ok(()) => next.run(request).await,
        Err(reason) => {
            warn!("Rejected {} {}: {}", request.method(), request.uri().path(), reason);
            TranslateError::Unauthorized(reason).into_response()
        }
    }
}
