use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

use crate::error::AppError;
use crate::state::SharedState;

/// Proof that the request carried the service key, either as
/// `Authorization: Bearer <key>` or as an `apikey` header.
#[derive(Debug, Clone, Copy)]
pub struct ServiceKey;

pub fn digest(key: &str) -> [u8; 32] {
    Sha256::digest(key.as_bytes()).into()
}

fn matches(presented: &str, expected: &[u8; 32]) -> bool {
    digest(presented)[..].ct_eq(&expected[..]).into()
}

impl FromRequestParts<SharedState> for ServiceKey {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &SharedState,
    ) -> Result<Self, Self::Rejection> {
        if let Some(auth_header) = parts.headers.get("authorization") {
            let auth_str = auth_header
                .to_str()
                .map_err(|_| AppError::Unauthorized("Invalid authorization header".to_string()))?;

            if let Some(token) = auth_str.strip_prefix("Bearer ") {
                if matches(token, &state.service_key_digest) {
                    return Ok(ServiceKey);
                }
                return Err(AppError::Unauthorized("Invalid service key".to_string()));
            }
        }

        if let Some(api_key) = parts.headers.get("apikey") {
            let key = api_key
                .to_str()
                .map_err(|_| AppError::Unauthorized("Invalid apikey header".to_string()))?;
            if matches(key, &state.service_key_digest) {
                return Ok(ServiceKey);
            }
            return Err(AppError::Unauthorized("Invalid service key".to_string()));
        }

        Err(AppError::Unauthorized("Missing service key".to_string()))
    }
}
