use axum::{async_trait, extract::FromRequestParts, http::header::AUTHORIZATION, http::request::Parts};
use uuid::Uuid;

use crate::error::Error;
use crate::utils::token::decode_token;

/// Authenticated caller, extracted from the `Authorization: Bearer` header.
///
/// Handlers that need the current user take this as a parameter, so the
/// authentication requirement is visible in each handler's signature.
#[derive(Debug, Clone, Copy)]
pub struct AuthUser {
    pub user_id: Uuid,
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .ok_or_else(|| Error::Unauthorized("Missing authorization header".to_string()))?;
        let auth_str = header
            .to_str()
            .map_err(|_| Error::Unauthorized("Malformed authorization header".to_string()))?;
        let token = auth_str
            .strip_prefix("Bearer ")
            .ok_or_else(|| Error::Unauthorized("Unsupported authorization scheme".to_string()))?;

        let claims = decode_token(token)?;
        let user_id = Uuid::parse_str(&claims.sub)
            .map_err(|_| Error::Unauthorized("Invalid token subject".to_string()))?;

        Ok(AuthUser { user_id })
    }
}
