//! API handlers for the Libris REST endpoints

pub mod auth;
pub mod books;
pub mod health;
pub mod loans;
pub mod openapi;
pub mod users;

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};

use crate::{error::AppError, models::user::{Claims, User}, AppState};

/// Extractor for the authenticated, active user behind a bearer token.
///
/// The token's `sub` claim carries the username; the user record is loaded
/// fresh on every request and inactive accounts are rejected.
pub struct CurrentUser(pub User);

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| AppError::Authentication("Missing authorization header".to_string()))?;

        if !auth_header.starts_with("Bearer ") {
            return Err(AppError::Authentication(
                "Invalid authorization header format".to_string(),
            ));
        }

        let token = &auth_header[7..];

        let algorithm = state
            .config
            .auth
            .jwt_algorithm
            .parse()
            .map_err(|_| AppError::Internal("Unsupported JWT algorithm".to_string()))?;

        let claims = Claims::from_token(token, &state.config.auth.jwt_secret, algorithm)
            .map_err(|_| AppError::Authentication("Could not validate credentials".to_string()))?;

        let user = state
            .services
            .users
            .get_by_username(&claims.sub)
            .await?
            .ok_or_else(|| AppError::Authentication("Could not validate credentials".to_string()))?;

        if !user.is_active {
            return Err(AppError::BadRequest("Inactive user".to_string()));
        }

        Ok(CurrentUser(user))
    }
}
