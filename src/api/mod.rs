//! API handlers for the barbershop REST endpoints

pub mod appointments;
pub mod availability;
pub mod catalog;
pub mod clients;
pub mod health;
pub mod openapi;
pub mod reports;
pub mod time_blocks;

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use chrono::NaiveDateTime;

use crate::{error::{AppError, AppResult}, models::profile::AccessClaims, AppState};

/// Extractor for the authenticated caller (identity-provider JWT)
pub struct AuthenticatedUser(pub AccessClaims);

#[async_trait]
impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| AppError::Authentication("Missing authorization header".to_string()))?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or_else(|| AppError::Authentication("Invalid authorization header format".to_string()))?;

        let claims = AccessClaims::from_token(token, &state.config.auth)
            .map_err(|e| AppError::Authentication(e.to_string()))?;

        Ok(AuthenticatedUser(claims))
    }
}

/// Shop-local wall clock
pub(crate) fn shop_now(state: &AppState) -> AppResult<NaiveDateTime> {
    Ok(state.config.shop.local_now()?)
}
