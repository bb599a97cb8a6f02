//! Profile and client directory endpoints

use axum::{
    extract::{Query, State},
    Json,
};

use crate::{
    error::AppResult,
    models::profile::{ClientQuery, Profile, UpdateProfile},
    AppState,
};

use super::AuthenticatedUser;

/// Get the caller's profile
#[utoipa::path(
    get,
    path = "/me",
    tag = "profile",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Caller profile", body = Profile),
        (status = 422, description = "Onboarding not completed", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_me(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<Profile>> {
    Ok(Json(state.services.clients.current(&claims).await?))
}

/// Create or update the caller's profile (onboarding)
#[utoipa::path(
    put,
    path = "/me",
    tag = "profile",
    security(("bearer_auth" = [])),
    request_body = UpdateProfile,
    responses(
        (status = 200, description = "Profile saved", body = Profile),
        (status = 400, description = "Invalid name or phone", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_me(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(data): Json<UpdateProfile>,
) -> AppResult<Json<Profile>> {
    let profile = state.services.clients.update_own_profile(&claims, &data).await?;
    Ok(Json(profile))
}

/// Search clients by name, email or phone
#[utoipa::path(
    get,
    path = "/clients",
    tag = "profile",
    security(("bearer_auth" = [])),
    params(ClientQuery),
    responses(
        (status = 200, description = "Matching clients", body = Vec<Profile>)
    )
)]
pub async fn list_clients(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Query(query): Query<ClientQuery>,
) -> AppResult<Json<Vec<Profile>>> {
    state.services.clients.require_admin(&claims).await?;
    let clients = state.services.clients.search(query.search.as_deref()).await?;
    Ok(Json(clients))
}
