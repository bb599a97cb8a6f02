//! Time block endpoints (admin)

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::time_block::{CreateTimeBlock, TimeBlock, TimeBlockQuery},
    AppState,
};

use super::{shop_now, AuthenticatedUser};

/// List time blocks
#[utoipa::path(
    get,
    path = "/time-blocks",
    tag = "time-blocks",
    security(("bearer_auth" = [])),
    params(TimeBlockQuery),
    responses(
        (status = 200, description = "Time blocks", body = Vec<TimeBlock>)
    )
)]
pub async fn list_time_blocks(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Query(query): Query<TimeBlockQuery>,
) -> AppResult<Json<Vec<TimeBlock>>> {
    state.services.clients.require_admin(&claims).await?;
    let today = shop_now(&state)?.date();
    let blocks = state.services.time_blocks.list(&query, today).await?;
    Ok(Json(blocks))
}

/// Block start times on a day
#[utoipa::path(
    post,
    path = "/time-blocks",
    tag = "time-blocks",
    security(("bearer_auth" = [])),
    request_body = CreateTimeBlock,
    responses(
        (status = 201, description = "Time block created", body = TimeBlock),
        (status = 409, description = "A unit is already taken", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_time_block(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(data): Json<CreateTimeBlock>,
) -> AppResult<(StatusCode, Json<TimeBlock>)> {
    let admin = state.services.clients.require_admin(&claims).await?;
    let block = state.services.time_blocks.create(&data, &admin).await?;
    Ok((StatusCode::CREATED, Json(block)))
}

/// Remove a time block
#[utoipa::path(
    delete,
    path = "/time-blocks/{id}",
    tag = "time-blocks",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Time block ID")),
    responses(
        (status = 204, description = "Time block removed")
    )
)]
pub async fn delete_time_block(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    let admin = state.services.clients.require_admin(&claims).await?;
    state.services.time_blocks.delete(id, &admin).await?;
    Ok(StatusCode::NO_CONTENT)
}
