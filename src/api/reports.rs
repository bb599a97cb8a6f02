//! Report endpoints (admin)

use axum::{
    extract::{Query, State},
    Json,
};

use crate::{
    error::AppResult,
    models::report::{DashboardStats, RevenueQuery, RevenueReport},
    AppState,
};

use super::{shop_now, AuthenticatedUser};

/// Revenue report over a date range
#[utoipa::path(
    get,
    path = "/reports/revenue",
    tag = "reports",
    security(("bearer_auth" = [])),
    params(RevenueQuery),
    responses(
        (status = 200, description = "Revenue report", body = RevenueReport)
    )
)]
pub async fn revenue_report(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Query(query): Query<RevenueQuery>,
) -> AppResult<Json<RevenueReport>> {
    state.services.clients.require_admin(&claims).await?;
    Ok(Json(state.services.reports.revenue(&query).await?))
}

/// Dashboard figures for today and the current month
#[utoipa::path(
    get,
    path = "/reports/dashboard",
    tag = "reports",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Dashboard", body = DashboardStats)
    )
)]
pub async fn dashboard(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<DashboardStats>> {
    state.services.clients.require_admin(&claims).await?;
    let today = shop_now(&state)?.date();
    Ok(Json(state.services.reports.dashboard(today).await?))
}
