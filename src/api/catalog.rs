//! Catalog endpoints

use axum::{extract::State, Json};

use crate::{
    error::AppResult,
    models::catalog::{CatalogService, Product},
    AppState,
};

/// List bookable services
#[utoipa::path(
    get,
    path = "/services",
    tag = "catalog",
    responses(
        (status = 200, description = "Services in display order", body = Vec<CatalogService>)
    )
)]
pub async fn list_services(State(state): State<AppState>) -> AppResult<Json<Vec<CatalogService>>> {
    Ok(Json(state.services.catalog.list_services().await?))
}

/// List shop products
#[utoipa::path(
    get,
    path = "/products",
    tag = "catalog",
    responses(
        (status = 200, description = "Products", body = Vec<Product>)
    )
)]
pub async fn list_products(State(state): State<AppState>) -> AppResult<Json<Vec<Product>>> {
    Ok(Json(state.services.catalog.list_products().await?))
}
