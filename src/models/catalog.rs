//! Service and product catalog

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};

/// A bookable barbershop service
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct CatalogService {
    pub id: i32,
    pub title: String,
    pub price: Decimal,
    pub duration_minutes: i32,
    pub category: String,
    /// Icon name shown next to the service
    pub icon: Option<String>,
    pub position: i32,
}

/// A product sold at the shop
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Product {
    pub id: i32,
    pub title: String,
    pub price: Decimal,
    pub image_url: Option<String>,
    pub category: String,
}

/// Requested duration, either explicit or from selected services
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
pub struct DurationQuery {
    /// Total duration in minutes
    pub duration: Option<u32>,
    /// Comma-separated catalog service IDs
    pub service_ids: Option<String>,
}

impl DurationQuery {
    /// Parse `service_ids`, ignoring blanks
    pub fn parsed_service_ids(&self) -> Result<Vec<i32>, String> {
        self.service_ids
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| s.parse().map_err(|_| format!("Invalid service id '{}'", s)))
            .collect()
    }
}
