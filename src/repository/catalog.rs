//! Catalog repository (services and products)

use sqlx::{Pool, Postgres};

use crate::{
    error::AppResult,
    models::catalog::{CatalogService, Product},
};

#[derive(Clone)]
pub struct CatalogRepository {
    pool: Pool<Postgres>,
}

impl CatalogRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Active services in display order
    pub async fn list_services(&self) -> AppResult<Vec<CatalogService>> {
        let rows = sqlx::query_as::<_, CatalogService>(
            r#"
            SELECT id, title, price, duration_minutes, category, icon, position
            FROM services
            WHERE active
            ORDER BY position, id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Active services among `ids` (unknown IDs are simply absent)
    pub async fn get_services(&self, ids: &[i32]) -> AppResult<Vec<CatalogService>> {
        let rows = sqlx::query_as::<_, CatalogService>(
            r#"
            SELECT id, title, price, duration_minutes, category, icon, position
            FROM services
            WHERE active AND id = ANY($1)
            "#,
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn list_products(&self) -> AppResult<Vec<Product>> {
        let rows = sqlx::query_as::<_, Product>(
            "SELECT id, title, price, image_url, category FROM products WHERE active ORDER BY category, title",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}
