//! Time blocks repository

use chrono::NaiveDate;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::time_block::TimeBlock,
};

#[derive(Clone)]
pub struct TimeBlocksRepository {
    pool: Pool<Postgres>,
}

const SELECT_BLOCKS: &str = r#"
    SELECT b.id, b.day, b.reason, b.created_by, b.crea_date,
           COALESCE(ARRAY_AGG(u.start_minute ORDER BY u.start_minute)
                    FILTER (WHERE u.start_minute IS NOT NULL), '{}') AS start_minutes
    FROM time_blocks b
    LEFT JOIN occupied_units u ON u.time_block_id = b.id
"#;

impl TimeBlocksRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Blocks whose day falls in the inclusive range
    pub async fn list(&self, start: NaiveDate, end: NaiveDate) -> AppResult<Vec<TimeBlock>> {
        let query = format!(
            "{} WHERE b.day BETWEEN $1 AND $2 GROUP BY b.id ORDER BY b.day, MIN(u.start_minute)",
            SELECT_BLOCKS
        );
        let rows = sqlx::query_as::<_, TimeBlock>(&query)
            .bind(start)
            .bind(end)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::from_store)?;
        Ok(rows)
    }

    /// Hold `units` on `day`; fails with a slot conflict if any is taken
    pub async fn create(
        &self,
        day: NaiveDate,
        units: &[i16],
        reason: Option<&str>,
        created_by: Uuid,
    ) -> AppResult<TimeBlock> {
        let id = Uuid::new_v4();
        let mut tx = self.pool.begin().await.map_err(AppError::from_store)?;

        sqlx::query("INSERT INTO time_blocks (id, day, reason, created_by) VALUES ($1, $2, $3, $4)")
            .bind(id)
            .bind(day)
            .bind(reason)
            .bind(created_by)
            .execute(&mut *tx)
            .await
            .map_err(AppError::from_store)?;

        sqlx::query(
            r#"
            INSERT INTO occupied_units (day, start_minute, time_block_id)
            SELECT $1, unit, $3 FROM UNNEST($2::SMALLINT[]) AS unit
            "#,
        )
        .bind(day)
        .bind(units)
        .bind(id)
        .execute(&mut *tx)
        .await
        .map_err(AppError::from_store)?;

        let query = format!("{} WHERE b.id = $1 GROUP BY b.id", SELECT_BLOCKS);
        let block = sqlx::query_as::<_, TimeBlock>(&query)
            .bind(id)
            .fetch_one(&mut *tx)
            .await
            .map_err(AppError::from_store)?;

        tx.commit().await.map_err(AppError::from_store)?;
        Ok(block)
    }

    /// Delete a block; its units are released with it
    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM time_blocks WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(AppError::from_store)?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Time block {} not found", id)));
        }
        Ok(())
    }
}
