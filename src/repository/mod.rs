//! Repository layer for database operations

pub mod appointments;
pub mod catalog;
#[cfg(test)]
pub mod memory;
pub mod profiles;
pub mod time_blocks;

use sqlx::{Pool, Postgres};

pub use appointments::AppointmentStore;

/// Main repository struct holding database connection pool
#[derive(Clone)]
pub struct Repository {
    pub pool: Pool<Postgres>,
    pub appointments: appointments::AppointmentsRepository,
    pub catalog: catalog::CatalogRepository,
    pub profiles: profiles::ProfilesRepository,
    pub time_blocks: time_blocks::TimeBlocksRepository,
}

impl Repository {
    /// Create a new repository with the given database pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            appointments: appointments::AppointmentsRepository::new(pool.clone()),
            catalog: catalog::CatalogRepository::new(pool.clone()),
            profiles: profiles::ProfilesRepository::new(pool.clone()),
            time_blocks: time_blocks::TimeBlocksRepository::new(pool.clone()),
            pool,
        }
    }

    /// Round-trip to the database (readiness probe)
    pub async fn ping(&self) -> Result<(), sqlx::Error> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
