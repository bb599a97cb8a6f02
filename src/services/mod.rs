//! Business logic services

pub mod agenda;
pub mod availability;
pub mod booking;
pub mod catalog;
pub mod clients;
pub mod reports;
pub mod time_blocks;

use std::sync::Arc;

use crate::{config::AppConfig, error::AppResult, repository::{AppointmentStore, Repository}};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub availability: availability::AvailabilityService,
    pub booking: booking::BookingService,
    pub agenda: agenda::AgendaService,
    pub catalog: catalog::CatalogProvider,
    pub clients: clients::ClientsService,
    pub time_blocks: time_blocks::TimeBlocksService,
    pub reports: reports::ReportsService,
    pub repository: Repository,
}

impl Services {
    /// Create all services with the given repository.
    ///
    /// Fails when the configured operating hours or timezone offset are invalid.
    pub fn new(repository: Repository, config: &AppConfig) -> AppResult<Self> {
        let hours = config.shop.operating_hours()?;
        config.shop.offset()?;
        let points = config.loyalty.points_per_booking;
        let store: Arc<dyn AppointmentStore> = Arc::new(repository.appointments.clone());

        Ok(Self {
            availability: availability::AvailabilityService::new(store.clone(), hours.clone()),
            booking: booking::BookingService::new(store.clone(), hours.clone(), points),
            agenda: agenda::AgendaService::new(store.clone(), points),
            catalog: catalog::CatalogProvider::new(repository.clone()),
            clients: clients::ClientsService::new(repository.clone()),
            time_blocks: time_blocks::TimeBlocksService::new(repository.clone(), hours),
            reports: reports::ReportsService::new(store),
            repository,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use sqlx::postgres::PgPoolOptions;

    fn lazy_repository() -> Repository {
        let pool = PgPoolOptions::new()
            .connect_lazy("postgres://localhost/barbershop")
            .unwrap();
        Repository::new(pool)
    }

    #[tokio::test]
    async fn test_bad_timezone_offset_stops_startup() {
        let mut config = AppConfig::default();
        config.shop.timezone_offset_minutes = i32::MAX;
        assert!(matches!(
            Services::new(lazy_repository(), &config),
            Err(AppError::InvalidConfiguration(_))
        ));
    }

    #[tokio::test]
    async fn test_default_config_builds_services() {
        assert!(Services::new(lazy_repository(), &AppConfig::default()).is_ok());
    }
}
