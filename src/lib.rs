//! Barbershop booking server
//!
//! REST JSON API for a single-chair barbershop: service catalog, monthly
//! availability, slot booking, the admin agenda, time blocks and revenue
//! reports. The slot computation itself lives in [`availability`] and does
//! no I/O.

use std::sync::Arc;

pub mod api;
pub mod availability;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
}
