//! OpenAPI documentation

use axum::Router;
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{appointments, availability, catalog, clients, health, reports, time_blocks};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Barbershop API",
        version = "1.0.0",
        description = "Appointment booking and back-office REST API for a single-chair barbershop"
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Catalog
        catalog::list_services,
        catalog::list_products,
        // Availability
        availability::month_days,
        availability::day_slots,
        // Appointments
        appointments::create_appointment,
        appointments::list_appointments,
        appointments::my_appointments,
        appointments::confirm_appointment,
        appointments::cancel_appointment,
        // Profile
        clients::get_me,
        clients::update_me,
        clients::list_clients,
        // Time blocks
        time_blocks::list_time_blocks,
        time_blocks::create_time_block,
        time_blocks::delete_time_block,
        // Reports
        reports::revenue_report,
        reports::dashboard,
    ),
    components(
        schemas(
            // Catalog
            crate::models::catalog::CatalogService,
            crate::models::catalog::Product,
            // Availability
            availability::MonthQuery,
            availability::DayQuery,
            crate::availability::AvailabilityKey,
            crate::availability::CalendarMonth,
            crate::availability::DateRange,
            crate::availability::DayAvailability,
            crate::availability::DayPeriod,
            crate::availability::SlotGroups,
            crate::availability::SlotOffer,
            crate::services::availability::CalendarDay,
            crate::services::availability::MonthAvailability,
            crate::services::availability::DaySlots,
            // Appointments
            crate::models::appointment::Appointment,
            crate::models::appointment::AppointmentStatus,
            crate::models::appointment::AppointmentQuery,
            crate::models::appointment::CreateAppointment,
            // Profile
            crate::models::profile::Profile,
            crate::models::profile::Role,
            crate::models::profile::UpdateProfile,
            crate::models::profile::ClientQuery,
            // Time blocks
            crate::models::time_block::TimeBlock,
            crate::models::time_block::CreateTimeBlock,
            crate::models::time_block::TimeBlockQuery,
            // Reports
            crate::models::report::RankedEntry,
            crate::models::report::RevenueReport,
            crate::models::report::DashboardStats,
            crate::models::report::RevenueQuery,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "catalog", description = "Services and products"),
        (name = "availability", description = "Bookable days and start times"),
        (name = "appointments", description = "Booking and agenda"),
        (name = "profile", description = "Client profiles"),
        (name = "time-blocks", description = "Blocked start times"),
        (name = "reports", description = "Revenue and dashboard")
    )
)]
pub struct ApiDoc;

/// Registers the bearer scheme referenced by secured paths
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
