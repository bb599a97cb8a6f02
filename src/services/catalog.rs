//! Catalog provider (bookable services and products)

use rust_decimal::Decimal;

use crate::{
    error::{AppError, AppResult},
    models::{
        appointment::ServiceSelection,
        catalog::{CatalogService, Product},
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct CatalogProvider {
    repository: Repository,
}

impl CatalogProvider {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn list_services(&self) -> AppResult<Vec<CatalogService>> {
        self.repository.catalog.list_services().await
    }

    pub async fn list_products(&self) -> AppResult<Vec<Product>> {
        self.repository.catalog.list_products().await
    }

    /// Aggregate the selected services into one booking request
    pub async fn resolve_selection(&self, ids: &[i32]) -> AppResult<ServiceSelection> {
        if ids.is_empty() {
            return Err(AppError::Validation("Select at least one service".to_string()));
        }
        let services = self.repository.catalog.get_services(ids).await?;
        build_selection(ids, &services)
    }
}

/// Sum durations and prices of `ids` (in the order given) and join names
/// with " + ". Repeated IDs count once.
pub fn build_selection(ids: &[i32], services: &[CatalogService]) -> AppResult<ServiceSelection> {
    if ids.is_empty() {
        return Err(AppError::Validation("Select at least one service".to_string()));
    }

    let mut chosen: Vec<&CatalogService> = Vec::with_capacity(ids.len());
    let mut service_ids = Vec::with_capacity(ids.len());
    for id in ids {
        if service_ids.contains(id) {
            continue;
        }
        let service = services
            .iter()
            .find(|s| s.id == *id)
            .ok_or_else(|| AppError::NotFound(format!("Service {} not found", id)))?;
        service_ids.push(*id);
        chosen.push(service);
    }

    let duration: i32 = chosen.iter().map(|s| s.duration_minutes).sum();
    let duration_minutes = u32::try_from(duration)
        .ok()
        .filter(|d| *d > 0)
        .ok_or_else(|| AppError::Validation("Selected services have no duration".to_string()))?;

    Ok(ServiceSelection {
        service_ids,
        duration_minutes,
        price: chosen.iter().map(|s| s.price).sum::<Decimal>(),
        service_names: chosen
            .iter()
            .map(|s| s.title.as_str())
            .collect::<Vec<_>>()
            .join(" + "),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service(id: i32, title: &str, price: i64, duration: i32) -> CatalogService {
        CatalogService {
            id,
            title: title.to_string(),
            price: Decimal::new(price, 0),
            duration_minutes: duration,
            category: "Cabelo".to_string(),
            icon: None,
            position: id,
        }
    }

    fn menu() -> Vec<CatalogService> {
        vec![
            service(1, "Corte Clássico", 45, 30),
            service(4, "Barba Navalhada", 40, 35),
            service(5, "Barboterapia", 55, 45),
        ]
    }

    #[test]
    fn test_selection_sums_duration_and_price() {
        let selection = build_selection(&[1, 4], &menu()).unwrap();
        assert_eq!(selection.duration_minutes, 65);
        assert_eq!(selection.price, Decimal::new(85, 0));
        assert_eq!(selection.service_names, "Corte Clássico + Barba Navalhada");
        assert_eq!(selection.service_ids, vec![1, 4]);
    }

    #[test]
    fn test_selection_keeps_request_order_and_dedups() {
        let selection = build_selection(&[5, 1, 5], &menu()).unwrap();
        assert_eq!(selection.service_names, "Barboterapia + Corte Clássico");
        assert_eq!(selection.duration_minutes, 75);
    }

    #[test]
    fn test_unknown_service() {
        assert!(matches!(build_selection(&[1, 99], &menu()), Err(AppError::NotFound(_))));
        assert!(matches!(build_selection(&[], &menu()), Err(AppError::Validation(_))));
    }
}
