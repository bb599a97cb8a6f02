//! Revenue reports and dashboard figures

use std::collections::HashMap;
use std::sync::Arc;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::{
    availability::CalendarMonth,
    error::{AppError, AppResult},
    models::{
        appointment::{Appointment, AppointmentFilter, AppointmentStatus},
        parse_date,
        report::{DashboardStats, RankedEntry, RevenueQuery, RevenueReport},
    },
    repository::AppointmentStore,
};

const TOP_N: usize = 3;

#[derive(Clone)]
pub struct ReportsService {
    store: Arc<dyn AppointmentStore>,
}

impl ReportsService {
    pub fn new(store: Arc<dyn AppointmentStore>) -> Self {
        Self { store }
    }

    pub async fn revenue(&self, query: &RevenueQuery) -> AppResult<RevenueReport> {
        let start = parse_date(&query.start_date, "start_date")?;
        let end = parse_date(&query.end_date, "end_date")?;
        if end < start {
            return Err(AppError::Validation("end_date is before start_date".to_string()));
        }
        let rows = self
            .store
            .list_appointments(AppointmentFilter {
                start: Some(start),
                end: Some(end),
                ..AppointmentFilter::default()
            })
            .await?;
        Ok(summarize(start, end, &rows))
    }

    pub async fn dashboard(&self, today: NaiveDate) -> AppResult<DashboardStats> {
        let month = CalendarMonth::containing(today);
        let month_rows = self
            .store
            .list_appointments(AppointmentFilter {
                start: Some(month.first_day()),
                end: Some(today),
                ..AppointmentFilter::default()
            })
            .await?;
        let pending = self
            .store
            .list_appointments(AppointmentFilter {
                start: Some(today),
                status: Some(AppointmentStatus::Pending),
                ..AppointmentFilter::default()
            })
            .await?;
        Ok(dashboard_from(today, &month_rows, pending.len() as i64))
    }
}

/// Aggregate appointments of `[start, end]` into a revenue report.
///
/// Only confirmed appointments count towards revenue, clients and services;
/// combined services ("A + B") count once per service.
pub fn summarize(start: NaiveDate, end: NaiveDate, rows: &[Appointment]) -> RevenueReport {
    let mut report = RevenueReport {
        start_date: start,
        end_date: end,
        total_revenue: Decimal::ZERO,
        confirmed_count: 0,
        pending_count: 0,
        cancelled_count: 0,
        total_services: 0,
        top_clients: Vec::new(),
        top_services: Vec::new(),
    };
    let mut clients: HashMap<&str, i64> = HashMap::new();
    let mut services: HashMap<&str, i64> = HashMap::new();

    for row in rows.iter().filter(|r| r.day >= start && r.day <= end) {
        match row.status {
            AppointmentStatus::Confirmed => {
                report.total_revenue += row.price;
                report.confirmed_count += 1;
                *clients.entry(row.client_name.as_str()).or_default() += 1;
                for name in split_services(&row.service_names) {
                    *services.entry(name).or_default() += 1;
                    report.total_services += 1;
                }
            }
            AppointmentStatus::Pending => report.pending_count += 1,
            AppointmentStatus::Cancelled => report.cancelled_count += 1,
        }
    }

    report.top_clients = top(clients, TOP_N);
    report.top_services = top(services, TOP_N);
    report
}

/// Dashboard figures from the month-to-date rows
pub fn dashboard_from(today: NaiveDate, month_rows: &[Appointment], pending_count: i64) -> DashboardStats {
    let month = summarize(CalendarMonth::containing(today).first_day(), today, month_rows);

    let today_revenue = month_rows
        .iter()
        .filter(|r| r.day == today && r.status == AppointmentStatus::Confirmed)
        .map(|r| r.price)
        .sum::<Decimal>();

    let average_ticket = if month.confirmed_count > 0 {
        (month.total_revenue / Decimal::from(month.confirmed_count)).round_dp(2)
    } else {
        Decimal::ZERO
    };

    let mut today_appointments: Vec<Appointment> = month_rows
        .iter()
        .filter(|r| r.day == today && r.status.occupies_time())
        .cloned()
        .collect();
    today_appointments.sort_by_key(|r| r.start_time);

    DashboardStats {
        day: today,
        month_revenue: month.total_revenue,
        month_confirmed: month.confirmed_count,
        today_revenue,
        average_ticket,
        best_service: month.top_services.first().map(|s| s.name.clone()),
        pending_count,
        today_appointments,
    }
}

fn split_services(names: &str) -> impl Iterator<Item = &str> {
    names.split('+').map(str::trim).filter(|s| !s.is_empty())
}

/// Highest counts first, ties by name
fn top(counts: HashMap<&str, i64>, n: usize) -> Vec<RankedEntry> {
    let mut entries: Vec<(&str, i64)> = counts.into_iter().collect();
    entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    entries
        .into_iter()
        .take(n)
        .map(|(name, count)| RankedEntry {
            name: name.to_string(),
            count,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveTime, Utc};
    use uuid::Uuid;

    fn day(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, m, d).unwrap()
    }

    fn row(client: &str, services: &str, on: NaiveDate, hour: u32, price: i64, status: AppointmentStatus) -> Appointment {
        Appointment {
            id: Uuid::new_v4(),
            client_id: Uuid::new_v4(),
            client_name: client.to_string(),
            service_names: services.to_string(),
            day: on,
            start_time: NaiveTime::from_hms_opt(hour, 0, 0).unwrap(),
            duration_minutes: 30,
            price: Decimal::new(price, 0),
            status,
            payment_method: "local".to_string(),
            created_by: None,
            crea_date: Utc::now(),
            modif_date: None,
        }
    }

    fn history() -> Vec<Appointment> {
        use AppointmentStatus::*;
        vec![
            row("João Silva", "Corte Clássico", day(10, 14), 9, 45, Confirmed),
            row("Pedro Santos", "Barba + Corte", day(10, 14), 10, 80, Confirmed),
            row("Lucas M.", "Degradê", day(10, 15), 14, 50, Pending),
            row("Matheus O.", "Barboterapia", day(10, 14), 14, 55, Cancelled),
            row("João Silva", "Corte", day(10, 2), 11, 45, Confirmed),
            row("Pedro Santos", "Barba", day(9, 20), 15, 40, Confirmed),
        ]
    }

    #[test]
    fn test_summarize_counts_confirmed_only() {
        let report = summarize(day(10, 1), day(10, 31), &history());

        assert_eq!(report.total_revenue, Decimal::new(170, 0));
        assert_eq!(report.confirmed_count, 3);
        assert_eq!(report.pending_count, 1);
        assert_eq!(report.cancelled_count, 1);
        // "Barba + Corte" counts as two services
        assert_eq!(report.total_services, 4);
        assert_eq!(
            report.top_clients,
            vec![
                RankedEntry { name: "João Silva".to_string(), count: 2 },
                RankedEntry { name: "Pedro Santos".to_string(), count: 1 },
            ]
        );
        assert_eq!(report.top_services[0], RankedEntry { name: "Corte".to_string(), count: 2 });
    }

    #[test]
    fn test_top_three_ties_broken_by_name() {
        let mut counts = HashMap::new();
        counts.insert("Degradê", 2);
        counts.insert("Barba", 2);
        counts.insert("Corte", 5);
        counts.insert("Alisamento", 1);
        let ranked: Vec<String> = top(counts, 3).into_iter().map(|e| e.name).collect();
        assert_eq!(ranked, vec!["Corte", "Barba", "Degradê"]);
    }

    #[test]
    fn test_empty_range() {
        let report = summarize(day(11, 1), day(11, 30), &history());
        assert_eq!(report.total_revenue, Decimal::ZERO);
        assert!(report.top_clients.is_empty());
    }

    #[test]
    fn test_dashboard() {
        let rows: Vec<Appointment> = history().into_iter().filter(|r| r.day >= day(10, 1)).collect();
        let stats = dashboard_from(day(10, 14), &rows, 1);

        assert_eq!(stats.today_revenue, Decimal::new(125, 0));
        assert_eq!(stats.month_revenue, Decimal::new(170, 0));
        assert_eq!(stats.month_confirmed, 3);
        assert_eq!(stats.average_ticket, Decimal::new(5667, 2));
        assert_eq!(stats.best_service.as_deref(), Some("Corte"));
        // Cancelled appointments drop off the day view
        assert_eq!(stats.today_appointments.len(), 2);
        assert_eq!(stats.pending_count, 1);
    }
}
