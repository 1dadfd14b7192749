//! # Overzeer Dashboard Facade
//!
//! The orchestration layer between storage and the analytics engine. It
//! resolves an event (or a user's whole account), pulls the sale records,
//! and computes the derived views from one consistent snapshot.
//!
//! This is the only place the event-not-found error contract lives; the
//! aggregation functions underneath are total and never fail.

use analytics::{AnalyticsEngine, Projection, RevenueBreakdown, SalesVelocity};
use chrono::{DateTime, NaiveDate, Utc};
use core_types::{EventRecord, SaleRecord};
use database::{DbRepository, EventWithSales, RecentSaleRow};
use futures::future::join_all;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub mod error;

pub use error::DashboardError;

/// How many sales the account overview surfaces in its activity feed.
const RECENT_SALES_LIMIT: i64 = 10;

/// Fallback platform label for manual sales.
const UNKNOWN_PLATFORM: &str = "Unknown";

/// Everything the per-event analytics view needs, computed from one record
/// set and one `now` snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventAnalytics {
    pub revenue: RevenueBreakdown,
    pub velocity: SalesVelocity,
    pub projections: Projection,
}

/// Per-event rollup for the account overview. Breakdown detail is dropped
/// at this granularity; only the totals survive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventSummary {
    pub event_id: Uuid,
    pub event_name: String,
    pub date: NaiveDate,
    pub venue: Option<String>,
    pub revenue: Decimal,
    pub tickets_sold: i64,
    pub fees: Decimal,
}

/// One line of the recent-activity feed, annotated with resolved event and
/// platform names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecentSale {
    pub sale_id: Uuid,
    pub event_id: Uuid,
    pub event_name: String,
    pub platform_id: Option<Uuid>,
    pub platform_name: String,
    pub ticket_type: Option<String>,
    pub quantity: i64,
    pub unit_price: Decimal,
    pub fees: Decimal,
    pub revenue: Decimal,
    pub sold_at: DateTime<Utc>,
}

/// The cross-event view for one account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountOverview {
    pub total_events: usize,
    pub total_revenue: Decimal,
    pub total_tickets_sold: i64,
    pub total_fees: Decimal,
    pub event_summaries: Vec<EventSummary>,
    pub recent_sales: Vec<RecentSale>,
}

/// The analytics facade. Stateless; every call recomputes from the current
/// record set.
#[derive(Debug, Clone, Default)]
pub struct AnalyticsService {
    engine: AnalyticsEngine,
}

impl AnalyticsService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Computes the revenue, velocity, and projection views for one event.
    ///
    /// The `now` snapshot is captured once so the three views agree with
    /// each other. After computing, the projection is appended to the
    /// history table; a failure there is logged and swallowed since the
    /// returned value does not depend on it.
    pub async fn event_analytics(
        &self,
        repo: &DbRepository,
        event_id: Uuid,
    ) -> Result<EventAnalytics, DashboardError> {
        let event = repo
            .get_event(event_id)
            .await
            .map_err(|e| map_event_error(e, event_id))?;
        let sales = repo.get_sales_for_event(event_id).await?;

        let now = Utc::now();
        let revenue = self.engine.revenue_breakdown(&sales);
        let velocity = self.engine.sales_velocity(&sales, now);
        let projections = self.engine.projection(&event, &velocity, &revenue, now);

        if let Err(e) = repo.save_projection(event_id, &projections).await {
            tracing::warn!(error = ?e, %event_id, "Failed to record projection history.");
        }

        Ok(EventAnalytics {
            revenue,
            velocity,
            projections,
        })
    }

    /// Computes the account-wide overview for a user.
    ///
    /// Per-event aggregation has no cross-event dependency, so the rollups
    /// are computed concurrently and merged by summation.
    pub async fn account_overview(
        &self,
        repo: &DbRepository,
        user_id: Uuid,
    ) -> Result<AccountOverview, DashboardError> {
        let events = repo.get_events_with_sales_for_user(user_id).await?;
        let recent = repo
            .get_recent_sales_for_user(user_id, RECENT_SALES_LIMIT)
            .await?;

        let summaries = join_all(events.into_iter().map(
            |EventWithSales { event, sales }| async move { summarize_event(event, &sales) },
        ))
        .await;

        Ok(build_overview(summaries, recent))
    }
}

/// A missing event row is the caller's mistake, not an infrastructure
/// failure; everything else passes through as a database error.
fn map_event_error(e: database::DbError, event_id: Uuid) -> DashboardError {
    match e {
        database::DbError::NotFound => DashboardError::EventNotFound(event_id),
        other => DashboardError::Db(other),
    }
}

/// Rolls one event's sales up into its overview summary.
fn summarize_event(event: EventRecord, sales: &[SaleRecord]) -> EventSummary {
    let breakdown = AnalyticsEngine::new().revenue_breakdown(sales);
    EventSummary {
        event_id: event.id,
        event_name: event.name,
        date: event.date,
        venue: event.venue,
        revenue: breakdown.total_revenue,
        tickets_sold: sales.iter().map(|s| s.quantity).sum(),
        fees: breakdown.total_fees,
    }
}

/// Merges per-event summaries and the recent-sales rows into the final
/// overview. Summation is commutative, so the order the summaries were
/// computed in never matters.
fn build_overview(mut summaries: Vec<EventSummary>, recent: Vec<RecentSaleRow>) -> AccountOverview {
    let mut total_revenue = Decimal::ZERO;
    let mut total_tickets_sold = 0;
    let mut total_fees = Decimal::ZERO;
    for summary in &summaries {
        total_revenue += summary.revenue;
        total_tickets_sold += summary.tickets_sold;
        total_fees += summary.fees;
    }

    summaries.sort_by(|a, b| b.date.cmp(&a.date));

    let recent_sales = recent.into_iter().map(annotate_recent_sale).collect();

    AccountOverview {
        total_events: summaries.len(),
        total_revenue,
        total_tickets_sold,
        total_fees,
        event_summaries: summaries,
        recent_sales,
    }
}

/// Fills in derived fields and the platform-name fallback for one feed row.
fn annotate_recent_sale(row: RecentSaleRow) -> RecentSale {
    let revenue = Decimal::from(row.quantity) * row.unit_price;
    RecentSale {
        sale_id: row.sale_id,
        event_id: row.event_id,
        event_name: row.event_name,
        platform_id: row.platform_id,
        platform_name: row
            .platform_name
            .unwrap_or_else(|| UNKNOWN_PLATFORM.to_string()),
        ticket_type: row.ticket_type,
        quantity: row.quantity,
        unit_price: row.unit_price,
        fees: row.fees.unwrap_or(Decimal::ZERO),
        revenue,
        sold_at: row.sold_at,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    fn event(id_byte: u8, name: &str, date: NaiveDate) -> EventRecord {
        EventRecord {
            id: Uuid::from_bytes([id_byte; 16]),
            name: name.to_string(),
            date,
            venue: None,
            total_capacity: Some(500),
        }
    }

    fn sale(event_id: Uuid, quantity: i64, unit_price: Decimal, fees: Decimal) -> SaleRecord {
        SaleRecord {
            id: Uuid::new_v4(),
            event_id,
            quantity,
            unit_price,
            fees,
            ticket_type: None,
            platform: None,
            sold_at: Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap(),
        }
    }

    #[test]
    fn summaries_keep_totals_and_drop_breakdowns() {
        let e = event(1, "Opening Night", NaiveDate::from_ymd_opt(2025, 7, 1).unwrap());
        let sales = vec![
            sale(e.id, 2, dec!(100), dec!(10)),
            sale(e.id, 3, dec!(50), dec!(5)),
        ];

        let summary = summarize_event(e, &sales);
        assert_eq!(summary.revenue, dec!(350));
        assert_eq!(summary.tickets_sold, 5);
        assert_eq!(summary.fees, dec!(15));
    }

    #[test]
    fn overview_sums_events_and_sorts_by_date_descending() {
        let early = event(1, "Spring Show", NaiveDate::from_ymd_opt(2025, 4, 1).unwrap());
        let late = event(2, "Summer Show", NaiveDate::from_ymd_opt(2025, 8, 1).unwrap());
        let summaries = vec![
            summarize_event(early, &[sale(Uuid::from_bytes([1; 16]), 10, dec!(20), dec!(2))]),
            summarize_event(late, &[sale(Uuid::from_bytes([2; 16]), 5, dec!(40), dec!(0))]),
        ];

        let overview = build_overview(summaries, Vec::new());
        assert_eq!(overview.total_events, 2);
        assert_eq!(overview.total_revenue, dec!(400));
        assert_eq!(overview.total_tickets_sold, 15);
        assert_eq!(overview.total_fees, dec!(2));
        assert_eq!(overview.event_summaries[0].event_name, "Summer Show");
        assert_eq!(overview.event_summaries[1].event_name, "Spring Show");
    }

    #[test]
    fn missing_events_surface_as_event_not_found() {
        let event_id = Uuid::from_bytes([5; 16]);
        let mapped = map_event_error(database::DbError::NotFound, event_id);
        assert!(matches!(mapped, DashboardError::EventNotFound(id) if id == event_id));
    }

    #[test]
    fn recent_sales_normalize_platform_and_derive_revenue() {
        let row = RecentSaleRow {
            sale_id: Uuid::from_bytes([3; 16]),
            event_id: Uuid::from_bytes([1; 16]),
            event_name: "Opening Night".to_string(),
            platform_id: None,
            platform_name: None,
            ticket_type: Some("GA".to_string()),
            quantity: 4,
            unit_price: dec!(25),
            fees: None,
            sold_at: Utc.with_ymd_and_hms(2025, 6, 2, 9, 0, 0).unwrap(),
        };

        let annotated = annotate_recent_sale(row);
        assert_eq!(annotated.platform_name, "Unknown");
        assert_eq!(annotated.revenue, dec!(100));
        assert_eq!(annotated.fees, Decimal::ZERO);
    }
}
