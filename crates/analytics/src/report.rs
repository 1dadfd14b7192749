use chrono::{DateTime, NaiveDate, Utc};
use core_types::{ConfidenceLevel, SalesTrend};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Revenue attributed to a single platform group.
///
/// Manual sales carry no platform and land in one synthetic "Unknown" group
/// with a `None` id and no color.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlatformRevenue {
    pub platform_id: Option<Uuid>,
    pub platform_name: String,
    pub color_hex: Option<String>,
    pub revenue: Decimal,
    pub fees: Decimal,
    pub net_revenue: Decimal,
    pub tickets_sold: i64,
}

/// Revenue attributed to a single ticket-type group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TicketTypeRevenue {
    pub ticket_type: String,
    pub revenue: Decimal,
    pub tickets_sold: i64,
    pub avg_price: Decimal,
}

/// The full revenue picture for one event.
///
/// Invariant: `total_revenue` equals the sum of `by_platform` revenues and
/// the sum of `by_ticket_type` revenues; `net_revenue` is always
/// `total_revenue - total_fees`. Both group lists are sorted by revenue
/// descending, ties in first-seen order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RevenueBreakdown {
    pub total_revenue: Decimal,
    pub total_fees: Decimal,
    pub net_revenue: Decimal,
    pub by_platform: Vec<PlatformRevenue>,
    pub by_ticket_type: Vec<TicketTypeRevenue>,
}

impl RevenueBreakdown {
    /// Creates a new, zeroed-out breakdown with empty group lists.
    pub fn new() -> Self {
        Self {
            total_revenue: Decimal::ZERO,
            total_fees: Decimal::ZERO,
            net_revenue: Decimal::ZERO,
            by_platform: Vec::new(),
            by_ticket_type: Vec::new(),
        }
    }
}

impl Default for RevenueBreakdown {
    fn default() -> Self {
        Self::new()
    }
}

/// Tickets and revenue for one UTC calendar day. Days with no sales are
/// never synthesized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailySales {
    pub date: NaiveDate,
    pub tickets_sold: i64,
    pub revenue: Decimal,
}

/// How fast an event is selling, with a coarse trend signal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesVelocity {
    pub total_tickets_sold: i64,
    pub daily_average: Decimal,
    pub weekly_average: Decimal,
    pub trend: SalesTrend,
    pub by_day: Vec<DailySales>,
}

impl SalesVelocity {
    /// Creates the velocity report for an event with no sales yet.
    pub fn new() -> Self {
        Self {
            total_tickets_sold: 0,
            daily_average: Decimal::ZERO,
            weekly_average: Decimal::ZERO,
            trend: SalesTrend::Stable,
            by_day: Vec::new(),
        }
    }
}

impl Default for SalesVelocity {
    fn default() -> Self {
        Self::new()
    }
}

/// A forward extrapolation of final tickets and revenue.
///
/// Without a capacity the projection degenerates to current actuals and the
/// confidence is always `low`. `days_until_sellout` is fractional; callers
/// round for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Projection {
    pub projected_total_revenue: Decimal,
    pub projected_total_tickets: i64,
    pub percentage_sold: Option<Decimal>,
    pub days_until_sellout: Option<Decimal>,
    pub confidence_level: ConfidenceLevel,
    pub as_of: DateTime<Utc>,
}
