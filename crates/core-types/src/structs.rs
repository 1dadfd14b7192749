use crate::error::CoreError;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A reference to the ticketing platform a sale came from.
///
/// The `color_hex` is a presentation hint carried through to the dashboard
/// charts; it is never interpreted by the analytics engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformRef {
    pub id: Uuid,
    pub name: String,
    pub color_hex: Option<String>,
}

/// A single ticket sale transaction against an event.
///
/// Records are immutable inputs to the analytics engine. A record with no
/// `platform` is a manual sale; it is grouped under a synthetic "Unknown"
/// platform during aggregation. `fees` are tracked separately and never
/// subtracted from gross revenue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaleRecord {
    pub id: Uuid,
    pub event_id: Uuid,
    pub quantity: i64,
    pub unit_price: Decimal,
    pub fees: Decimal,
    pub ticket_type: Option<String>,
    pub platform: Option<PlatformRef>,
    pub sold_at: DateTime<Utc>,
}

impl SaleRecord {
    /// Builds a validated sale record. `fees` defaults to zero when absent.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: Uuid,
        event_id: Uuid,
        quantity: i64,
        unit_price: Decimal,
        fees: Option<Decimal>,
        ticket_type: Option<String>,
        platform: Option<PlatformRef>,
        sold_at: DateTime<Utc>,
    ) -> Result<Self, CoreError> {
        if quantity <= 0 {
            return Err(CoreError::InvalidInput(
                "quantity".to_string(),
                format!("must be positive, got {}", quantity),
            ));
        }
        if unit_price < Decimal::ZERO {
            return Err(CoreError::InvalidInput(
                "unit_price".to_string(),
                format!("must not be negative, got {}", unit_price),
            ));
        }
        let fees = fees.unwrap_or(Decimal::ZERO);
        if fees < Decimal::ZERO {
            return Err(CoreError::InvalidInput(
                "fees".to_string(),
                format!("must not be negative, got {}", fees),
            ));
        }
        Ok(Self {
            id,
            event_id,
            quantity,
            unit_price,
            fees,
            ticket_type,
            platform,
            sold_at,
        })
    }

    /// Gross revenue for this record: `quantity * unit_price`, fees untouched.
    pub fn gross_revenue(&self) -> Decimal {
        Decimal::from(self.quantity) * self.unit_price
    }
}

/// The event row as the analytics layer sees it.
///
/// `total_capacity` is optional; events without a capacity (or with a
/// non-positive one) get no capacity-aware projection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct EventRecord {
    pub id: Uuid,
    pub name: String,
    pub date: NaiveDate,
    pub venue: Option<String>,
    pub total_capacity: Option<i64>,
}

impl EventRecord {
    /// Whether this event has a usable capacity ceiling for projections.
    pub fn has_capacity(&self) -> bool {
        self.total_capacity.is_some_and(|c| c > 0)
    }
}
