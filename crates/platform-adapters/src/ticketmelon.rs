use crate::error::AdapterError;
use crate::mock::{MockFeed, TicketTier};
use crate::{EventMapping, PlatformAdapter, PlatformCredentials, PlatformSaleRecord};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal_macros::dec;

const FEED: MockFeed = MockFeed {
    id_prefix: "TM",
    id_base: 2000,
    tiers: &[
        TicketTier { name: "General Admission", unit_price: dec!(1200), fees: dec!(120) },
        TicketTier { name: "Premium", unit_price: dec!(2200), fees: dec!(220) },
        TicketTier { name: "Meet & Greet", unit_price: dec!(3000), fees: dec!(300) },
    ],
    record_count: 12,
    hours_between_sales: 60,
    quantity_cycle: 4,
    buyer_domain: Some("email.com"),
};

/// Ticketmelon integration. Synthetic feed until the real API hookup lands.
#[derive(Debug, Default)]
pub struct TicketmelonAdapter {}

impl TicketmelonAdapter {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PlatformAdapter for TicketmelonAdapter {
    fn name(&self) -> &'static str {
        "Ticketmelon"
    }

    fn supports_api(&self) -> bool {
        true
    }

    async fn authenticate(&self, _credentials: &PlatformCredentials) -> Result<bool, AdapterError> {
        Ok(true)
    }

    async fn fetch_sales(
        &self,
        mapping: &EventMapping,
        since: Option<DateTime<Utc>>,
    ) -> Result<Vec<PlatformSaleRecord>, AdapterError> {
        Ok(FEED.generate(mapping, since))
    }
}
