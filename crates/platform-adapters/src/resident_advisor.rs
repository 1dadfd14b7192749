use crate::error::AdapterError;
use crate::mock::{MockFeed, TicketTier};
use crate::{EventMapping, PlatformAdapter, PlatformCredentials, PlatformSaleRecord};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal_macros::dec;

const FEED: MockFeed = MockFeed {
    id_prefix: "RA",
    id_base: 3000,
    tiers: &[
        TicketTier { name: "First Release", unit_price: dec!(25), fees: dec!(3) },
        TicketTier { name: "Second Release", unit_price: dec!(40), fees: dec!(5) },
        TicketTier { name: "Door", unit_price: dec!(60), fees: dec!(8) },
    ],
    record_count: 15,
    hours_between_sales: 48,
    quantity_cycle: 2,
    buyer_domain: Some("domain.com"),
};

/// Resident Advisor integration. Synthetic feed until the real API hookup
/// lands.
#[derive(Debug, Default)]
pub struct ResidentAdvisorAdapter {}

impl ResidentAdvisorAdapter {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PlatformAdapter for ResidentAdvisorAdapter {
    fn name(&self) -> &'static str {
        "Resident Advisor"
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
