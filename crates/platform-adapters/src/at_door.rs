use crate::error::AdapterError;
use crate::mock::{MockFeed, TicketTier};
use crate::{EventMapping, PlatformAdapter, PlatformCredentials, PlatformSaleRecord};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal_macros::dec;

const FEED: MockFeed = MockFeed {
    id_prefix: "DOOR",
    id_base: 4000,
    tiers: &[
        TicketTier { name: "Walk-in", unit_price: dec!(1000), fees: dec!(0) },
        TicketTier { name: "Guest List", unit_price: dec!(0), fees: dec!(0) },
    ],
    record_count: 8,
    hours_between_sales: 84,
    quantity_cycle: 1,
    buyer_domain: None,
};

/// Door sales entered by staff. No API behind this one; the feed mirrors
/// what the manual entry flow produces.
#[derive(Debug, Default)]
pub struct AtDoorAdapter {}

impl AtDoorAdapter {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PlatformAdapter for AtDoorAdapter {
    fn name(&self) -> &'static str {
        "At Door"
    }

    fn supports_api(&self) -> bool {
        false
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
