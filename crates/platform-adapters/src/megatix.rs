use crate::error::AdapterError;
use crate::mock::{MockFeed, TicketTier};
use crate::{EventMapping, PlatformAdapter, PlatformCredentials, PlatformSaleRecord};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal_macros::dec;

const FEED: MockFeed = MockFeed {
    id_prefix: "MGX",
    id_base: 1000,
    tiers: &[
        TicketTier { name: "Standard", unit_price: dec!(800), fees: dec!(80) },
        TicketTier { name: "VIP", unit_price: dec!(2500), fees: dec!(200) },
        TicketTier { name: "Early Bird", unit_price: dec!(500), fees: dec!(50) },
    ],
    record_count: 10,
    hours_between_sales: 72,
    quantity_cycle: 3,
    buyer_domain: Some("example.com"),
};

/// Megatix integration. Synthetic feed until the real API hookup lands.
#[derive(Debug, Default)]
pub struct MegatixAdapter {}

impl MegatixAdapter {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PlatformAdapter for MegatixAdapter {
    fn name(&self) -> &'static str {
        "Megatix"
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
