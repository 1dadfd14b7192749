use crate::{EventMapping, PlatformSaleRecord};
use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;

/// One purchasable ticket tier on a platform.
pub(crate) struct TicketTier {
    pub name: &'static str,
    pub unit_price: Decimal,
    pub fees: Decimal,
}

/// Shape of a platform's synthetic sales feed.
///
/// Each platform cycles through its tiers, stepping `hours_between_sales`
/// further into the past per record (wrapping at 30 days), so repeated
/// fetches for the same mapping are deterministic apart from the clock.
pub(crate) struct MockFeed {
    pub id_prefix: &'static str,
    pub id_base: u32,
    pub tiers: &'static [TicketTier],
    pub record_count: u32,
    pub hours_between_sales: i64,
    pub quantity_cycle: i64,
    pub buyer_domain: Option<&'static str>,
}

const LOOKBACK_DAYS: i64 = 30;

impl MockFeed {
    pub(crate) fn generate(
        &self,
        mapping: &EventMapping,
        since: Option<DateTime<Utc>>,
    ) -> Vec<PlatformSaleRecord> {
        let now = Utc::now();
        let cutoff = since.unwrap_or(now - Duration::days(LOOKBACK_DAYS));

        let mut records = Vec::new();
        for i in 0..self.record_count {
            let tier = &self.tiers[i as usize % self.tiers.len()];
            let hours_ago = (i64::from(i) * self.hours_between_sales) % (LOOKBACK_DAYS * 24);
            let sold_at = now - Duration::hours(hours_ago);
            if sold_at < cutoff {
                continue;
            }
            records.push(PlatformSaleRecord {
                external_id: format!(
                    "{}-{}-{}",
                    self.id_prefix,
                    mapping.external_event_id,
                    self.id_base + i
                ),
                ticket_type: tier.name.to_string(),
                quantity: 1 + (i64::from(i) % self.quantity_cycle),
                unit_price: tier.unit_price,
                fees: tier.fees,
                sold_at,
                buyer_email: self
                    .buyer_domain
                    .map(|domain| format!("buyer{}@{}", i, domain)),
            });
        }
        records
    }
}
