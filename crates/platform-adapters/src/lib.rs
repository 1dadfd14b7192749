//! # Overzeer Platform Adapters
//!
//! This crate defines the capability interface for external ticketing
//! platforms and provides one implementing type per platform. The current
//! implementations are synthetic stand-ins that generate plausible sale
//! records; none of them speak a real platform protocol yet.
//!
//! ## Architectural Principles
//!
//! - **Layer 1 Logic:** No database or HTTP knowledge lives here. Callers
//!   hand in the event mapping and credentials and get normalized records
//!   back.
//! - **Adapter Agnostic Callers:** Through the `PlatformAdapter` trait, the
//!   sync command and any future scheduler can drive every platform the
//!   same way.
//! - **Extensibility:** Adding a platform means one new module implementing
//!   the trait plus an arm in the `create_adapter` factory.
//!
//! ## Public API
//!
//! - `PlatformAdapter`: the `{authenticate, fetch_sales, sync}` trait.
//! - `create_adapter` / `adapter_names`: the factory keyed by platform name.
//! - `PlatformSaleRecord`, `EventMapping`, `PlatformCredentials`,
//!   `SyncOutcome`: the data carried across the seam.

pub mod at_door;
pub mod error;
pub mod factory;
pub mod megatix;
mod mock;
pub mod resident_advisor;
pub mod ticketmelon;

pub use at_door::AtDoorAdapter;
pub use error::AdapterError;
pub use factory::{adapter_names, create_adapter};
pub use megatix::MegatixAdapter;
pub use resident_advisor::ResidentAdvisorAdapter;
pub use ticketmelon::TicketmelonAdapter;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use core_types::{CoreError, PlatformRef, SaleRecord};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use uuid::Uuid;

/// A single sale as reported by an external platform, before it is mapped
/// into our own records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlatformSaleRecord {
    /// The platform's own id for the sale, used for deduplication.
    pub external_id: String,
    pub ticket_type: String,
    pub quantity: i64,
    pub unit_price: Decimal,
    pub fees: Decimal,
    pub sold_at: DateTime<Utc>,
    pub buyer_email: Option<String>,
}

impl PlatformSaleRecord {
    /// Maps the platform record into a validated `SaleRecord` attributed to
    /// the given event and platform.
    pub fn into_sale_record(
        self,
        event_id: Uuid,
        platform: PlatformRef,
    ) -> Result<SaleRecord, CoreError> {
        SaleRecord::new(
            Uuid::new_v4(),
            event_id,
            self.quantity,
            self.unit_price,
            Some(self.fees),
            Some(self.ticket_type),
            Some(platform),
            self.sold_at,
        )
    }
}

/// Ties one of our events to its counterpart on an external platform.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventMapping {
    pub event_id: Uuid,
    pub platform_id: Uuid,
    pub external_event_id: String,
}

/// Platform-specific authentication material. Which fields matter depends
/// on the platform; the synthetic adapters accept anything.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlatformCredentials {
    pub api_key: Option<String>,
    pub api_secret: Option<String>,
    pub access_token: Option<String>,
}

/// The result of one sync pass against a platform.
#[derive(Debug, Clone)]
pub struct SyncOutcome {
    pub success: bool,
    /// Records not yet seen locally, ready to be persisted.
    pub imported: Vec<PlatformSaleRecord>,
    /// Records skipped because their external id was already imported.
    pub skipped: usize,
    pub errors: Vec<String>,
    pub synced_at: DateTime<Utc>,
}

impl SyncOutcome {
    fn failed(synced_at: DateTime<Utc>, message: impl Into<String>) -> Self {
        Self {
            success: false,
            imported: Vec::new(),
            skipped: 0,
            errors: vec![message.into()],
            synced_at,
        }
    }

    pub fn sales_imported(&self) -> usize {
        self.imported.len()
    }
}

/// The capability interface every ticketing platform integration implements.
///
/// The `Send + Sync` bounds allow adapters to be driven from concurrent
/// sync tasks.
#[async_trait]
pub trait PlatformAdapter: std::fmt::Debug + Send + Sync {
    /// Human-readable platform name; also the factory lookup key.
    fn name(&self) -> &'static str;

    /// Whether the platform exposes an API at all, or is a manual channel.
    fn supports_api(&self) -> bool;

    /// Verifies the supplied credentials against the platform.
    async fn authenticate(&self, credentials: &PlatformCredentials) -> Result<bool, AdapterError>;

    /// Fetches sale records for the mapped event, optionally only those
    /// after `since`. Without `since`, platforms report the last 30 days.
    async fn fetch_sales(
        &self,
        mapping: &EventMapping,
        since: Option<DateTime<Utc>>,
    ) -> Result<Vec<PlatformSaleRecord>, AdapterError>;

    /// Full sync pass: authenticate, fetch, and drop records whose external
    /// id has already been imported. Failures are reported in the outcome
    /// rather than raised, so a scheduler can sweep every platform and
    /// collect the results.
    async fn sync(
        &self,
        mapping: &EventMapping,
        credentials: &PlatformCredentials,
        existing_external_ids: &HashSet<String>,
    ) -> SyncOutcome {
        let synced_at = Utc::now();

        match self.authenticate(credentials).await {
            Ok(true) => {}
            Ok(false) => return SyncOutcome::failed(synced_at, "Authentication failed"),
            Err(e) => return SyncOutcome::failed(synced_at, e.to_string()),
        }

        match self.fetch_sales(mapping, None).await {
            Ok(records) => {
                let fetched = records.len();
                let imported: Vec<PlatformSaleRecord> = records
                    .into_iter()
                    .filter(|r| !existing_external_ids.contains(&r.external_id))
                    .collect();
                let skipped = fetched - imported.len();
                tracing::info!(
                    platform = self.name(),
                    imported = imported.len(),
                    skipped,
                    "Platform sync complete."
                );
                SyncOutcome {
                    success: true,
                    imported,
                    skipped,
                    errors: Vec::new(),
                    synced_at,
                }
            }
            Err(e) => SyncOutcome::failed(synced_at, e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn mapping() -> EventMapping {
        EventMapping {
            event_id: Uuid::from_bytes([7; 16]),
            platform_id: Uuid::from_bytes([1; 16]),
            external_event_id: "EXT-42".to_string(),
        }
    }

    #[tokio::test]
    async fn sync_skips_already_imported_external_ids() {
        let adapter = MegatixAdapter::new();
        let fetched = adapter
            .fetch_sales(&mapping(), None)
            .await
            .unwrap();
        let known: HashSet<String> = fetched.iter().take(4).map(|r| r.external_id.clone()).collect();

        let outcome = adapter
            .sync(&mapping(), &PlatformCredentials::default(), &known)
            .await;

        assert!(outcome.success);
        assert_eq!(outcome.skipped, 4);
        assert_eq!(outcome.sales_imported(), fetched.len() - 4);
        assert!(outcome.errors.is_empty());
    }

    #[tokio::test]
    async fn platform_records_convert_into_sale_records() {
        let record = PlatformSaleRecord {
            external_id: "MGX-EXT-42-1000".to_string(),
            ticket_type: "VIP".to_string(),
            quantity: 2,
            unit_price: dec!(2500),
            fees: dec!(200),
            sold_at: Utc::now(),
            buyer_email: None,
        };
        let platform = PlatformRef {
            id: Uuid::from_bytes([1; 16]),
            name: "Megatix".to_string(),
            color_hex: None,
        };

        let sale = record
            .into_sale_record(Uuid::from_bytes([7; 16]), platform)
            .unwrap();
        assert_eq!(sale.quantity, 2);
        assert_eq!(sale.gross_revenue(), dec!(5000));
        assert_eq!(sale.ticket_type.as_deref(), Some("VIP"));
        assert_eq!(sale.platform.as_ref().unwrap().name, "Megatix");
    }
}
