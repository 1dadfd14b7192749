use crate::DbError;
use analytics::Projection;
use chrono::{DateTime, Utc};
use core_types::{EventRecord, PlatformRef, SaleRecord};
use platform_adapters::PlatformSaleRecord;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::postgres::PgPool;
use sqlx::FromRow;
use sqlx::Row;
use std::collections::{HashMap, HashSet};
use uuid::Uuid;

/// The `DbRepository` provides a high-level, application-specific interface
/// to the database. It encapsulates all SQL queries and data access logic.
#[derive(Debug, Clone)]
pub struct DbRepository {
    pool: PgPool,
}

/// An event together with every sale recorded against it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventWithSales {
    pub event: EventRecord,
    pub sales: Vec<SaleRecord>,
}

/// A sale row as stored, with the platform columns joined in.
#[derive(Debug, Clone, FromRow)]
struct DbSaleRow {
    id: Uuid,
    event_id: Uuid,
    quantity: i64,
    unit_price: Decimal,
    fees: Option<Decimal>,
    ticket_type: Option<String>,
    sold_at: DateTime<Utc>,
    platform_id: Option<Uuid>,
    platform_name: Option<String>,
    platform_color_hex: Option<String>,
}

impl DbSaleRow {
    fn into_sale_record(self) -> SaleRecord {
        let platform = match (self.platform_id, self.platform_name) {
            (Some(id), Some(name)) => Some(PlatformRef {
                id,
                name,
                color_hex: self.platform_color_hex,
            }),
            _ => None,
        };
        SaleRecord {
            id: self.id,
            event_id: self.event_id,
            quantity: self.quantity,
            unit_price: self.unit_price,
            // Stored rows may predate fee tracking; treat NULL as zero.
            fees: self.fees.unwrap_or(Decimal::ZERO),
            ticket_type: self.ticket_type,
            platform,
            sold_at: self.sold_at,
        }
    }
}

/// A recent sale joined with its event and platform names, ready for the
/// account overview.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct RecentSaleRow {
    pub sale_id: Uuid,
    pub event_id: Uuid,
    pub event_name: String,
    pub platform_id: Option<Uuid>,
    pub platform_name: Option<String>,
    pub ticket_type: Option<String>,
    pub quantity: i64,
    pub unit_price: Decimal,
    pub fees: Option<Decimal>,
    pub sold_at: DateTime<Utc>,
}

const SALE_COLUMNS: &str = r#"
    s.id, s.event_id, s.quantity, s.unit_price, s.fees, s.ticket_type, s.sold_at,
    p.id AS platform_id, p.name AS platform_name, p.color_hex AS platform_color_hex
"#;

impl DbRepository {
    /// Creates a new `DbRepository` with a shared database connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Fetches a single event row, failing with `NotFound` when the id does
    /// not exist. Ownership checks happen before this layer is reached.
    pub async fn get_event(&self, event_id: Uuid) -> Result<EventRecord, DbError> {
        let event = sqlx::query_as::<_, EventRecord>(
            "SELECT id, name, date, venue, total_capacity FROM events WHERE id = $1",
        )
        .bind(event_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::RowNotFound = e {
                DbError::NotFound
            } else {
                e.into()
            }
        })?;

        Ok(event)
    }

    /// Fetches all sale records for one event, platform details joined in.
    pub async fn get_sales_for_event(&self, event_id: Uuid) -> Result<Vec<SaleRecord>, DbError> {
        let rows = sqlx::query_as::<_, DbSaleRow>(&format!(
            r#"
            SELECT {SALE_COLUMNS}
            FROM sales s
            LEFT JOIN platforms p ON p.id = s.platform_id
            WHERE s.event_id = $1
            ORDER BY s.sold_at ASC
            "#,
        ))
        .bind(event_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(DbSaleRow::into_sale_record).collect())
    }

    /// Fetches every event a user owns together with its sales, in two
    /// queries rather than one per event.
    pub async fn get_events_with_sales_for_user(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<EventWithSales>, DbError> {
        let events = sqlx::query_as::<_, EventRecord>(
            "SELECT id, name, date, venue, total_capacity FROM events WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        let event_ids: Vec<Uuid> = events.iter().map(|e| e.id).collect();
        let rows = sqlx::query_as::<_, DbSaleRow>(&format!(
            r#"
            SELECT {SALE_COLUMNS}
            FROM sales s
            LEFT JOIN platforms p ON p.id = s.platform_id
            WHERE s.event_id = ANY($1)
            "#,
        ))
        .bind(&event_ids)
        .fetch_all(&self.pool)
        .await?;

        let mut sales_by_event: HashMap<Uuid, Vec<SaleRecord>> = HashMap::new();
        for row in rows {
            sales_by_event
                .entry(row.event_id)
                .or_default()
                .push(row.into_sale_record());
        }

        Ok(events
            .into_iter()
            .map(|event| {
                let sales = sales_by_event.remove(&event.id).unwrap_or_default();
                EventWithSales { event, sales }
            })
            .collect())
    }

    /// Fetches the most recent sales across all of a user's events, newest
    /// first, joined with event and platform names.
    pub async fn get_recent_sales_for_user(
        &self,
        user_id: Uuid,
        limit: i64,
    ) -> Result<Vec<RecentSaleRow>, DbError> {
        let rows = sqlx::query_as::<_, RecentSaleRow>(
            r#"
            SELECT
                s.id AS sale_id, e.id AS event_id, e.name AS event_name,
                p.id AS platform_id, p.name AS platform_name,
                s.ticket_type, s.quantity, s.unit_price, s.fees, s.sold_at
            FROM sales s
            INNER JOIN events e ON e.id = s.event_id
            LEFT JOIN platforms p ON p.id = s.platform_id
            WHERE e.user_id = $1
            ORDER BY s.sold_at DESC
            LIMIT $2
            "#,
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Resolves a platform row by its registered name.
    pub async fn get_platform_by_name(&self, name: &str) -> Result<PlatformRef, DbError> {
        let row = sqlx::query("SELECT id, name, color_hex FROM platforms WHERE name = $1")
            .bind(name)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                if let sqlx::Error::RowNotFound = e {
                    DbError::NotFound
                } else {
                    e.into()
                }
            })?;

        Ok(PlatformRef {
            id: row.get("id"),
            name: row.get("name"),
            color_hex: row.get("color_hex"),
        })
    }

    /// External sale ids already imported for an event/platform pair. Used
    /// by the sync flow to deduplicate repeated fetches.
    pub async fn get_external_sale_ids(
        &self,
        event_id: Uuid,
        platform_id: Uuid,
    ) -> Result<HashSet<String>, DbError> {
        let rows = sqlx::query(
            r#"
            SELECT external_sale_id FROM sales
            WHERE event_id = $1 AND platform_id = $2 AND external_sale_id IS NOT NULL
            "#,
        )
        .bind(event_id)
        .bind(platform_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| row.get::<String, _>("external_sale_id"))
            .collect())
    }

    /// Saves a batch of sales imported from a platform within a single
    /// transaction for atomicity. `ON CONFLICT DO NOTHING` keeps the insert
    /// idempotent across overlapping sync passes.
    pub async fn save_platform_sales(
        &self,
        event_id: Uuid,
        platform_id: Uuid,
        records: &[PlatformSaleRecord],
    ) -> Result<(), DbError> {
        let mut tx = self.pool.begin().await?;

        for record in records {
            sqlx::query(
                r#"
                INSERT INTO sales (
                    id, event_id, platform_id, external_sale_id, ticket_type,
                    quantity, unit_price, fees, buyer_email, sold_at
                ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
                ON CONFLICT (event_id, platform_id, external_sale_id) DO NOTHING
                "#,
            )
            .bind(Uuid::new_v4())
            .bind(event_id)
            .bind(platform_id)
            .bind(&record.external_id)
            .bind(&record.ticket_type)
            .bind(record.quantity)
            .bind(record.unit_price)
            .bind(record.fees)
            .bind(record.buyer_email.as_deref())
            .bind(record.sold_at)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    /// Records a computed projection as a historical row. The read path for
    /// this history lives outside the analytics flow.
    pub async fn save_projection(
        &self,
        event_id: Uuid,
        projection: &Projection,
    ) -> Result<(), DbError> {
        sqlx::query(
            r#"
            INSERT INTO projections (
                id, event_id, projected_total, projected_tickets, confidence_level, calculated_at
            ) VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(event_id)
        .bind(projection.projected_total_revenue)
        .bind(projection.projected_total_tickets)
        .bind(projection.confidence_level.as_str())
        .bind(projection.as_of)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
