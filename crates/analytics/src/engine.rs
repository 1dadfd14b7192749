use crate::report::{
    DailySales, PlatformRevenue, Projection, RevenueBreakdown, SalesVelocity, TicketTypeRevenue,
};
use chrono::{DateTime, Duration, NaiveDate, Utc};
use core_types::{ConfidenceLevel, EventRecord, SaleRecord, SalesTrend};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::collections::{BTreeMap, HashMap};
use uuid::Uuid;

/// Group label for sales with no platform or a blank ticket type.
const UNKNOWN: &str = "Unknown";

/// Recent sales must outpace the lifetime daily average by this factor
/// before the trend flips to increasing.
const TREND_UPPER_FACTOR: Decimal = dec!(1.1);
/// Below this factor of the lifetime daily average the trend is decreasing.
const TREND_LOWER_FACTOR: Decimal = dec!(0.9);

/// Above this share of capacity sold, a projection is high confidence.
const HIGH_CONFIDENCE_PCT: Decimal = dec!(70);
/// At or above this share (and up to the high bound) it is medium.
const MEDIUM_CONFIDENCE_PCT: Decimal = dec!(30);

const DAYS_PER_WEEK: Decimal = dec!(7);
const MS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

/// A stateless calculator deriving revenue, velocity, and projection
/// metrics from an event's sale records.
///
/// Every method is a pure fold over an immutable input slice; there is no
/// cached state, and all divisions are guarded, so none of them can fail.
#[derive(Debug, Clone, Default)]
pub struct AnalyticsEngine {}

impl AnalyticsEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Folds sale records into total, per-platform, and per-ticket-type
    /// revenue breakdowns.
    ///
    /// Platform groups are keyed by platform id; records without a platform
    /// share one synthetic "Unknown" group. Ticket types group by exact
    /// string after blank/absent values normalize to "Unknown". Both group
    /// lists come back sorted by revenue descending; the sort is stable, so
    /// ties stay in first-seen order.
    pub fn revenue_breakdown(&self, records: &[SaleRecord]) -> RevenueBreakdown {
        let mut report = RevenueBreakdown::new();
        let mut platform_slots: HashMap<Option<Uuid>, usize> = HashMap::new();
        let mut ticket_type_slots: HashMap<String, usize> = HashMap::new();

        for record in records {
            let revenue = record.gross_revenue();
            report.total_revenue += revenue;
            report.total_fees += record.fees;

            let platform_key = record.platform.as_ref().map(|p| p.id);
            let slot = *platform_slots.entry(platform_key).or_insert_with(|| {
                report.by_platform.push(PlatformRevenue {
                    platform_id: platform_key,
                    platform_name: record
                        .platform
                        .as_ref()
                        .map(|p| p.name.clone())
                        .unwrap_or_else(|| UNKNOWN.to_string()),
                    color_hex: record.platform.as_ref().and_then(|p| p.color_hex.clone()),
                    revenue: Decimal::ZERO,
                    fees: Decimal::ZERO,
                    net_revenue: Decimal::ZERO,
                    tickets_sold: 0,
                });
                report.by_platform.len() - 1
            });
            let platform_group = &mut report.by_platform[slot];
            platform_group.revenue += revenue;
            platform_group.fees += record.fees;
            platform_group.tickets_sold += record.quantity;

            let ticket_type = normalize_ticket_type(record.ticket_type.as_deref());
            let slot = *ticket_type_slots
                .entry(ticket_type.clone())
                .or_insert_with(|| {
                    report.by_ticket_type.push(TicketTypeRevenue {
                        ticket_type,
                        revenue: Decimal::ZERO,
                        tickets_sold: 0,
                        avg_price: Decimal::ZERO,
                    });
                    report.by_ticket_type.len() - 1
                });
            let ticket_group = &mut report.by_ticket_type[slot];
            ticket_group.revenue += revenue;
            ticket_group.tickets_sold += record.quantity;
        }

        // Net figures are recomputed from the accumulated totals rather than
        // accumulated per record, so they stay exactly revenue - fees.
        report.net_revenue = report.total_revenue - report.total_fees;
        for group in &mut report.by_platform {
            group.net_revenue = group.revenue - group.fees;
        }
        for group in &mut report.by_ticket_type {
            if group.tickets_sold > 0 {
                group.avg_price = group.revenue / Decimal::from(group.tickets_sold);
            }
        }

        report.by_platform.sort_by(|a, b| b.revenue.cmp(&a.revenue));
        report.by_ticket_type.sort_by(|a, b| b.revenue.cmp(&a.revenue));

        report
    }

    /// Buckets sale records by UTC calendar day and derives running
    /// averages plus a trend signal.
    ///
    /// The trend compares the last seven days' rate against the lifetime
    /// daily average: more than 10% above is increasing, more than 10%
    /// below is decreasing. The recent rate always divides by a full seven
    /// days, even for events younger than a week.
    pub fn sales_velocity(&self, records: &[SaleRecord], now: DateTime<Utc>) -> SalesVelocity {
        let mut report = SalesVelocity::new();
        let Some(first) = records.first() else {
            return report;
        };

        let mut by_day: BTreeMap<NaiveDate, (i64, Decimal)> = BTreeMap::new();
        let mut earliest = first.sold_at;
        for record in records {
            report.total_tickets_sold += record.quantity;
            if record.sold_at < earliest {
                earliest = record.sold_at;
            }
            let bucket = by_day
                .entry(record.sold_at.date_naive())
                .or_insert((0, Decimal::ZERO));
            bucket.0 += record.quantity;
            bucket.1 += record.gross_revenue();
        }
        report.by_day = by_day
            .into_iter()
            .map(|(date, (tickets_sold, revenue))| DailySales {
                date,
                tickets_sold,
                revenue,
            })
            .collect();

        let days_since_first_sale = days_since(earliest, now);
        report.daily_average =
            Decimal::from(report.total_tickets_sold) / Decimal::from(days_since_first_sale);
        report.weekly_average = report.daily_average * DAYS_PER_WEEK;

        let window_start = now - Duration::days(7);
        let last_7_days_tickets: i64 = records
            .iter()
            .filter(|r| r.sold_at >= window_start)
            .map(|r| r.quantity)
            .sum();
        let last_7_days_average = Decimal::from(last_7_days_tickets) / DAYS_PER_WEEK;

        report.trend = if report.daily_average > Decimal::ZERO {
            if last_7_days_average > report.daily_average * TREND_UPPER_FACTOR {
                SalesTrend::Increasing
            } else if last_7_days_average < report.daily_average * TREND_LOWER_FACTOR {
                SalesTrend::Decreasing
            } else {
                SalesTrend::Stable
            }
        } else {
            SalesTrend::Stable
        };

        report
    }

    /// Extrapolates final tickets and revenue from the current pace,
    /// capped by event capacity.
    ///
    /// `velocity` and `revenue` must have been computed from the same
    /// record set and the same `now` snapshot as passed here.
    pub fn projection(
        &self,
        event: &EventRecord,
        velocity: &SalesVelocity,
        revenue: &RevenueBreakdown,
        now: DateTime<Utc>,
    ) -> Projection {
        let sold = velocity.total_tickets_sold;
        let avg_price = if sold > 0 {
            revenue.total_revenue / Decimal::from(sold)
        } else {
            Decimal::ZERO
        };

        let Some(capacity) = event.total_capacity.filter(|c| *c > 0) else {
            // No capacity ceiling: report current actuals as the projection.
            return Projection {
                projected_total_revenue: revenue.total_revenue,
                projected_total_tickets: sold,
                percentage_sold: None,
                days_until_sellout: None,
                confidence_level: ConfidenceLevel::Low,
                as_of: now,
            };
        };

        let projected_total_revenue = if avg_price > Decimal::ZERO {
            avg_price * Decimal::from(capacity)
        } else {
            revenue.total_revenue
        };

        let percentage_sold = Decimal::from(sold) / Decimal::from(capacity) * Decimal::ONE_HUNDRED;
        let remaining_tickets = (capacity - sold).max(0);
        let days_until_sellout = if velocity.daily_average > Decimal::ZERO {
            Some(Decimal::from(remaining_tickets) / velocity.daily_average)
        } else {
            None
        };

        let confidence_level = if percentage_sold > HIGH_CONFIDENCE_PCT {
            ConfidenceLevel::High
        } else if percentage_sold >= MEDIUM_CONFIDENCE_PCT {
            ConfidenceLevel::Medium
        } else {
            ConfidenceLevel::Low
        };

        Projection {
            projected_total_revenue,
            projected_total_tickets: capacity,
            percentage_sold: Some(percentage_sold),
            days_until_sellout,
            confidence_level,
            as_of: now,
        }
    }
}

/// Blank or absent ticket types collapse into the "Unknown" group;
/// everything else groups by the exact string, case preserved.
fn normalize_ticket_type(ticket_type: Option<&str>) -> String {
    match ticket_type {
        Some(t) if !t.trim().is_empty() => t.to_string(),
        _ => UNKNOWN.to_string(),
    }
}

/// Whole days elapsed since the first sale, rounded up, never below one.
fn days_since(first: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    let elapsed_ms = (now - first).num_milliseconds();
    let days =
        elapsed_ms.div_euclid(MS_PER_DAY) + i64::from(elapsed_ms.rem_euclid(MS_PER_DAY) > 0);
    days.max(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use core_types::PlatformRef;

    fn ts(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
    }

    fn platform(id_byte: u8, name: &str) -> PlatformRef {
        PlatformRef {
            id: Uuid::from_bytes([id_byte; 16]),
            name: name.to_string(),
            color_hex: Some(format!("#0000{:02x}", id_byte)),
        }
    }

    fn sale(
        quantity: i64,
        unit_price: Decimal,
        fees: Decimal,
        ticket_type: Option<&str>,
        platform: Option<PlatformRef>,
        sold_at: DateTime<Utc>,
    ) -> SaleRecord {
        SaleRecord {
            id: Uuid::new_v4(),
            event_id: Uuid::from_bytes([9; 16]),
            quantity,
            unit_price,
            fees,
            ticket_type: ticket_type.map(str::to_string),
            platform,
            sold_at,
        }
    }

    fn event(capacity: Option<i64>) -> EventRecord {
        EventRecord {
            id: Uuid::from_bytes([9; 16]),
            name: "Warehouse Night".to_string(),
            date: NaiveDate::from_ymd_opt(2025, 7, 1).unwrap(),
            venue: Some("The Depot".to_string()),
            total_capacity: capacity,
        }
    }

    /// The three-record scenario: two platforms, two ticket types, two days.
    fn scenario_records() -> Vec<SaleRecord> {
        let a = platform(1, "Megatix");
        let b = platform(2, "Ticketmelon");
        vec![
            sale(2, dec!(100), dec!(10), Some("VIP"), Some(a.clone()), ts(2025, 6, 1, 12)),
            sale(1, dec!(50), dec!(0), Some("GA"), Some(b), ts(2025, 6, 1, 15)),
            sale(3, dec!(80), dec!(5), Some("GA"), Some(a), ts(2025, 6, 3, 9)),
        ]
    }

    #[test]
    fn empty_input_yields_zeroed_reports() {
        let engine = AnalyticsEngine::new();
        let now = ts(2025, 6, 10, 0);

        let revenue = engine.revenue_breakdown(&[]);
        assert_eq!(revenue.total_revenue, Decimal::ZERO);
        assert_eq!(revenue.total_fees, Decimal::ZERO);
        assert_eq!(revenue.net_revenue, Decimal::ZERO);
        assert!(revenue.by_platform.is_empty());
        assert!(revenue.by_ticket_type.is_empty());

        let velocity = engine.sales_velocity(&[], now);
        assert_eq!(velocity.total_tickets_sold, 0);
        assert_eq!(velocity.daily_average, Decimal::ZERO);
        assert_eq!(velocity.trend, SalesTrend::Stable);
        assert!(velocity.by_day.is_empty());

        let projection = engine.projection(&event(None), &velocity, &revenue, now);
        assert_eq!(projection.projected_total_tickets, 0);
        assert_eq!(projection.projected_total_revenue, Decimal::ZERO);
        assert_eq!(projection.percentage_sold, None);
        assert_eq!(projection.confidence_level, ConfidenceLevel::Low);
    }

    #[test]
    fn revenue_breakdown_matches_scenario() {
        let engine = AnalyticsEngine::new();
        let report = engine.revenue_breakdown(&scenario_records());

        assert_eq!(report.total_revenue, dec!(490));
        assert_eq!(report.total_fees, dec!(15));
        assert_eq!(report.net_revenue, dec!(475));

        assert_eq!(report.by_platform.len(), 2);
        let megatix = &report.by_platform[0];
        assert_eq!(megatix.platform_name, "Megatix");
        assert_eq!(megatix.revenue, dec!(440));
        assert_eq!(megatix.fees, dec!(15));
        assert_eq!(megatix.net_revenue, dec!(425));
        assert_eq!(megatix.tickets_sold, 5);
        let ticketmelon = &report.by_platform[1];
        assert_eq!(ticketmelon.revenue, dec!(50));
        assert_eq!(ticketmelon.tickets_sold, 1);

        assert_eq!(report.by_ticket_type.len(), 2);
        let ga = &report.by_ticket_type[0];
        assert_eq!(ga.ticket_type, "GA");
        assert_eq!(ga.revenue, dec!(290));
        assert_eq!(ga.tickets_sold, 4);
        assert_eq!(ga.avg_price, dec!(72.5));
        let vip = &report.by_ticket_type[1];
        assert_eq!(vip.ticket_type, "VIP");
        assert_eq!(vip.avg_price, dec!(100));
    }

    #[test]
    fn group_revenues_sum_to_totals() {
        let engine = AnalyticsEngine::new();
        let report = engine.revenue_breakdown(&scenario_records());

        let platform_sum: Decimal = report.by_platform.iter().map(|g| g.revenue).sum();
        let ticket_type_sum: Decimal = report.by_ticket_type.iter().map(|g| g.revenue).sum();
        assert_eq!(platform_sum, report.total_revenue);
        assert_eq!(ticket_type_sum, report.total_revenue);

        for group in &report.by_platform {
            assert_eq!(group.net_revenue, group.revenue - group.fees);
        }
    }

    #[test]
    fn aggregation_is_idempotent() {
        let engine = AnalyticsEngine::new();
        let records = scenario_records();
        assert_eq!(
            engine.revenue_breakdown(&records),
            engine.revenue_breakdown(&records)
        );
    }

    #[test]
    fn manual_sales_and_blank_types_group_under_unknown() {
        let engine = AnalyticsEngine::new();
        let records = vec![
            sale(1, dec!(20), dec!(0), None, None, ts(2025, 6, 1, 10)),
            sale(2, dec!(20), dec!(2), Some("  "), None, ts(2025, 6, 2, 10)),
        ];
        let report = engine.revenue_breakdown(&records);

        assert_eq!(report.by_platform.len(), 1);
        assert_eq!(report.by_platform[0].platform_id, None);
        assert_eq!(report.by_platform[0].platform_name, "Unknown");
        assert_eq!(report.by_platform[0].tickets_sold, 3);

        assert_eq!(report.by_ticket_type.len(), 1);
        assert_eq!(report.by_ticket_type[0].ticket_type, "Unknown");
    }

    #[test]
    fn velocity_buckets_by_utc_day() {
        let engine = AnalyticsEngine::new();
        let velocity = engine.sales_velocity(&scenario_records(), ts(2025, 6, 10, 0));

        assert_eq!(velocity.total_tickets_sold, 6);
        assert_eq!(velocity.by_day.len(), 2);
        assert_eq!(velocity.by_day[0].date, NaiveDate::from_ymd_opt(2025, 6, 1).unwrap());
        assert_eq!(velocity.by_day[0].tickets_sold, 3);
        assert_eq!(velocity.by_day[0].revenue, dec!(250));
        assert_eq!(velocity.by_day[1].date, NaiveDate::from_ymd_opt(2025, 6, 3).unwrap());
        assert_eq!(velocity.by_day[1].tickets_sold, 3);
        assert_eq!(velocity.by_day[1].revenue, dec!(240));
    }

    /// Lifetime average of 10/day; only the recent window varies.
    fn trend_records(recent_quantity: i64) -> Vec<SaleRecord> {
        let older = 100 - recent_quantity;
        vec![
            sale(older, dec!(10), dec!(0), None, None, ts(2025, 6, 1, 0)),
            sale(recent_quantity, dec!(10), dec!(0), None, None, ts(2025, 6, 8, 0)),
        ]
    }

    #[test]
    fn trend_flips_at_ten_percent_bands() {
        let engine = AnalyticsEngine::new();
        let now = ts(2025, 6, 11, 0);

        // 78/7 ≈ 11.14 > 10 * 1.1
        let velocity = engine.sales_velocity(&trend_records(78), now);
        assert_eq!(velocity.daily_average, dec!(10));
        assert_eq!(velocity.trend, SalesTrend::Increasing);

        // 62/7 ≈ 8.86 < 10 * 0.9
        let velocity = engine.sales_velocity(&trend_records(62), now);
        assert_eq!(velocity.trend, SalesTrend::Decreasing);

        // 70/7 = 10, inside the band
        let velocity = engine.sales_velocity(&trend_records(70), now);
        assert_eq!(velocity.trend, SalesTrend::Stable);
        assert_eq!(velocity.weekly_average, dec!(70));
    }

    #[test]
    fn recent_window_always_divides_by_seven() {
        let engine = AnalyticsEngine::new();
        // Three-day-old event selling 10/day: the recent rate is 30/7,
        // which understates the pace and reads as decreasing.
        let records = vec![
            sale(10, dec!(10), dec!(0), None, None, ts(2025, 6, 8, 0)),
            sale(10, dec!(10), dec!(0), None, None, ts(2025, 6, 9, 0)),
            sale(10, dec!(10), dec!(0), None, None, ts(2025, 6, 10, 0)),
        ];
        let velocity = engine.sales_velocity(&records, ts(2025, 6, 11, 0));
        assert_eq!(velocity.daily_average, dec!(10));
        assert_eq!(velocity.trend, SalesTrend::Decreasing);
    }

    #[test]
    fn first_sale_day_counts_as_one_full_day() {
        let engine = AnalyticsEngine::new();
        let records = vec![sale(5, dec!(10), dec!(0), None, None, ts(2025, 6, 10, 23))];
        // One hour after the only sale: elapsed rounds up to a single day.
        let velocity = engine.sales_velocity(&records, ts(2025, 6, 11, 0));
        assert_eq!(velocity.daily_average, dec!(5));
    }

    #[test]
    fn projection_without_capacity_reports_actuals() {
        let engine = AnalyticsEngine::new();
        let now = ts(2025, 6, 10, 0);
        let records = vec![sale(50, dec!(10), dec!(0), None, None, ts(2025, 6, 1, 0))];
        let revenue = engine.revenue_breakdown(&records);
        let velocity = engine.sales_velocity(&records, now);

        let projection = engine.projection(&event(None), &velocity, &revenue, now);
        assert_eq!(projection.projected_total_revenue, dec!(500));
        assert_eq!(projection.projected_total_tickets, 50);
        assert_eq!(projection.percentage_sold, None);
        assert_eq!(projection.days_until_sellout, None);
        assert_eq!(projection.confidence_level, ConfidenceLevel::Low);
        assert_eq!(projection.as_of, now);
    }

    #[test]
    fn projection_with_capacity_extrapolates_at_average_price() {
        let engine = AnalyticsEngine::new();
        let now = ts(2025, 6, 11, 0);
        // 40 tickets over 10 days at 100 each.
        let records = vec![sale(40, dec!(100), dec!(0), None, None, ts(2025, 6, 1, 0))];
        let revenue = engine.revenue_breakdown(&records);
        let velocity = engine.sales_velocity(&records, now);

        let projection = engine.projection(&event(Some(100)), &velocity, &revenue, now);
        assert_eq!(projection.projected_total_tickets, 100);
        assert_eq!(projection.projected_total_revenue, dec!(10000));
        assert_eq!(projection.percentage_sold, Some(dec!(40)));
        assert_eq!(projection.confidence_level, ConfidenceLevel::Medium);
        // 60 remaining at 4/day
        assert_eq!(projection.days_until_sellout, Some(dec!(15)));
    }

    #[test]
    fn confidence_tracks_percentage_sold() {
        let engine = AnalyticsEngine::new();
        let now = ts(2025, 6, 11, 0);

        let cases = [
            (71, ConfidenceLevel::High),
            (70, ConfidenceLevel::Medium),
            (30, ConfidenceLevel::Medium),
            (29, ConfidenceLevel::Low),
        ];
        for (sold, expected) in cases {
            let records = vec![sale(sold, dec!(10), dec!(0), None, None, ts(2025, 6, 1, 0))];
            let revenue = engine.revenue_breakdown(&records);
            let velocity = engine.sales_velocity(&records, now);
            let projection = engine.projection(&event(Some(100)), &velocity, &revenue, now);
            assert_eq!(projection.confidence_level, expected, "sold {}", sold);
        }
    }

    #[test]
    fn oversold_events_clamp_remaining_to_zero() {
        let engine = AnalyticsEngine::new();
        let now = ts(2025, 6, 11, 0);
        let records = vec![sale(120, dec!(10), dec!(0), None, None, ts(2025, 6, 1, 0))];
        let revenue = engine.revenue_breakdown(&records);
        let velocity = engine.sales_velocity(&records, now);

        let projection = engine.projection(&event(Some(100)), &velocity, &revenue, now);
        assert_eq!(projection.days_until_sellout, Some(Decimal::ZERO));
        assert_eq!(projection.percentage_sold, Some(dec!(120)));
        assert_eq!(projection.confidence_level, ConfidenceLevel::High);
    }

    #[test]
    fn reports_serialize_for_the_presentation_layer() {
        let engine = AnalyticsEngine::new();
        let now = ts(2025, 6, 10, 0);
        let records = scenario_records();
        let velocity = engine.sales_velocity(&records, now);
        let projection = engine.projection(
            &event(Some(100)),
            &velocity,
            &engine.revenue_breakdown(&records),
            now,
        );

        let velocity_json = serde_json::to_value(&velocity).unwrap();
        assert_eq!(velocity_json["by_day"][0]["date"], "2025-06-01");
        assert_eq!(velocity_json["trend"], "decreasing");

        let projection_json = serde_json::to_value(&projection).unwrap();
        assert_eq!(projection_json["confidence_level"], "low");
        assert_eq!(projection_json["as_of"], "2025-06-10T00:00:00Z");
    }
}
