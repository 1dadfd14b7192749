//! # Overzeer Analytics Engine
//!
//! This crate turns an event's raw sale records into derived metrics. It is
//! the only part of the system with non-trivial computation; everything
//! around it is storage access and presentation.
//!
//! ## Architectural Principles
//!
//! - **Layer 1 Logic:** This is a pure logic crate. It has no knowledge of
//!   external systems. It depends only on `core-types` (Layer 0).
//! - **Stateless Calculation:** The `AnalyticsEngine` is a stateless
//!   calculator. Every report is computed fresh from the full record set,
//!   which makes it highly reliable and easy to test.
//! - **Total Functions:** Empty record sets, missing capacity, and zero
//!   durations all fall back to explicit zero/None values. Nothing here
//!   returns an error.
//!
//! ## Public API
//!
//! - `AnalyticsEngine`: the calculator with the three report methods.
//! - `RevenueBreakdown`, `SalesVelocity`, `Projection`: the report structs
//!   handed to the presentation layer.

// Declare the modules that constitute this crate.
pub mod engine;
pub mod report;

// Re-export the key components to create a clean, public-facing API.
pub use engine::AnalyticsEngine;
pub use report::{
    DailySales, PlatformRevenue, Projection, RevenueBreakdown, SalesVelocity, TicketTypeRevenue,
};
