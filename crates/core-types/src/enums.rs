use serde::{Deserialize, Serialize};

/// The direction ticket sales are moving in, relative to the event's
/// lifetime daily average.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SalesTrend {
    Increasing,
    Decreasing,
    Stable,
}

impl SalesTrend {
    /// The lowercase label used on the wire and in stored rows.
    pub fn as_str(&self) -> &'static str {
        match self {
            SalesTrend::Increasing => "increasing",
            SalesTrend::Decreasing => "decreasing",
            SalesTrend::Stable => "stable",
        }
    }
}

/// How trustworthy a sellout projection is, driven by the share of
/// capacity already sold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfidenceLevel {
    High,
    Medium,
    Low,
}

impl ConfidenceLevel {
    /// The lowercase label used on the wire and in stored rows.
    pub fn as_str(&self) -> &'static str {
        match self {
            ConfidenceLevel::High => "high",
            ConfidenceLevel::Medium => "medium",
            ConfidenceLevel::Low => "low",
        }
    }
}
