//! Ratios derived from a [`FinancialsRecord`].
//!
//! Both ratios are expressed against total liabilities and are only defined when
//! numerator and denominator are present and strictly positive.

use std::fmt;

use crate::format::{UNAVAILABLE, format_percent};
use crate::types::FinancialsRecord;

/// A ratio that may be unavailable for lack of data.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum DerivedRatio {
    /// A strictly positive, finite ratio.
    Available(f64),
    /// One of the inputs was missing, zero or negative.
    #[default]
    Unavailable,
}

impl DerivedRatio {
    /// Divides `numerator` by `denominator` when both are finite and strictly positive.
    #[must_use]
    pub fn between(numerator: Option<f64>, denominator: Option<f64>) -> Self {
        match (numerator, denominator) {
            (Some(n), Some(d)) if n.is_finite() && d.is_finite() && n > 0.0 && d > 0.0 => {
                Self::Available(n / d)
            }
            _ => Self::Unavailable,
        }
    }

    /// Returns the ratio if available.
    #[must_use]
    pub const fn value(self) -> Option<f64> {
        match self {
            Self::Available(v) => Some(v),
            Self::Unavailable => None,
        }
    }

    /// Returns true if the ratio could be computed.
    #[must_use]
    pub const fn is_available(self) -> bool {
        matches!(self, Self::Available(_))
    }
}

impl fmt::Display for DerivedRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Available(v) => f.write_str(&format_percent(*v)),
            Self::Unavailable => f.write_str(UNAVAILABLE),
        }
    }
}

/// Liquidity ratios for a single filing.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct LiquidityMetrics {
    /// Cash and balances due divided by total liabilities.
    pub liquidity_ratio: DerivedRatio,
    /// Federal Reserve balances divided by total liabilities.
    pub fed_reserves_ratio: DerivedRatio,
}

impl LiquidityMetrics {
    /// Computes both ratios from a record.
    #[must_use]
    pub fn from_record(record: &FinancialsRecord) -> Self {
        Self {
            liquidity_ratio: DerivedRatio::between(
                record.cash_and_balances,
                record.total_liabilities,
            ),
            fed_reserves_ratio: DerivedRatio::between(record.fed_balances, record.total_liabilities),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ratio_is_quotient_when_positive() {
        let ratio = DerivedRatio::between(Some(250.0), Some(1000.0));
        assert_eq!(ratio, DerivedRatio::Available(0.25));
        assert_eq!(ratio.value(), Some(0.25));
        assert_eq!(ratio.to_string(), "25.00%");
    }

    #[test]
    fn test_ratio_unavailable_cases() {
        for (n, d) in [
            (None, Some(1.0)),
            (Some(1.0), None),
            (Some(0.0), Some(1.0)),
            (Some(1.0), Some(0.0)),
            (Some(-5.0), Some(10.0)),
            (Some(5.0), Some(-10.0)),
            (Some(f64::NAN), Some(10.0)),
            (Some(5.0), Some(f64::INFINITY)),
        ] {
            let ratio = DerivedRatio::between(n, d);
            assert!(!ratio.is_available(), "{n:?} / {d:?} should be unavailable");
            assert_eq!(ratio.to_string(), UNAVAILABLE);
        }
    }

    #[test]
    fn test_metrics_from_record() {
        let record = FinancialsRecord::new()
            .with_cash_and_balances(1_500.0)
            .with_fed_balances(300.0)
            .with_total_liabilities(10_000.0);
        let metrics = LiquidityMetrics::from_record(&record);

        assert_eq!(metrics.liquidity_ratio.value(), Some(0.15));
        assert_eq!(metrics.fed_reserves_ratio.value(), Some(0.03));
        assert_eq!(metrics.liquidity_ratio.to_string(), "15.00%");
        assert_eq!(metrics.fed_reserves_ratio.to_string(), "3.00%");
    }

    #[test]
    fn test_metrics_without_liabilities() {
        let record = FinancialsRecord::new()
            .with_cash_and_balances(1_500.0)
            .with_fed_balances(300.0);
        let metrics = LiquidityMetrics::from_record(&record);

        assert_eq!(metrics, LiquidityMetrics::default());
    }
}
