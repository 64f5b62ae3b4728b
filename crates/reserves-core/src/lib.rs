#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/reserves/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Core traits and types for bank reserve lookups.
//!
//! This crate provides the foundational abstractions:
//!
//! - [`InstitutionSearchProvider`](provider::InstitutionSearchProvider) - Name search over institutions
//! - [`FinancialsProvider`](provider::FinancialsProvider) - Most recent reported financials
//! - [`LiquidityMetrics`](metrics::LiquidityMetrics) - Ratios derived from a financials record
//! - [`format`] - Display helpers shared by every rendering surface

/// Error types for data operations.
pub mod error;
/// Display formatting for money, ratios and report dates.
pub mod format;
/// Ratios derived from a financials record.
pub mod metrics;
/// Provider traits for fetching institution data.
pub mod provider;
/// Core data types (Institution, FinancialsRecord, etc.).
pub mod types;

// Re-export commonly used items at crate root
pub use error::{ReservesError, Result};
pub use format::{UNAVAILABLE, format_money, format_percent, format_report_date};
pub use metrics::{DerivedRatio, LiquidityMetrics};
pub use provider::{
    BankDataProvider, DataProvider, FinancialsProvider, InstitutionSearchProvider, SUGGESTION_LIMIT,
};
pub use types::{CertNumber, FinancialsRecord, Institution};
