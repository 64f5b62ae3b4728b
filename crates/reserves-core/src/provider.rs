//! Provider traits for fetching institution data.
//!
//! This module defines the core provider traits:
//!
//! - [`DataProvider`] - Base trait for all data providers
//! - [`InstitutionSearchProvider`] - Name search over insured institutions
//! - [`FinancialsProvider`] - Most recent financial filing for an institution
//! - [`BankDataProvider`] - Both of the above, as required by the controller

use async_trait::async_trait;
use std::fmt::Debug;

use crate::{
    error::Result,
    types::{CertNumber, FinancialsRecord, Institution},
};

/// Number of rows requested for name suggestions.
pub const SUGGESTION_LIMIT: usize = 8;

/// Base trait for all data providers.
pub trait DataProvider: Send + Sync + Debug {
    /// Returns the name of this provider (e.g., "FDIC BankFind").
    fn name(&self) -> &str;

    /// Returns a description of this provider.
    fn description(&self) -> &str;
}

/// Provider for institution name search.
#[async_trait]
pub trait InstitutionSearchProvider: DataProvider {
    /// Searches institutions whose name matches `fragment`.
    ///
    /// # Arguments
    ///
    /// * `fragment` - Free text; providers are responsible for escaping it
    /// * `limit` - Maximum number of rows to return
    async fn search_institutions(&self, fragment: &str, limit: usize) -> Result<Vec<Institution>>;
}

/// Provider for reported financials.
#[async_trait]
pub trait FinancialsProvider: DataProvider {
    /// Fetches the most recent financial filing for an institution.
    ///
    /// Returns `Ok(None)` when the institution has no filings.
    async fn latest_financials(&self, cert: CertNumber) -> Result<Option<FinancialsRecord>>;
}

/// A provider that can both search institutions and fetch their financials.
pub trait BankDataProvider: InstitutionSearchProvider + FinancialsProvider {}

impl<T> BankDataProvider for T where T: InstitutionSearchProvider + FinancialsProvider {}
