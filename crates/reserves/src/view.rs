//! Display-ready view of a [`ReservesState`].

use reserves_core::{UNAVAILABLE, format_money, format_report_date};

use crate::state::ReservesState;

/// Text shown while a detail lookup is in flight.
pub const LOADING_TEXT: &str = "Loading…";

/// A labelled, formatted value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ViewRow {
    /// Row label.
    pub label: &'static str,
    /// Formatted value.
    pub value: String,
}

impl ViewRow {
    fn new(label: &'static str, value: String) -> Self {
        Self { label, value }
    }
}

/// The detail panel for the current record.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DetailView {
    /// Institution name.
    pub title: String,
    /// Formatted report date.
    pub as_of: String,
    /// Balance-sheet figures.
    pub figures: Vec<ViewRow>,
    /// Derived ratios.
    pub ratios: Vec<ViewRow>,
    /// Pretty-printed record, when the raw view is on.
    pub raw_json: Option<String>,
}

impl DetailView {
    /// Builds the panel, or `None` if there is no current record.
    #[must_use]
    pub fn from_state(state: &ReservesState) -> Option<Self> {
        let record = state.record()?;
        let metrics = state.metrics().unwrap_or_default();

        Some(Self {
            title: record
                .name
                .clone()
                .unwrap_or_else(|| UNAVAILABLE.to_string()),
            as_of: format_report_date(record.report_date.as_deref()),
            figures: vec![
                ViewRow::new(
                    "CHBAL (Cash & balances due)",
                    format_money(record.cash_and_balances),
                ),
                ViewRow::new("CHFRB (Balances at Fed)", format_money(record.fed_balances)),
                ViewRow::new(
                    "LIAB (Total liabilities)",
                    format_money(record.total_liabilities),
                ),
            ],
            ratios: vec![
                ViewRow::new(
                    "Liquidity ratio (CHBAL ÷ LIAB)",
                    metrics.liquidity_ratio.to_string(),
                ),
                ViewRow::new(
                    "Fed balances ÷ liabilities (CHFRB ÷ LIAB)",
                    metrics.fed_reserves_ratio.to_string(),
                ),
            ],
            raw_json: state.show_raw().then(|| record.to_pretty_json()),
        })
    }
}

/// Labels for the current suggestion rows, in order.
#[must_use]
pub fn suggestion_labels(state: &ReservesState) -> Vec<String> {
    state.suggestions().iter().map(|i| i.label()).collect()
}
