//! Lookup state owned by [`ReservesController`](crate::ReservesController).

use reserves_core::{FinancialsRecord, Institution, LiquidityMetrics};

/// Minimum trimmed query length, in characters, before suggestions are fetched.
pub const MIN_QUERY_CHARS: usize = 2;

/// Everything a rendering surface needs to draw the lookup.
///
/// At most one [`FinancialsRecord`] is current. All mutation goes through the
/// transition methods below.
#[derive(Clone, Debug, PartialEq)]
pub struct ReservesState {
    query: String,
    suggestions: Vec<Institution>,
    show_suggestions: bool,
    record: Option<FinancialsRecord>,
    error: Option<String>,
    loading: bool,
    show_raw: bool,
}

impl Default for ReservesState {
    fn default() -> Self {
        Self::new()
    }
}

impl ReservesState {
    /// Creates an empty state with autosuggest enabled.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            query: String::new(),
            suggestions: Vec::new(),
            show_suggestions: true,
            record: None,
            error: None,
            loading: false,
            show_raw: false,
        }
    }

    /// Current query text.
    #[must_use]
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Current suggestion rows.
    #[must_use]
    pub fn suggestions(&self) -> &[Institution] {
        &self.suggestions
    }

    /// Whether autosuggest is enabled.
    #[must_use]
    pub const fn suggestions_enabled(&self) -> bool {
        self.show_suggestions
    }

    /// The current financials record, if any.
    #[must_use]
    pub const fn record(&self) -> Option<&FinancialsRecord> {
        self.record.as_ref()
    }

    /// The message in the error slot, if any.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Whether a detail lookup is in flight.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.loading
    }

    /// Whether the raw JSON view is shown.
    #[must_use]
    pub const fn show_raw(&self) -> bool {
        self.show_raw
    }

    /// Ratios for the current record, recomputed on every call.
    #[must_use]
    pub fn metrics(&self) -> Option<LiquidityMetrics> {
        self.record.as_ref().map(LiquidityMetrics::from_record)
    }

    /// The trimmed query, if it should trigger a suggestion lookup.
    ///
    /// Surrounding whitespace is stripped before the length check and the
    /// trimmed text is what gets searched for, so `"  First "` searches
    /// `First`. Inner whitespace is kept.
    #[must_use]
    pub fn suggestion_query(&self) -> Option<&str> {
        let trimmed = self.query.trim();
        (self.show_suggestions && trimmed.chars().count() >= MIN_QUERY_CHARS).then_some(trimmed)
    }

    /// Whether the current query should trigger a suggestion lookup.
    #[must_use]
    pub fn wants_suggestions(&self) -> bool {
        self.suggestion_query().is_some()
    }

    /// Replaces the query text. Editing the query re-enables autosuggest.
    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
        self.show_suggestions = true;
    }

    /// Replaces the suggestion rows.
    pub fn set_suggestions(&mut self, suggestions: Vec<Institution>) {
        self.suggestions = suggestions;
    }

    /// Empties the suggestion rows.
    pub fn clear_suggestions(&mut self) {
        self.suggestions.clear();
    }

    /// Turns autosuggest off until the query is edited again.
    pub fn disable_suggestions(&mut self) {
        self.show_suggestions = false;
        self.suggestions.clear();
    }

    /// Replaces the current record wholesale.
    pub fn set_record(&mut self, record: Option<FinancialsRecord>) {
        self.record = record;
    }

    /// Puts a message in the error slot, replacing any earlier one.
    pub fn set_error(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
    }

    /// Empties the error slot.
    pub fn clear_error(&mut self) {
        self.error = None;
    }

    /// Sets the loading flag.
    pub const fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
    }

    /// Flips the raw JSON view.
    pub const fn toggle_raw_view(&mut self) {
        self.show_raw = !self.show_raw;
    }

    /// Shows or hides the raw JSON view.
    pub const fn set_raw_view(&mut self, show_raw: bool) {
        self.show_raw = show_raw;
    }

    /// Prepares for a new detail lookup: no record, no error, loading.
    pub fn begin_detail_fetch(&mut self) {
        self.record = None;
        self.error = None;
        self.loading = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state() {
        let state = ReservesState::new();
        assert!(state.suggestions_enabled());
        assert!(state.record().is_none());
        assert!(state.metrics().is_none());
        assert!(!state.is_loading());
        assert!(!state.wants_suggestions());
    }

    #[test]
    fn test_suggestion_threshold_uses_trimmed_chars() {
        let mut state = ReservesState::new();
        state.set_query(" a ");
        assert!(!state.wants_suggestions());

        state.set_query("  ab ");
        assert_eq!(state.suggestion_query(), Some("ab"));
        assert_eq!(state.query(), "  ab ");

        state.set_query("\tFirst  Bank\n");
        assert_eq!(state.suggestion_query(), Some("First  Bank"));

        state.set_query("é");
        assert!(!state.wants_suggestions());
        state.set_query("éa");
        assert!(state.wants_suggestions());
    }

    #[test]
    fn test_disabled_suggestions_until_edit() {
        let mut state = ReservesState::new();
        state.set_suggestions(vec![Institution::new(1u64, "A", "B", "C")]);
        state.set_query("First Bank");
        state.disable_suggestions();
        assert!(state.suggestions().is_empty());
        assert!(!state.wants_suggestions());

        state.set_query("First Bank of");
        assert!(state.wants_suggestions());
    }

    #[test]
    fn test_begin_detail_fetch_resets_record_and_error() {
        let mut state = ReservesState::new();
        state.set_record(Some(FinancialsRecord::new().with_name("Old")));
        state.set_error("boom");

        state.begin_detail_fetch();

        assert!(state.record().is_none());
        assert!(state.error().is_none());
        assert!(state.is_loading());
    }

    #[test]
    fn test_toggle_raw_view() {
        let mut state = ReservesState::new();
        state.toggle_raw_view();
        assert!(state.show_raw());
        state.toggle_raw_view();
        assert!(!state.show_raw());
    }
}
