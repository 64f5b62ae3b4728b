//! Orchestration of suggestion and detail lookups.
//!
//! Lookups run as spawned tasks and report back over a channel as
//! [`ControllerEvent`]s. Every lookup is tagged with a generation number and a
//! result is only applied if its generation is still the latest one issued for
//! that flow, so a slow earlier response can never overwrite a newer one.
//! In-flight requests are not aborted; their results are simply dropped.

use std::fmt;
use std::sync::Arc;

use reserves_core::{
    BankDataProvider, CertNumber, DataProvider, FinancialsProvider, FinancialsRecord, Institution,
    InstitutionSearchProvider, LiquidityMetrics, Result, SUGGESTION_LIMIT,
};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::state::ReservesState;

/// Completion of a lookup started by [`ReservesController`].
#[derive(Debug)]
pub enum ControllerEvent {
    /// Result of a name suggestion lookup.
    Suggestions {
        /// Generation the lookup was issued under.
        generation: u64,
        /// The rows, or the failure.
        result: Result<Vec<Institution>>,
    },
    /// Result of a financials lookup.
    Financials {
        /// Generation the lookup was issued under.
        generation: u64,
        /// Institution that was requested.
        cert: CertNumber,
        /// The most recent record, or the failure.
        result: Result<Option<FinancialsRecord>>,
    },
}

impl ControllerEvent {
    /// Generation the lookup was issued under.
    #[must_use]
    pub const fn generation(&self) -> u64 {
        match self {
            Self::Suggestions { generation, .. } | Self::Financials { generation, .. } => {
                *generation
            }
        }
    }
}

/// Drives the search-then-select lookup flow.
///
/// Requires a Tokio runtime: lookups are started with [`tokio::spawn`].
pub struct ReservesController {
    provider: Arc<dyn BankDataProvider>,
    state: ReservesState,
    suggestion_limit: usize,
    suggestion_generation: u64,
    detail_generation: u64,
    events: mpsc::UnboundedSender<ControllerEvent>,
}

impl fmt::Debug for ReservesController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReservesController")
            .field("provider", &self.provider.name())
            .field("state", &self.state)
            .field("suggestion_limit", &self.suggestion_limit)
            .field("suggestion_generation", &self.suggestion_generation)
            .field("detail_generation", &self.detail_generation)
            .finish()
    }
}

impl ReservesController {
    /// Create a controller and the receiver its lookups report to.
    ///
    /// Every event taken off the receiver should be handed back to
    /// [`apply`](Self::apply).
    #[must_use]
    pub fn new(
        provider: Arc<dyn BankDataProvider>,
    ) -> (Self, mpsc::UnboundedReceiver<ControllerEvent>) {
        let (events, receiver) = mpsc::unbounded_channel();
        let controller = Self {
            provider,
            state: ReservesState::new(),
            suggestion_limit: SUGGESTION_LIMIT,
            suggestion_generation: 0,
            detail_generation: 0,
            events,
        };
        (controller, receiver)
    }

    /// Create a controller backed by the FDIC API, configured from the environment.
    #[cfg(feature = "fdic")]
    #[must_use]
    pub fn fdic_from_env() -> (Self, mpsc::UnboundedReceiver<ControllerEvent>) {
        let provider = reserves_fdic::FdicProvider::from_env();
        Self::new(Arc::new(provider))
    }

    /// Set the number of suggestion rows requested.
    #[must_use]
    pub fn with_suggestion_limit(mut self, limit: usize) -> Self {
        self.suggestion_limit = limit;
        self
    }

    /// The current state.
    #[must_use]
    pub const fn state(&self) -> &ReservesState {
        &self.state
    }

    /// Ratios for the current record.
    #[must_use]
    pub fn metrics(&self) -> Option<LiquidityMetrics> {
        self.state.metrics()
    }

    /// Replace the query text, as if typed, and refresh suggestions.
    ///
    /// Returns true if a suggestion lookup was started.
    pub fn set_query(&mut self, text: impl Into<String>) -> bool {
        self.state.set_query(text);
        self.refresh_suggestions()
    }

    /// Re-evaluate suggestions for the current query.
    ///
    /// Any lookup already in flight becomes stale. Below the length threshold,
    /// or while autosuggest is disabled, the list is cleared and nothing is
    /// requested. Returns true if a lookup was started.
    pub fn refresh_suggestions(&mut self) -> bool {
        self.suggestion_generation += 1;

        // The provider receives the trimmed text, never the raw input.
        let Some(fragment) = self.state.suggestion_query().map(str::to_owned) else {
            self.state.clear_suggestions();
            return false;
        };

        self.state.clear_error();

        let generation = self.suggestion_generation;
        let limit = self.suggestion_limit;
        let provider = Arc::clone(&self.provider);
        let events = self.events.clone();
        debug!(generation, fragment = %fragment, "Starting suggestion lookup");

        tokio::spawn(async move {
            let result = provider.search_institutions(&fragment, limit).await;
            if events
                .send(ControllerEvent::Suggestions { generation, result })
                .is_err()
            {
                debug!(generation, "Controller dropped before suggestions arrived");
            }
        });

        true
    }

    /// Select the suggestion at `index`. Returns false if there is none.
    pub fn select_suggestion(&mut self, index: usize) -> bool {
        let Some(institution) = self.state.suggestions().get(index).cloned() else {
            return false;
        };
        self.select_institution(&institution);
        true
    }

    /// Select an institution: fill the query with its label, hide
    /// suggestions until the query is edited, and fetch its financials.
    pub fn select_institution(&mut self, institution: &Institution) {
        self.state.set_query(institution.label());
        self.state.disable_suggestions();
        self.suggestion_generation += 1;
        self.state.set_raw_view(false);
        self.load_financials(institution.cert);
    }

    /// Fetch the most recent financials for `cert`.
    ///
    /// The previous record and error are cleared and the loading flag is set
    /// before the request goes out.
    pub fn load_financials(&mut self, cert: CertNumber) {
        self.state.begin_detail_fetch();
        self.detail_generation += 1;

        let generation = self.detail_generation;
        let provider = Arc::clone(&self.provider);
        let events = self.events.clone();
        info!(generation, cert = %cert, "Loading financials");

        tokio::spawn(async move {
            let result = provider.latest_financials(cert).await;
            if events
                .send(ControllerEvent::Financials {
                    generation,
                    cert,
                    result,
                })
                .is_err()
            {
                debug!(generation, "Controller dropped before financials arrived");
            }
        });
    }

    /// Flip the raw JSON view.
    pub const fn toggle_raw_view(&mut self) {
        self.state.toggle_raw_view();
    }

    /// Fold a completed lookup into the state.
    ///
    /// Returns false if the event was stale and ignored.
    pub fn apply(&mut self, event: ControllerEvent) -> bool {
        match event {
            ControllerEvent::Suggestions { generation, result } => {
                if generation != self.suggestion_generation {
                    debug!(
                        generation,
                        latest = self.suggestion_generation,
                        "Dropping stale suggestions"
                    );
                    return false;
                }
                match result {
                    Ok(rows) => {
                        debug!(generation, count = rows.len(), "Suggestions received");
                        self.state.set_suggestions(rows);
                    }
                    Err(e) => {
                        warn!(generation, error = %e, "Suggestion lookup failed");
                        self.state.set_error(e.to_string());
                    }
                }
                true
            }
            ControllerEvent::Financials {
                generation,
                cert,
                result,
            } => {
                if generation != self.detail_generation {
                    debug!(
                        generation,
                        latest = self.detail_generation,
                        cert = %cert,
                        "Dropping stale financials"
                    );
                    return false;
                }
                match result {
                    Ok(record) => {
                        info!(cert = %cert, found = record.is_some(), "Financials received");
                        self.state.set_record(Some(record.unwrap_or_default()));
                    }
                    Err(e) => {
                        warn!(cert = %cert, error = %e, "Financials lookup failed");
                        self.state.set_error(e.to_string());
                    }
                }
                self.state.set_loading(false);
                true
            }
        }
    }
}
