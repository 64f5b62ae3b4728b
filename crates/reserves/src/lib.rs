#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/reserves/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Bank reserve lookups over the FDIC BankFind API.
//!
//! This crate ties the core types to a data source and provides a
//! [`ReservesController`] that owns the lookup state:
//!
//! 1. [`ReservesController::set_query`] issues name suggestions as the user types
//! 2. [`ReservesController::select_suggestion`] fetches the latest filing
//! 3. [`ReservesController::apply`] folds completed lookups back into the state
//!
//! # Features
//!
//! - `fdic` - FDIC BankFind provider (default)
//!
//! # Example
//!
//! ```rust,ignore
//! use reserves::{DetailView, ReservesController};
//!
//! #[tokio::main]
//! async fn main() {
//!     let (mut controller, mut events) = ReservesController::fdic_from_env();
//!
//!     controller.set_query("Silvergate");
//!     if let Some(event) = events.recv().await {
//!         controller.apply(event);
//!     }
//!
//!     if controller.select_suggestion(0) {
//!         if let Some(event) = events.recv().await {
//!             controller.apply(event);
//!         }
//!     }
//!
//!     if let Some(view) = DetailView::from_state(controller.state()) {
//!         println!("{} as of {}", view.title, view.as_of);
//!     }
//! }
//! ```

// Core types and traits
pub use reserves_core::*;

// Providers
#[cfg(feature = "fdic")]
pub use reserves_fdic::{FdicConfig, FdicProvider};

mod controller;
mod state;
mod view;

pub use controller::{ControllerEvent, ReservesController};
pub use state::{MIN_QUERY_CHARS, ReservesState};
pub use view::{DetailView, LOADING_TEXT, ViewRow, suggestion_labels};
