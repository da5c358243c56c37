// Library crate: public API items may not be used by the binary
#![allow(unused)]

//! # pulsewatch
//!
//! A terminal dashboard and client library for the pulsewatch uptime
//! monitor.
//!
//! The binary renders a live dashboard over the monitor's HTTP API: a
//! target table with probe status and availability, a response-time
//! chart for the selected target, and a feed of recent alerts. All
//! fetching is concurrent and fail-soft; whatever state is already on
//! screen stays there when a refresh fails.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                      run loop (sync)                         │
//! │  ┌─────────┐     ┌──────────┐     ┌─────────┐    ┌────────┐  │
//! │  │ events  │────▶│   app    │────▶│   ui    │───▶│Terminal│  │
//! │  │ (input) │     │ (state)  │     │ (render)│    │        │  │
//! │  └────┬────┘     └────▲─────┘     └─────────┘    └────────┘  │
//! │       │               │ apply_event                          │
//! │       ▼               │                                      │
//! │  ┌─────────┐     ┌────┴─────┐     ┌─────────┐                │
//! │  │  poll   │────▶│ channel  │     │   api   │───▶ HTTP       │
//! │  │ (tasks) │     │ (events) │     │ (client)│                │
//! │  └─────────┘     └──────────┘     └─────────┘                │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! - **[`app`]**: View state and reconciliation - the target list, selection,
//!   availability map, tagged timeseries, and alert feed
//! - **[`poll`]**: Fetch cycles - each request spawns a task that sends one
//!   [`PollEvent`] back; [`apply_event`] routes results into the state
//! - **[`api`]**: The [`Backend`] trait and its reqwest implementation
//! - **[`data`]**: Pure helpers - probe status derivation and display formatting
//! - **[`ui`]**: Terminal rendering using ratatui - tables, chart, overlays,
//!   and theme support
//! - **[`config`]**: Settings from file, environment, and CLI overrides
//!
//! ## Usage
//!
//! ### As a CLI tool
//!
//! ```bash
//! # Dashboard against a local backend
//! pulsewatch --url http://127.0.0.1:8000
//!
//! # Faster refresh, logs to a file
//! pulsewatch --refresh 2 --log-file pulsewatch.log
//! ```
//!
//! ### As a library
//!
//! ```
//! use pulsewatch::{App, Theme};
//!
//! let app = App::new("http://127.0.0.1:8000", Theme::dark());
//! assert!(app.selected().is_none());
//! ```
//!
//! ### Driving fetch cycles manually
//!
//! ```no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//! use pulsewatch::{Backend, FetchWindows, HttpBackend, Poller};
//! use tokio::sync::mpsc;
//!
//! # tokio_test::block_on(async {
//! let http = HttpBackend::new("http://127.0.0.1:8000", Duration::from_secs(10)).unwrap();
//! let backend: Arc<dyn Backend> = Arc::new(http);
//! let (tx, mut rx) = mpsc::channel(16);
//! let poller = Poller::new(
//!     backend,
//!     tokio::runtime::Handle::current(),
//!     tx,
//!     FetchWindows::default(),
//! );
//! poller.request_overview();
//! let event = rx.recv().await;
//! # });
//! ```

pub mod api;
pub mod app;
pub mod config;
pub mod data;
pub mod events;
pub mod poll;
pub mod ui;

// Re-export main types for convenience
pub use api::{ApiError, Backend, HttpBackend, Target, TargetId};
pub use app::{App, SelectionChange, TaggedSeries};
pub use config::Settings;
pub use poll::{apply_event, FetchWindows, PollEvent, Poller};
pub use ui::Theme;
