// Library crate: public API items may not be used by the binary
#![allow(unused)]

//! # daqwatch
//!
//! A diagnostic TUI and library for monitoring detector DAQ activity.
//!
//! This crate watches the monitoring server of a detector DAQ: it polls
//! JSON endpoints for metric time series, processing-stream file listings
//! and trigger settings, and displays them in an interactive terminal UI
//! with horizon-style charts and a crate selection grid.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        Application                          │
//! │  ┌─────────┐    ┌──────────┐    ┌─────────┐    ┌─────────┐ │
//! │  │  app    │───▶│   data   │───▶│   ui    │───▶│ Terminal│ │
//! │  │ (state) │    │ (models) │    │(rendering)   │         │ │
//! │  └────┬────┘    └──────────┘    └─────────┘    └─────────┘ │
//! │       │                                                     │
//! │       ▼                                                     │
//! │  ┌─────────┐     ┌──────────┐                               │
//! │  │  poll   │────▶│  metric  │──▶ HTTP /metric /get_l3 ...  │
//! │  │ (loops) │     │ (client) │                               │
//! │  └─────────┘     └──────────┘                               │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! - **[`app`]**: Application state, view navigation, and user interaction logic
//! - **[`poll`]**: The recurring-fetch loop ([`PollHandle`]) with explicit
//!   cancellation, plus the typed JSON poll targets
//! - **[`metric`]**: The metric source adapter - wraps a named expression
//!   into a `(start, stop, step)` time-range query and parses the series
//! - **[`data`]**: Crate selection mask, range form validation, relative ages
//! - **[`ui`]**: Terminal rendering using ratatui - horizon rows, the crate
//!   grid and chart, file listings, settings readout, theme support
//!
//! ## Usage
//!
//! ### As a CLI tool
//!
//! ```bash
//! # Watch a monitoring server
//! daqwatch --endpoint http://daq.local:5000
//!
//! # Coarser sampling, custom config
//! daqwatch --config daqwatch.toml --step 600
//! ```
//!
//! ### As a library
//!
//! ```no_run
//! use std::time::Duration;
//! use daqwatch::{MetricClient, TimeWindow};
//!
//! # tokio_test::block_on(async {
//! let client = MetricClient::builder()
//!     .endpoint("http://daq.local:5000")
//!     .timeout(Duration::from_secs(5))
//!     .build();
//!
//! let window = TimeWindow::trailing(chrono::Utc::now(), 3600, Duration::from_secs(60));
//! let series = client.fetch("temp-12", &window).await?;
//! println!("{} samples", series.len());
//! # Ok::<(), daqwatch::FetchError>(())
//! # });
//! ```
//!
//! ### Polling a resource with cancellation
//!
//! ```no_run
//! use std::time::Duration;
//! use daqwatch::poll;
//!
//! # tokio_test::block_on(async {
//! let mut handle = poll::spawn("numbers", Duration::from_secs(5), || async {
//!     Ok::<u64, String>(42)
//! });
//!
//! if let Some(value) = handle.poll() {
//!     println!("got {value}");
//! }
//! handle.cancel();
//! # });
//! ```

pub mod app;
pub mod config;
pub mod data;
pub mod error;
pub mod events;
pub mod metric;
pub mod poll;
pub mod ui;

// Re-export main types for convenience
pub use app::App;
pub use config::AppConfig;
pub use data::{CrateMask, RangeError, RangeQuery, SearchField};
pub use error::FetchError;
pub use metric::{MetricClient, MetricSeries, SamplePoint, TimeWindow};
pub use poll::{FileListing, PollHandle, TriggerSettings};
