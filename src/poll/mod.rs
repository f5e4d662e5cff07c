//! Polling infrastructure.
//!
//! This module provides the recurring-fetch abstraction the dashboard is
//! built on: a background task that fetches a JSON resource, publishes the
//! result, and reschedules itself after a fixed interval, with explicit
//! cancellation and a non-blocking consumer side.

mod poller;
pub mod targets;

pub use poller::{spawn, PollHandle};
pub use targets::{FileListing, TriggerSettings};
