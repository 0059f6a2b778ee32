//! One batch pass over every registered fare alert.
//!
//! This crate provides:
//! - `PriceFetcher` trait and an HTTP implementation for the fare lookup service
//! - `ConcurrencyGate` bounding simultaneous fare lookups
//! - The per-alert processor (expiry, cooldown, fetch, persist, compare, notify)
//! - `BatchScheduler` fanning alerts out under the gate and summarising the run

pub mod error;
pub mod fetch;
pub mod gate;
pub mod processor;
pub mod scheduler;

pub use error::ProcessError;
pub use fetch::{FetchError, HttpPriceFetcher, PriceFetcher};
pub use gate::{ConcurrencyGate, GatePermit};
pub use processor::{CheckContext, Outcome};
pub use scheduler::{BatchScheduler, BatchSummary};
