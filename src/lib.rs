//! Transaction aggregation, filtering and time-windowed reporting for a personal finance
//! tracker.
//!
//! The core (`period`, `filter`, `aggregate`, `insight`, `report`) is synchronous and pure: it
//! recomputes everything from a complete `Snapshot` on every call. The `store` module is the
//! boundary to the transaction store, and `commands` is the presentation layer used by the
//! `money` binary.

pub mod aggregate;
pub mod args;
pub mod commands;
mod config;
mod error;
pub mod filter;
pub mod insight;
pub mod model;
pub mod period;
pub mod report;
pub mod store;
mod utils;

#[cfg(test)]
mod test;

pub use config::Config;
pub use error::{Error, ErrorType, Result};
