//! Command handlers for the money CLI.
//!
//! Each handler loads what it needs, runs the pure core, and returns an `Out` holding both the
//! text shown to the user and the structured result.

mod categories;
mod init;
mod list;
mod report;
mod summary;
mod trend;
mod watch;

use crate::error::{ErrorType, IntoResult};
use crate::model::Snapshot;
use crate::period::PeriodSelector;
use crate::store::SnapshotSource;
use crate::{Config, Result};
use serde::Serialize;
use std::fmt::Debug;
use tracing::debug;

pub use categories::categories;
pub use init::{init, InitOutput};
pub use list::{list, ListRow, Listing, Rows};
pub use report::report;
pub use summary::summary;
pub use trend::{trend, Trend};
pub use watch::watch;

/// The output type for a command. This allows the command to return a consistent message and,
/// optionally, structured data.
#[derive(Debug, Clone, Serialize)]
pub struct Out<T>
where
    T: Serialize + Clone + Debug,
{
    /// A message that can be printed to the user regarding the outcome of the command execution.
    message: String,

    /// Any structured data that needs to be output from the call.
    structure: Option<T>,
}

impl<T, S> From<S> for Out<T>
where
    T: Debug + Clone + Serialize,
    S: Into<String>,
{
    fn from(value: S) -> Self {
        Out::new_message(value)
    }
}

impl<T> Out<T>
where
    T: Serialize + Clone + Debug,
{
    /// Create a new `Out` object that has `Some(structure)`.
    pub fn new<S>(message: S, structure: T) -> Self
    where
        S: Into<String>,
    {
        Self {
            message: message.into(),
            structure: Some(structure),
        }
    }

    /// Create a new `Out` object that has `None` for `structure`.
    pub fn new_message<S>(message: S) -> Self
    where
        S: Into<String>,
    {
        Self {
            message: message.into(),
            structure: None,
        }
    }

    /// Get the `message`.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get the structured data stored in `structure`.
    pub fn structure(&self) -> Option<&T> {
        self.structure.as_ref()
    }

    /// Print the output to stdout.
    ///
    /// With `json` the structured data is printed as pretty JSON (falling back to the message
    /// when there is none). Otherwise the message is printed and the structured data goes to
    /// `debug!`.
    pub fn print(&self, json: bool) {
        let structure = self
            .structure()
            .and_then(|s| serde_json::to_string_pretty(s).ok());
        match (json, structure) {
            (true, Some(json)) => println!("{json}"),
            (_, structure) => {
                println!("{}", self.message);
                if let Some(json) = structure {
                    debug!("Command output:\n\n{json}\n\n");
                }
            }
        }
    }
}

/// Reads the current snapshot through the configured source.
async fn load_snapshot(config: &Config) -> Result<Snapshot> {
    config
        .source()
        .snapshot()
        .await
        .pub_result(ErrorType::Snapshot)
}

/// The period given on the command line, or the configured default.
fn selector(config: &Config, period: Option<PeriodSelector>) -> PeriodSelector {
    period.unwrap_or_else(|| config.default_period())
}
