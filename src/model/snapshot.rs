use crate::model::{RawTransaction, SkipReason, Transaction};
use crate::Result;
use anyhow::Context;
use serde::Serialize;
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, warn};

/// The complete working set of transactions for one owner at a point in time.
///
/// A snapshot is never merged with another one: each delivery from the store replaces the
/// previous snapshot wholesale.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Snapshot {
    transactions: Vec<Transaction>,
    /// Records dropped because they were malformed or their date or amount was unusable.
    skipped: usize,
    /// Records dropped because they belong to a different owner.
    foreign: usize,
}

impl Snapshot {
    pub fn new(transactions: Vec<Transaction>) -> Self {
        Self {
            transactions,
            skipped: 0,
            foreign: 0,
        }
    }

    /// Builds a snapshot from the store's id → record mapping.
    ///
    /// When `owner` is given, records belonging to anyone else are left out. Records that are
    /// not objects, or whose date or amount cannot be used, are skipped and counted; they never
    /// abort the snapshot.
    pub fn from_records(records: BTreeMap<String, Value>, owner: Option<&str>) -> Self {
        let mut snapshot = Snapshot::default();
        for (id, value) in records {
            let parsed = serde_json::from_value::<RawTransaction>(value)
                .map_err(|e| SkipReason::Malformed(e.to_string()))
                .and_then(|raw| {
                    if owner.is_some() && raw.owner().as_deref() != owner {
                        return Ok(None);
                    }
                    Transaction::from_raw(&id, raw).map(Some)
                });
            match parsed {
                Ok(Some(t)) => snapshot.transactions.push(t),
                Ok(None) => snapshot.foreign += 1,
                Err(reason) => {
                    debug!("Skipping transaction '{id}' because {reason}");
                    snapshot.skipped += 1;
                }
            }
        }
        if owner.is_none() {
            let owners = snapshot.owners();
            if owners.len() > 1 {
                warn!(
                    "The snapshot mixes transactions from {} owners; set an owner in the config \
                    to keep only one",
                    owners.len()
                );
            }
        }
        snapshot
    }

    /// Parses the JSON export of a store snapshot: an object keyed by transaction id.
    pub fn parse_json(json: &str, owner: Option<&str>) -> Result<Self> {
        let records: BTreeMap<String, Value> =
            serde_json::from_str(json).context("The snapshot is not a JSON object of records")?;
        Ok(Self::from_records(records, owner))
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    pub fn skipped(&self) -> usize {
        self.skipped
    }

    pub fn foreign(&self) -> usize {
        self.foreign
    }

    /// The distinct owner ids among the kept transactions.
    pub fn owners(&self) -> BTreeSet<&str> {
        self.transactions.iter().map(Transaction::owner).collect()
    }
}

impl From<Vec<Transaction>> for Snapshot {
    fn from(transactions: Vec<Transaction>) -> Self {
        Snapshot::new(transactions)
    }
}
