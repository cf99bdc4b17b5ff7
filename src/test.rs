//! Shared test utilities for creating test environments.
//!
//! This module is only compiled when running tests (`#[cfg(test)]`).

use crate::{utils, Config};
use chrono::NaiveDate;
use serde_json::{json, Map, Value};
use tempfile::TempDir;
use uuid::Uuid;

pub(crate) const OWNER: &str = "owner-1";

/// Test environment that sets up a money home directory with a Config and an empty snapshot.
/// Holds TempDir to keep the directory alive for the duration of the test.
pub(crate) struct TestEnv {
    _temp_dir: TempDir,
    config: Config,
}

impl TestEnv {
    /// Creates a test environment whose config only shows transactions of `OWNER`.
    pub async fn new() -> Self {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().join("money");
        let config = Config::create(&root, None, Some(OWNER.to_string()))
            .await
            .unwrap();

        Self {
            _temp_dir: temp_dir,
            config,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Replaces the snapshot file with `records`, each an `(amount, date, category, description)`
    /// belonging to `OWNER`. Ids are random.
    pub async fn write_snapshot(&self, records: &[(f64, &str, &str, &str)]) {
        let mut map = Map::new();
        for (amount, date, category, description) in records {
            map.insert(
                Uuid::new_v4().to_string(),
                json!({
                    "uid": OWNER,
                    "text": description,
                    "amount": amount,
                    "date": date,
                    "category": category,
                    "createdAt": "2024-01-01T00:00:00Z",
                }),
            );
        }
        self.write_raw(&Value::Object(map)).await;
    }

    /// Replaces the snapshot file with arbitrary JSON.
    pub async fn write_raw(&self, value: &Value) {
        let data = serde_json::to_string_pretty(value).unwrap();
        utils::write(self.config.snapshot_path(), data)
            .await
            .unwrap();
    }

    /// Writes the fixture most command tests share: January and February 2024.
    pub async fn write_sample(&self) {
        self.write_snapshot(&[
            (30000.0, "2024-01-25", "salary", "January salary"),
            (-120.5, "2024-01-03", "food", "Noodles"),
            (-45.25, "2024-01-09", "transport", "Bus pass"),
            (-2500.0, "2024-02-02", "utilities", "Electricity"),
            (1500.0, "2024-02-14", "business", "Side project"),
            (-80.0, "2024-02-20", "food", "Coffee beans"),
        ])
        .await;
    }
}

pub(crate) fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}
