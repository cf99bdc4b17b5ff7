use crate::commands::summary::summarize;
use crate::commands::{selector, Out};
use crate::period::PeriodSelector;
use crate::store;
use crate::{Config, Result};
use chrono::{Local, NaiveDate};
use std::future::Future;
use tracing::{info, warn};

/// Prints the summary of the selected period every time the snapshot changes, until Ctrl-C.
///
/// Without `today` the current month or week is recomputed from the local clock on each
/// delivery, so a long-running watch rolls over at midnight.
pub async fn watch(
    config: &Config,
    period: Option<PeriodSelector>,
    today: Option<NaiveDate>,
    json: bool,
) -> Result<Out<usize>> {
    let stop = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Unable to listen for Ctrl-C: {e}");
            std::future::pending::<()>().await
        }
    };
    watch_until(config, period, today, json, stop).await
}

async fn watch_until<F>(
    config: &Config,
    period: Option<PeriodSelector>,
    today: Option<NaiveDate>,
    json: bool,
    stop: F,
) -> Result<Out<usize>>
where
    F: Future<Output = ()>,
{
    let source = config.source();
    let selector = selector(config, period);
    info!(
        "Watching {} every {:?}, press Ctrl-C to stop",
        source.path().display(),
        config.poll_interval()
    );
    let deliveries = store::watch(&source, config.poll_interval(), stop, |snapshot| {
        let now = today.unwrap_or_else(|| Local::now().date_naive());
        summarize(snapshot, &selector, now).print(json);
    })
    .await?;
    Ok(Out::new(
        format!("Stopped watching after {deliveries} snapshots"),
        deliveries,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::{date, TestEnv};
    use std::time::Duration;

    #[tokio::test]
    async fn test_watch_delivers_current_snapshot_then_stops() {
        let env = TestEnv::new().await;
        env.write_sample().await;
        let stop = tokio::time::sleep(Duration::from_millis(200));
        let out = watch_until(
            env.config(),
            Some(PeriodSelector::All),
            Some(date(2024, 3, 1)),
            false,
            stop,
        )
        .await
        .unwrap();
        assert_eq!(out.structure(), Some(&1));
        assert_eq!(out.message(), "Stopped watching after 1 snapshots");
    }

    #[tokio::test]
    async fn test_watch_survives_missing_snapshot() {
        let env = TestEnv::new().await;
        tokio::fs::remove_file(env.config().snapshot_path())
            .await
            .unwrap();
        let stop = tokio::time::sleep(Duration::from_millis(100));
        let out = watch_until(env.config(), None, Some(date(2024, 3, 1)), true, stop)
            .await
            .unwrap();
        assert_eq!(out.structure(), Some(&0));
    }
}
