//! Rate-limited refresh of the link cache from every configured source.

use chrono::Utc;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::watch;
use tokio::task::JoinSet;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info, warn};

use crate::domain::entities::ProjectId;
use crate::domain::errors::SourceError;
use crate::domain::refresh_clock::{Admission, RefreshClock};
use crate::domain::repositories::{ArtifactSource, KeyValueStore};

/// Minimum time between two refresh passes unless configured otherwise.
pub const DEFAULT_MIN_INTERVAL: Duration = Duration::from_secs(120);

/// Counters collected during one refresh pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RefreshReport {
    /// Sources polled.
    pub sources: usize,
    /// Sources whose listing failed and contributed nothing.
    pub failed_sources: usize,
    /// Entries written to the store.
    pub stored: usize,
    /// Entries whose write failed; their previous value stays visible.
    pub failed_writes: usize,
}

/// What a call to [`LinkMapRefresher::refresh_all`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// Rejected by the rate limiter; no upstream was contacted.
    Skipped { retry_in: Duration },
    /// A pass ran to completion, possibly with partial failures.
    Completed(RefreshReport),
}

#[derive(Debug, Default)]
struct SourceTally {
    stored: usize,
    failed_writes: usize,
}

/// Polls every [`ArtifactSource`] and writes their entries into the store.
///
/// Sole writer of the key-value store. The background loop and the
/// `/refresh` endpoint both go through [`Self::refresh_all`], so the rate
/// limit applies uniformly to every trigger.
pub struct LinkMapRefresher {
    sources: Vec<Arc<dyn ArtifactSource>>,
    store: Arc<dyn KeyValueStore>,
    clock: Arc<RefreshClock>,
    min_interval: Duration,
}

impl LinkMapRefresher {
    /// Creates a new refresher.
    pub fn new(
        sources: Vec<Arc<dyn ArtifactSource>>,
        store: Arc<dyn KeyValueStore>,
        clock: Arc<RefreshClock>,
        min_interval: Duration,
    ) -> Self {
        Self {
            sources,
            store,
            clock,
            min_interval,
        }
    }

    /// Runs a refresh pass now, unless one started within the minimum interval.
    pub async fn refresh_all(&self) -> RefreshOutcome {
        self.refresh_all_at(Utc::now().timestamp()).await
    }

    /// Runs a refresh pass as if the current time were `now` (unix seconds).
    ///
    /// # Pass Flow
    ///
    /// 1. Claim the pass on the [`RefreshClock`]; return `Skipped` if denied
    /// 2. Spawn the pass as a detached task with one subtask per source
    /// 3. Each subtask lists its artifacts and writes them one by one
    /// 4. Source and write failures are logged and counted, never propagated
    ///
    /// Once admitted, the pass runs to completion even if the returned
    /// future is dropped (for example when a `/refresh` caller hangs up).
    pub async fn refresh_all_at(&self, now: i64) -> RefreshOutcome {
        if let Admission::Denied { retry_in } = self.clock.try_begin(now, self.min_interval) {
            debug!(
                "Refresh skipped, next pass allowed in {}s",
                retry_in.as_secs()
            );
            metrics::counter!("refresh_passes_total", "outcome" => "skipped").increment(1);
            return RefreshOutcome::Skipped { retry_in };
        }

        let pass = tokio::spawn(run_pass(self.sources.clone(), Arc::clone(&self.store)));

        match pass.await {
            Ok(report) => RefreshOutcome::Completed(report),
            Err(e) => {
                error!("Refresh pass aborted: {}", e);
                RefreshOutcome::Completed(RefreshReport {
                    sources: self.sources.len(),
                    failed_sources: self.sources.len(),
                    ..RefreshReport::default()
                })
            }
        }
    }

    /// Start time of the last admitted pass.
    pub fn last_refresh(&self) -> Option<chrono::DateTime<Utc>> {
        self.clock.last_refresh()
    }

    /// Identities of the configured sources, in registry order.
    pub fn sources(&self) -> impl Iterator<Item = &ProjectId> {
        self.sources.iter().map(|s| s.id())
    }
}

/// Polls every source concurrently and tallies the results.
async fn run_pass(
    sources: Vec<Arc<dyn ArtifactSource>>,
    store: Arc<dyn KeyValueStore>,
) -> RefreshReport {
    let started = Instant::now();
    let mut tasks = JoinSet::new();

    for source in &sources {
        let source = Arc::clone(source);
        let store = Arc::clone(&store);
        tasks.spawn(async move {
            let result = refresh_source(source.as_ref(), store.as_ref()).await;
            (source.id().clone(), result)
        });
    }

    let mut report = RefreshReport {
        sources: sources.len(),
        ..RefreshReport::default()
    };

    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((_, Ok(tally))) => {
                report.stored += tally.stored;
                report.failed_writes += tally.failed_writes;
            }
            Ok((project, Err(e))) => {
                warn!(%project, "Artifact listing failed: {}", e);
                metrics::counter!("refresh_source_failures_total").increment(1);
                report.failed_sources += 1;
            }
            Err(e) => {
                error!("Refresh task aborted: {}", e);
                metrics::counter!("refresh_source_failures_total").increment(1);
                report.failed_sources += 1;
            }
        }
    }

    info!(
        sources = report.sources,
        failed_sources = report.failed_sources,
        stored = report.stored,
        failed_writes = report.failed_writes,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "Refresh pass completed"
    );
    metrics::counter!("refresh_passes_total", "outcome" => "completed").increment(1);

    report
}

/// Lists one source and writes its entries.
async fn refresh_source(
    source: &dyn ArtifactSource,
    store: &dyn KeyValueStore,
) -> Result<SourceTally, SourceError> {
    let entries = source.list_artifacts().await?;
    let mut tally = SourceTally::default();

    for entry in entries {
        match store.set(&entry.base_name, &entry.download_url).await {
            Ok(()) => tally.stored += 1,
            Err(e) => {
                warn!(project = %source.id(), "{}", e);
                metrics::counter!("refresh_store_failures_total").increment(1);
                tally.failed_writes += 1;
            }
        }
    }

    debug!(
        project = %source.id(),
        stored = tally.stored,
        "Source refreshed"
    );
    Ok(tally)
}

/// Drives periodic refresh passes until `shutdown` flips to `true`.
///
/// The first pass runs immediately. With `period = None` only that startup
/// pass runs; later passes then come from explicit triggers.
pub async fn run_refresh_loop(
    refresher: Arc<LinkMapRefresher>,
    period: Option<Duration>,
    mut shutdown: watch::Receiver<bool>,
) {
    refresher.refresh_all().await;

    let Some(period) = period else {
        debug!("Periodic refresh disabled");
        return;
    };

    let mut ticker = tokio::time::interval_at(tokio::time::Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                refresher.refresh_all().await;
            }
            changed = shutdown.changed() => {
                if changed.is_err() || *shutdown.borrow() {
                    info!("Refresh loop stopped");
                    break;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::LinkEntry;
    use crate::domain::errors::StoreError;
    use crate::domain::repositories::{MockArtifactSource, MockKeyValueStore};
    use crate::infrastructure::store::MemoryStore;

    const T0: i64 = 1_700_000_000;

    fn entry(name: &str) -> LinkEntry {
        LinkEntry::from_artifact(name, &format!("https://ci.example.com/{}", name)).unwrap()
    }

    fn source(slug: &str, entries: Vec<LinkEntry>, calls: usize) -> Arc<dyn ArtifactSource> {
        let mut mock = MockArtifactSource::new();
        mock.expect_id().return_const(ProjectId::new("owner", slug));
        mock.expect_list_artifacts()
            .times(calls)
            .returning(move || Ok(entries.clone()));
        Arc::new(mock)
    }

    fn failing_source(slug: &str) -> Arc<dyn ArtifactSource> {
        let mut mock = MockArtifactSource::new();
        mock.expect_id().return_const(ProjectId::new("owner", slug));
        mock.expect_list_artifacts().times(1).returning(|| {
            Err(SourceError::Status {
                url: "https://ci.example.com/api".to_string(),
                status: 429,
            })
        });
        Arc::new(mock)
    }

    fn refresher(sources: Vec<Arc<dyn ArtifactSource>>, store: MockKeyValueStore) -> LinkMapRefresher {
        LinkMapRefresher::new(
            sources,
            Arc::new(store),
            Arc::new(RefreshClock::new()),
            DEFAULT_MIN_INTERVAL,
        )
    }

    #[tokio::test]
    async fn test_refresh_writes_all_entries() {
        let mut store = MockKeyValueStore::new();
        store.expect_set().times(3).returning(|_, _| Ok(()));

        let refresher = refresher(
            vec![
                source("a", vec![entry("a-linux.zip"), entry("a-windows.zip")], 1),
                source("b", vec![entry("b-linux.zip")], 1),
            ],
            store,
        );

        let outcome = refresher.refresh_all_at(T0).await;

        assert_eq!(
            outcome,
            RefreshOutcome::Completed(RefreshReport {
                sources: 2,
                failed_sources: 0,
                stored: 3,
                failed_writes: 0,
            })
        );
        assert_eq!(refresher.last_refresh().unwrap().timestamp(), T0);
    }

    #[tokio::test]
    async fn test_refresh_within_interval_is_skipped() {
        let mut store = MockKeyValueStore::new();
        store.expect_set().times(1).returning(|_, _| Ok(()));

        let refresher = refresher(vec![source("a", vec![entry("a.zip")], 1)], store);

        refresher.refresh_all_at(T0).await;
        let second = refresher.refresh_all_at(T0 + 60).await;

        assert_eq!(
            second,
            RefreshOutcome::Skipped {
                retry_in: Duration::from_secs(60)
            }
        );
    }

    #[tokio::test]
    async fn test_refresh_after_interval_runs_again() {
        let mut store = MockKeyValueStore::new();
        store.expect_set().times(2).returning(|_, _| Ok(()));

        let refresher = refresher(vec![source("a", vec![entry("a.zip")], 2)], store);

        refresher.refresh_all_at(T0).await;
        let second = refresher.refresh_all_at(T0 + 121).await;

        assert!(matches!(second, RefreshOutcome::Completed(_)));
    }

    #[tokio::test]
    async fn test_failing_source_does_not_block_others() {
        let mut store = MockKeyValueStore::new();
        store
            .expect_set()
            .withf(|key, _| key == "good.zip")
            .times(1)
            .returning(|_, _| Ok(()));

        let refresher = refresher(
            vec![failing_source("broken"), source("good", vec![entry("good.zip")], 1)],
            store,
        );

        let outcome = refresher.refresh_all_at(T0).await;

        assert_eq!(
            outcome,
            RefreshOutcome::Completed(RefreshReport {
                sources: 2,
                failed_sources: 1,
                stored: 1,
                failed_writes: 0,
            })
        );
    }

    #[tokio::test]
    async fn test_write_failure_continues_with_remaining_entries() {
        let mut store = MockKeyValueStore::new();
        store
            .expect_set()
            .withf(|key, _| key == "bad.zip")
            .times(1)
            .returning(|key, _| {
                Err(StoreError::Write {
                    key: key.to_string(),
                    reason: "READONLY".to_string(),
                })
            });
        store
            .expect_set()
            .withf(|key, _| key != "bad.zip")
            .times(2)
            .returning(|_, _| Ok(()));

        let refresher = refresher(
            vec![source(
                "a",
                vec![entry("first.zip"), entry("bad.zip"), entry("last.zip")],
                1,
            )],
            store,
        );

        let outcome = refresher.refresh_all_at(T0).await;

        assert_eq!(
            outcome,
            RefreshOutcome::Completed(RefreshReport {
                sources: 1,
                failed_sources: 0,
                stored: 2,
                failed_writes: 1,
            })
        );
    }

    #[tokio::test]
    async fn test_concurrent_triggers_run_one_pass() {
        let mut store = MockKeyValueStore::new();
        store.expect_set().times(1).returning(|_, _| Ok(()));

        let refresher = Arc::new(refresher(vec![source("a", vec![entry("a.zip")], 1)], store));

        let (first, second) = tokio::join!(refresher.refresh_all_at(T0), refresher.refresh_all_at(T0));

        let completed = [first, second]
            .iter()
            .filter(|o| matches!(o, RefreshOutcome::Completed(_)))
            .count();
        assert_eq!(completed, 1);
    }

    struct SlowSource {
        id: ProjectId,
        delay: Duration,
    }

    #[async_trait::async_trait]
    impl ArtifactSource for SlowSource {
        fn id(&self) -> &ProjectId {
            &self.id
        }

        async fn list_artifacts(&self) -> Result<Vec<LinkEntry>, SourceError> {
            tokio::time::sleep(self.delay).await;
            Ok(vec![entry("a.zip")])
        }
    }

    #[tokio::test]
    async fn test_dropped_trigger_still_completes_pass() {
        let store = Arc::new(MemoryStore::new());
        let slow: Arc<dyn ArtifactSource> = Arc::new(SlowSource {
            id: ProjectId::new("owner", "a"),
            delay: Duration::from_millis(300),
        });
        let refresher = LinkMapRefresher::new(
            vec![slow],
            store.clone(),
            Arc::new(RefreshClock::new()),
            DEFAULT_MIN_INTERVAL,
        );

        let trigger =
            tokio::time::timeout(Duration::from_millis(50), refresher.refresh_all_at(T0)).await;
        assert!(trigger.is_err());

        tokio::time::sleep(Duration::from_millis(600)).await;

        assert_eq!(store.len(), 1);
        assert_eq!(
            store.get("a.zip").await.unwrap().as_deref(),
            Some("https://ci.example.com/a.zip")
        );
    }

    #[tokio::test]
    async fn test_loop_without_period_runs_startup_pass_only() {
        let mut store = MockKeyValueStore::new();
        store.expect_set().times(1).returning(|_, _| Ok(()));

        let refresher = Arc::new(refresher(vec![source("a", vec![entry("a.zip")], 1)], store));
        let (_tx, rx) = watch::channel(false);

        run_refresh_loop(refresher.clone(), None, rx).await;

        assert!(refresher.last_refresh().is_some());
    }

    #[tokio::test]
    async fn test_loop_stops_on_shutdown() {
        let mut store = MockKeyValueStore::new();
        store.expect_set().returning(|_, _| Ok(()));

        let refresher = Arc::new(refresher(vec![source("a", vec![entry("a.zip")], 1)], store));
        let (tx, rx) = watch::channel(false);

        let handle = tokio::spawn(run_refresh_loop(
            refresher,
            Some(Duration::from_secs(3600)),
            rx,
        ));
        tx.send(true).unwrap();

        tokio::time::timeout(Duration::from_secs(5), handle)
            .await
            .unwrap()
            .unwrap();
    }
}
