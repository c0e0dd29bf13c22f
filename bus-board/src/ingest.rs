//! Background refresh of the departure store.
//!
//! Two jobs run on their own intervals: stop times for every configured
//! stop, and route colours for the same stops. Each refresh fetches all
//! stops concurrently and writes whatever succeeded into the store. A stop
//! that fails keeps its previous entry until that entry expires.

use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::domain::StopId;
use crate::source::DepartureSource;
use crate::store::DepartureStore;

/// How often each ingestion job runs.
#[derive(Debug, Clone)]
pub struct IngestConfig {
    /// Interval between stop time refreshes.
    pub times_interval: Duration,

    /// Interval between route colour refreshes.
    pub meta_interval: Duration,
}

impl IngestConfig {
    pub fn with_times_interval(mut self, interval: Duration) -> Self {
        self.times_interval = interval;
        self
    }

    pub fn with_meta_interval(mut self, interval: Duration) -> Self {
        self.meta_interval = interval;
        self
    }
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            times_interval: Duration::from_secs(60),
            meta_interval: Duration::from_secs(24 * 60 * 60),
        }
    }
}

/// Outcome of one refresh pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestReport {
    pub refreshed: usize,
    pub failed: usize,
}

/// Copies upstream data for a fixed set of stops into the store.
pub struct Ingestor<S> {
    upstream: S,
    store: DepartureStore,
    stops: Vec<StopId>,
}

impl<S: DepartureSource> Ingestor<S> {
    pub fn new(upstream: S, store: DepartureStore, stops: Vec<StopId>) -> Self {
        Self {
            upstream,
            store,
            stops,
        }
    }

    pub fn stops(&self) -> &[StopId] {
        &self.stops
    }

    /// Fetch current departures for every stop and store the successes.
    pub async fn refresh_times(&self) -> IngestReport {
        let results = join_all(self.stops.iter().map(|stop| async move {
            (stop, self.upstream.departures(stop).await)
        }))
        .await;

        let mut report = IngestReport::default();
        for (stop, result) in results {
            match result {
                Ok(departures) => {
                    debug!(stop = %stop, count = departures.len(), "Ingested stop times");
                    self.store.put_departures(stop.clone(), departures).await;
                    report.refreshed += 1;
                }
                Err(e) => {
                    warn!(stop = %stop, error = %e, "Stop times refresh failed");
                    report.failed += 1;
                }
            }
        }
        report
    }

    /// Fetch route colours for every stop and store the successes.
    pub async fn refresh_meta(&self) -> IngestReport {
        let results = join_all(self.stops.iter().map(|stop| async move {
            (stop, self.upstream.route_meta(stop).await)
        }))
        .await;

        let mut report = IngestReport::default();
        for (stop, result) in results {
            match result {
                Ok(meta) => {
                    debug!(stop = %stop, routes = meta.len(), "Ingested route colours");
                    self.store.put_route_meta(stop.clone(), meta).await;
                    report.refreshed += 1;
                }
                Err(e) => {
                    warn!(stop = %stop, error = %e, "Route colours refresh failed");
                    report.failed += 1;
                }
            }
        }
        report
    }

    /// Run both refreshes once, concurrently.
    pub async fn refresh_all(&self) -> (IngestReport, IngestReport) {
        tokio::join!(self.refresh_times(), self.refresh_meta())
    }
}

/// Handles to the two running ingestion loops.
pub struct IngestHandles {
    pub times: JoinHandle<()>,
    pub meta: JoinHandle<()>,
}

impl IngestHandles {
    pub fn abort(&self) {
        self.times.abort();
        self.meta.abort();
    }
}

/// Start both ingestion loops.
///
/// The first refresh of each happens one interval from now; callers that
/// need data straight away run [`Ingestor::refresh_all`] first.
pub fn spawn<S>(ingestor: Arc<Ingestor<S>>, config: &IngestConfig) -> IngestHandles
where
    S: DepartureSource + Send + 'static,
{
    let times_ingestor = Arc::clone(&ingestor);
    let times_interval = config.times_interval;
    let times = tokio::spawn(async move {
        let mut interval = tokio::time::interval(times_interval);
        interval.tick().await; // First tick is immediate, skip it
        loop {
            interval.tick().await;
            let report = times_ingestor.refresh_times().await;
            info!(
                refreshed = report.refreshed,
                failed = report.failed,
                "Refreshed stop times"
            );
        }
    });

    let meta_interval = config.meta_interval;
    let meta = tokio::spawn(async move {
        let mut interval = tokio::time::interval(meta_interval);
        interval.tick().await;
        loop {
            interval.tick().await;
            let report = ingestor.refresh_meta().await;
            info!(
                refreshed = report.refreshed,
                failed = report.failed,
                "Refreshed route colours"
            );
        }
    });

    IngestHandles { times, meta }
}
