//! Stop-keyed departure store.
//!
//! Holds the latest ingested stop times and route colours for each stop.
//! Entries expire, so a stop whose ingestion keeps failing eventually reads
//! as missing instead of showing stale buses.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache as MokaCache;

use crate::domain::{RawDeparture, RouteMeta, StopId};
use crate::source::{DepartureSource, SourceError};

/// Configuration for the store.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// How long ingested stop times stay readable.
    pub times_ttl: Duration,

    /// How long ingested route colours stay readable.
    pub meta_ttl: Duration,

    /// Maximum number of stops held per table.
    pub max_capacity: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            times_ttl: Duration::from_secs(5 * 60),
            meta_ttl: Duration::from_secs(48 * 60 * 60),
            max_capacity: 1000,
        }
    }
}

/// In-memory store of per-stop departure data.
///
/// Cheap to clone; clones share the same tables.
#[derive(Clone)]
pub struct DepartureStore {
    times: MokaCache<StopId, Arc<Vec<RawDeparture>>>,
    meta: MokaCache<StopId, Arc<RouteMeta>>,
}

impl DepartureStore {
    /// Create an empty store.
    pub fn new(config: &StoreConfig) -> Self {
        let times = MokaCache::builder()
            .time_to_live(config.times_ttl)
            .max_capacity(config.max_capacity)
            .build();
        let meta = MokaCache::builder()
            .time_to_live(config.meta_ttl)
            .max_capacity(config.max_capacity)
            .build();

        Self { times, meta }
    }

    /// Replace the departures held for a stop.
    pub async fn put_departures(
        &self,
        stop: StopId,
        departures: impl Into<Arc<Vec<RawDeparture>>>,
    ) {
        self.times.insert(stop, departures.into()).await;
    }

    /// Replace the route colours held for a stop.
    pub async fn put_route_meta(&self, stop: StopId, meta: impl Into<Arc<RouteMeta>>) {
        self.meta.insert(stop, meta.into()).await;
    }

    /// Number of stops with departures held (for logging).
    pub async fn departures_count(&self) -> u64 {
        self.times.run_pending_tasks().await;
        self.times.entry_count()
    }
}

impl DepartureSource for DepartureStore {
    async fn departures(&self, stop: &StopId) -> Result<Arc<Vec<RawDeparture>>, SourceError> {
        self.times
            .get(stop)
            .await
            .ok_or_else(|| SourceError::Missing(stop.clone()))
    }

    async fn route_meta(&self, stop: &StopId) -> Result<Arc<RouteMeta>, SourceError> {
        self.meta
            .get(stop)
            .await
            .ok_or_else(|| SourceError::Missing(stop.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::RouteColours;

    fn stop(s: &str) -> StopId {
        StopId::parse(s).unwrap()
    }

    fn departure(route: &str, stop_id: &StopId) -> RawDeparture {
        RawDeparture {
            route_name: route.into(),
            destination: "Hermitage".into(),
            departure_time_local: "10:00".into(),
            departure_time_unix: 1_700_000_000,
            stop_id: stop_id.clone(),
            is_real_time: true,
        }
    }

    #[test]
    fn default_config() {
        let config = StoreConfig::default();
        assert_eq!(config.times_ttl, Duration::from_secs(300));
        assert_eq!(config.meta_ttl, Duration::from_secs(172_800));
        assert_eq!(config.max_capacity, 1000);
    }

    #[tokio::test]
    async fn missing_stop_reads_as_missing() {
        let store = DepartureStore::new(&StoreConfig::default());
        let id = stop("6200204700");

        let err = store.departures(&id).await.unwrap_err();
        assert!(matches!(err, SourceError::Missing(s) if s == id));
        assert!(store.route_meta(&id).await.is_err());
    }

    #[tokio::test]
    async fn put_then_read() {
        let store = DepartureStore::new(&StoreConfig::default());
        let id = stop("6200204700");

        store
            .put_departures(id.clone(), vec![departure("19", &id), departure("24", &id)])
            .await;
        let mut meta = RouteMeta::new();
        meta.insert("19", RouteColours::new("#ce1f43", "#ffffff"));
        store.put_route_meta(id.clone(), meta).await;

        let departures = store.departures(&id).await.unwrap();
        assert_eq!(departures.len(), 2);
        assert_eq!(departures[0].route_name, "19");

        let meta = store.route_meta(&id).await.unwrap();
        assert!(meta.colours("19").is_some());
    }

    #[tokio::test]
    async fn put_replaces_previous_departures() {
        let store = DepartureStore::new(&StoreConfig::default());
        let id = stop("6200243375");

        store.put_departures(id.clone(), vec![departure("19", &id)]).await;
        store
            .put_departures(id.clone(), Vec::<RawDeparture>::new())
            .await;

        assert!(store.departures(&id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn expired_entries_read_as_missing() {
        let config = StoreConfig {
            times_ttl: Duration::from_millis(50),
            ..StoreConfig::default()
        };
        let store = DepartureStore::new(&config);
        let id = stop("6200243600");

        store.put_departures(id.clone(), vec![departure("23", &id)]).await;
        assert!(store.departures(&id).await.is_ok());

        tokio::time::sleep(Duration::from_millis(150)).await;
        assert!(store.departures(&id).await.is_err());
    }

    #[tokio::test]
    async fn departures_count_tracks_distinct_stops() {
        let store = DepartureStore::new(&StoreConfig::default());
        assert_eq!(store.departures_count().await, 0);

        let a = stop("6200243655");
        let b = stop("6200243600");
        store.put_departures(a.clone(), vec![departure("4", &a)]).await;
        store.put_departures(b.clone(), vec![departure("23", &b)]).await;
        store.put_departures(a.clone(), vec![departure("44", &a)]).await;

        assert_eq!(store.departures_count().await, 2);
    }
}
