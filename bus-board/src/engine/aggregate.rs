//! Merges every stop of a location into one ranked board.
//!
//! Fetches run concurrently, one per stop. The merge that decides which
//! departures survive runs afterwards, sequentially, in configured slot
//! order, so deduplication never depends on which fetch finished first.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use tracing::{debug, trace, warn};

use crate::config::{ConfigStore, LocationConfig};
use crate::domain::{CuratedEntry, RawDeparture, RouteMeta, StopId};
use crate::source::{DepartureSource, SourceError};

use super::clock::Clock;
use super::config::EngineConfig;
use super::curate::Curator;
use super::error::BoardError;
use super::validity::{SurfacedRoutes, ValidServices, ValidityContext, evaluate};

/// Everything fetched for one stop slot.
#[derive(Debug, Clone, Default)]
pub struct SlotData {
    pub departures: Arc<Vec<RawDeparture>>,
    pub meta: Arc<RouteMeta>,
}

/// Builds departure boards from a source and the static tables.
pub struct DepartureBoard<'a, S, C> {
    config: &'a ConfigStore,
    source: &'a S,
    clock: &'a C,
    settings: &'a EngineConfig,
}

impl<'a, S: DepartureSource, C: Clock> DepartureBoard<'a, S, C> {
    pub fn new(
        config: &'a ConfigStore,
        source: &'a S,
        clock: &'a C,
        settings: &'a EngineConfig,
    ) -> Self {
        Self {
            config,
            source,
            clock,
            settings,
        }
    }

    /// Every route currently departing from any anchor stop.
    ///
    /// Anchors that fail or time out contribute nothing. The result does
    /// not depend on the location, so one set can serve every board built
    /// in the same cycle.
    pub async fn valid_services(&self) -> ValidServices {
        let fetches = self.config.anchors().iter().map(|stop| async move {
            let result = self.fetch(stop, self.source.departures(stop)).await;
            (stop, result)
        });

        let mut valid = ValidServices::new();
        for (stop, result) in join_all(fetches).await {
            match result {
                Ok(departures) => {
                    for departure in departures.iter() {
                        valid.insert(departure.route_name.as_str());
                    }
                }
                Err(e) => {
                    warn!(stop = %stop, error = %e, "Anchor unavailable, contributing no routes");
                }
            }
        }

        debug!(routes = valid.len(), "Computed valid services");
        valid
    }

    /// Curated board for a location, using a precomputed valid service set.
    pub async fn curate(
        &self,
        location_name: &str,
        valid: &ValidServices,
    ) -> Result<Vec<CuratedEntry>, BoardError> {
        let location = self
            .config
            .resolve_location(location_name)
            .ok_or_else(|| BoardError::UnknownLocation(location_name.to_string()))?;

        let slots = join_all(location.stops.iter().map(|slot| self.fetch_slot(&slot.stop.id))).await;

        let now = self.clock.now_unix();
        let entries = merge_slots(self.config, location, &slots, valid, now);

        debug!(
            location = %location.name,
            stops = slots.len(),
            entries = entries.len(),
            "Curated board"
        );
        Ok(entries)
    }

    /// Compute the valid service set, then curate one location.
    pub async fn board(&self, location_name: &str) -> Result<Vec<CuratedEntry>, BoardError> {
        // Resolve first so an unknown name costs no anchor fetches.
        if self.config.resolve_location(location_name).is_none() {
            return Err(BoardError::UnknownLocation(location_name.to_string()));
        }
        let valid = self.valid_services().await;
        self.curate(location_name, &valid).await
    }

    /// Fetch departures and route colours for one stop. Either half that
    /// fails is replaced by an empty value.
    async fn fetch_slot(&self, stop: &StopId) -> SlotData {
        let (departures, meta) = tokio::join!(
            self.fetch(stop, self.source.departures(stop)),
            self.fetch(stop, self.source.route_meta(stop)),
        );

        let departures = departures.unwrap_or_else(|e| {
            warn!(stop = %stop, error = %e, "Departures unavailable, stop contributes nothing");
            Arc::default()
        });
        let meta = meta.unwrap_or_else(|e| {
            warn!(stop = %stop, error = %e, "Route colours unavailable");
            Arc::default()
        });

        SlotData { departures, meta }
    }

    async fn fetch<T>(
        &self,
        stop: &StopId,
        fut: impl Future<Output = Result<T, SourceError>>,
    ) -> Result<T, SourceError> {
        with_timeout(stop, self.settings.fetch_timeout, fut).await
    }
}

/// Bound a fetch, turning an elapsed deadline into `SourceError::Timeout`.
pub async fn with_timeout<T>(
    stop: &StopId,
    limit: Duration,
    fut: impl Future<Output = Result<T, SourceError>>,
) -> Result<T, SourceError> {
    tokio::time::timeout(limit, fut)
        .await
        .unwrap_or_else(|_| Err(SourceError::Timeout(stop.clone())))
}

/// Validate, curate and rank the fetched slots of a location.
///
/// `slots[i]` holds the data for `location.stops[i]`. Departures are
/// visited in slot order, then upstream order within a slot; the first
/// accepted departure of each route is the one kept. The result is
/// stable-sorted by departure time.
pub fn merge_slots(
    config: &ConfigStore,
    location: &LocationConfig,
    slots: &[SlotData],
    valid: &ValidServices,
    now: i64,
) -> Vec<CuratedEntry> {
    let ctx = ValidityContext {
        valid_services: valid,
        config,
        now,
    };
    let curator = Curator::new(config, location, now);

    let (mut entries, _surfaced) = location.stops.iter().zip(slots).fold(
        (Vec::new(), SurfacedRoutes::new()),
        |(mut entries, mut surfaced), (slot, data)| {
            for departure in data.departures.iter() {
                match evaluate(departure, &ctx, &surfaced) {
                    Ok(()) => {
                        entries.push(curator.curate(departure, &data.meta, slot.stop.walk_time_mins));
                        surfaced.mark(&departure.route_name);
                    }
                    Err(reason) => {
                        trace!(
                            stop = %slot.stop.id,
                            route = %departure.route_name,
                            departure = departure.departure_time_unix,
                            %reason,
                            "Departure rejected"
                        );
                    }
                }
            }
            (entries, surfaced)
        },
    );

    // Vec::sort_by_key is stable: ties keep merge order.
    entries.sort_by_key(|e| e.departure_time_unix);
    entries
}
