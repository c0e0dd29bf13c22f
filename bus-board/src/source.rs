//! Read-only, stop-keyed access to departure data.

use std::future::Future;
use std::sync::Arc;

use crate::domain::{RawDeparture, RouteMeta, StopId};

/// Why a stop's data could not be obtained.
///
/// The engine never propagates these: a stop that fails simply contributes
/// nothing to the board.
#[derive(Debug, Clone, thiserror::Error)]
pub enum SourceError {
    /// No data is held for the stop (never ingested, or expired)
    #[error("no data for stop {0}")]
    Missing(StopId),

    /// The upstream request failed
    #[error("upstream unavailable for stop {stop}: {message}")]
    Upstream { stop: StopId, message: String },

    /// The fetch did not finish within the per-fetch timeout
    #[error("timed out fetching stop {0}")]
    Timeout(StopId),
}

/// Supplies departures and route colours for a stop.
///
/// Implemented by the live TfE client and by the ingested departure store,
/// so the engine can run against either (or a fixture in tests).
pub trait DepartureSource: Sync {
    /// Current departures at a stop, in upstream order.
    fn departures(
        &self,
        stop: &StopId,
    ) -> impl Future<Output = Result<Arc<Vec<RawDeparture>>, SourceError>> + Send;

    /// Route colours for the routes serving a stop.
    fn route_meta(
        &self,
        stop: &StopId,
    ) -> impl Future<Output = Result<Arc<RouteMeta>, SourceError>> + Send;
}
