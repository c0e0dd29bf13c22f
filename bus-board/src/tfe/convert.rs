//! Conversion from TfE DTOs to domain types.
//!
//! A departure missing a required field is dropped with a warning; the
//! rest of the stop is still used.

use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

use crate::domain::{RawDeparture, RouteColours, RouteMeta, StopId};

use super::types::{DepartureItem, StopResponse, StopTimesResponse};

/// Error converting a single upstream record.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConversionError {
    /// Missing required field
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    /// Stop id is not usable
    #[error("invalid stop id: {0}")]
    InvalidStopId(String),

    /// Departure timestamp is not a finite number
    #[error("invalid departure timestamp: {0}")]
    InvalidTimestamp(f64),

    /// Record does not have the expected shape (a field of the wrong type)
    #[error("malformed record: {0}")]
    Malformed(String),
}

/// Flatten a stop-times response into departures, service by service, in
/// upstream order.
pub fn convert_stop_times(resp: &StopTimesResponse) -> Vec<RawDeparture> {
    let stop = resp.stop.id.to_text();

    resp.services
        .iter()
        .flat_map(|service| service.departures.iter())
        .filter_map(|raw| {
            match decode_departure(raw).and_then(|item| convert_departure(&item)) {
                Ok(departure) => Some(departure),
                Err(e) => {
                    warn!(
                        stop = %stop,
                        route = raw.get("service_name").and_then(serde_json::Value::as_str).unwrap_or("?"),
                        error = %e,
                        "Dropping malformed departure"
                    );
                    None
                }
            }
        })
        .collect()
}

/// Decode one raw departure record.
pub fn decode_departure(raw: &Value) -> Result<DepartureItem, ConversionError> {
    DepartureItem::deserialize(raw).map_err(|e| ConversionError::Malformed(e.to_string()))
}

/// Convert a single departure record.
pub fn convert_departure(item: &DepartureItem) -> Result<RawDeparture, ConversionError> {
    let route_name = item
        .service_name
        .clone()
        .ok_or(ConversionError::MissingField("service_name"))?;

    let destination = item
        .destination
        .clone()
        .ok_or(ConversionError::MissingField("destination"))?;

    let departure_time_local = item
        .departure_time
        .clone()
        .ok_or(ConversionError::MissingField("departure_time"))?;

    let unix = item
        .departure_time_unix
        .ok_or(ConversionError::MissingField("departure_time_unix"))?;
    if !unix.is_finite() {
        return Err(ConversionError::InvalidTimestamp(unix));
    }

    let raw_stop = item
        .stop_id
        .as_ref()
        .ok_or(ConversionError::MissingField("stop_id"))?
        .to_text();
    let stop_id = StopId::parse(&raw_stop).map_err(|_| ConversionError::InvalidStopId(raw_stop))?;

    Ok(RawDeparture {
        route_name,
        destination,
        departure_time_local,
        departure_time_unix: unix as i64,
        stop_id,
        // Absent flag means no tracking data
        is_real_time: item.real_time.unwrap_or(false),
    })
}

/// Build the route colour mapping for a stop.
///
/// Routes without a name are skipped. Missing colours become empty strings.
pub fn convert_stop_routes(resp: &StopResponse) -> RouteMeta {
    resp.stop
        .services
        .iter()
        .filter_map(|route| {
            let Some(name) = route.name.clone() else {
                warn!(stop = %resp.stop.id.to_text(), "Skipping route without a name");
                return None;
            };
            let colours = RouteColours::new(
                route.color.clone().unwrap_or_default(),
                route.text_color.clone().unwrap_or_default(),
            );
            Some((name, colours))
        })
        .collect()
}
