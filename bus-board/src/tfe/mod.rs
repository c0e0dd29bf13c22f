//! Transport for Edinburgh (TfE) API client.
//!
//! Two endpoints are used:
//! - `stop_times.php` lists upcoming departures at a stop, grouped by
//!   service, with a real-time flag per departure
//! - `stop.php` describes a stop, including the colours of every route
//!   that serves it
//!
//! Stop ids come back as strings or integers depending on the endpoint.

mod client;
mod convert;
mod error;
mod types;

pub use client::{TfeClient, TfeConfig};
pub use convert::{
    ConversionError, convert_departure, convert_stop_routes, convert_stop_times, decode_departure,
};
pub use error::TfeError;
pub use types::{
    DepartureItem, RouteItem, ServiceTimes, StopDetails, StopHeader, StopResponse,
    StopTimesResponse, UpstreamId,
};
