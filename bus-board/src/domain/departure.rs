//! Raw per-stop departure data as supplied by a departure source.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::StopId;

/// One physical vehicle arrival at a stop.
///
/// Several departures may share a route name (successive buses on the
/// same route).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawDeparture {
    pub route_name: String,
    pub destination: String,
    /// Local wall-clock departure time as the upstream shows it, e.g. "21:50".
    pub departure_time_local: String,
    pub departure_time_unix: i64,
    pub stop_id: StopId,
    pub is_real_time: bool,
}

/// Display colours for a route.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteColours {
    pub background: String,
    pub text: String,
}

impl RouteColours {
    pub fn new(background: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            background: background.into(),
            text: text.into(),
        }
    }
}

/// Route name → colours for the routes serving one stop.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteMeta {
    colours: HashMap<String, RouteColours>,
}

impl RouteMeta {
    /// Create an empty mapping.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert colours for a route, replacing any previous entry.
    pub fn insert(&mut self, route_name: impl Into<String>, colours: RouteColours) {
        self.colours.insert(route_name.into(), colours);
    }

    /// Look up the colours for a route.
    pub fn colours(&self, route_name: &str) -> Option<&RouteColours> {
        self.colours.get(route_name)
    }

    pub fn len(&self) -> usize {
        self.colours.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colours.is_empty()
    }
}

impl FromIterator<(String, RouteColours)> for RouteMeta {
    fn from_iter<I: IntoIterator<Item = (String, RouteColours)>>(iter: I) -> Self {
        Self {
            colours: iter.into_iter().collect(),
        }
    }
}
