//! TfE API response DTOs.
//!
//! These map directly onto the `stop_times.php` and `stop.php` JSON
//! responses. Departures stay as raw JSON until conversion, and their
//! fields are `Option`, so one bad departure can be dropped without losing
//! the rest of the stop.

use serde::Deserialize;

/// Identifier that upstream sends as either a string or a number.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum UpstreamId {
    Text(String),
    Number(u64),
}

impl UpstreamId {
    pub fn to_text(&self) -> String {
        match self {
            UpstreamId::Text(s) => s.clone(),
            UpstreamId::Number(n) => n.to_string(),
        }
    }
}

/// Response from `stop_times.php?stop_id=`.
#[derive(Debug, Clone, Deserialize)]
pub struct StopTimesResponse {
    pub stop: StopHeader,

    /// Services calling at the stop, each with its upcoming departures.
    #[serde(default)]
    pub services: Vec<ServiceTimes>,
}

/// Minimal stop identification block.
#[derive(Debug, Clone, Deserialize)]
pub struct StopHeader {
    pub id: UpstreamId,
    pub name: Option<String>,
}

/// One route's departures at a stop.
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceTimes {
    pub service_name: Option<String>,
    /// Each element decodes to a [`DepartureItem`] during conversion.
    #[serde(default)]
    pub departures: Vec<serde_json::Value>,
}

/// A single upcoming departure.
#[derive(Debug, Clone, Deserialize)]
pub struct DepartureItem {
    pub service_name: Option<String>,
    pub destination: Option<String>,

    /// Local time, "HH:MM".
    pub departure_time: Option<String>,

    /// Seconds since the epoch. Upstream occasionally sends a decimal.
    pub departure_time_unix: Option<f64>,

    /// The physical stop the vehicle calls at.
    pub stop_id: Option<UpstreamId>,

    /// Whether the time comes from vehicle tracking.
    pub real_time: Option<bool>,

    /// Parsed for completeness; not shown on the board.
    pub diverted: Option<bool>,
}

/// Response from `stop.php?id=`.
#[derive(Debug, Clone, Deserialize)]
pub struct StopResponse {
    pub stop: StopDetails,
}

/// Stop details, including the routes that serve it.
#[derive(Debug, Clone, Deserialize)]
pub struct StopDetails {
    pub id: UpstreamId,
    pub name: Option<String>,
    #[serde(default)]
    pub services: Vec<RouteItem>,
}

/// Display information for a route.
#[derive(Debug, Clone, Deserialize)]
pub struct RouteItem {
    pub name: Option<String>,
    pub color: Option<String>,
    pub text_color: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_stop_times() {
        let json = r#"{
            "stop": {"id": 6200204700, "name": "Crewe Road Cemetery"},
            "services": [{
                "service_name": "19",
                "departures": [{
                    "occupancy_rate": null,
                    "diverted": false,
                    "service_name": "19",
                    "minutes": 7,
                    "stop_id": "36232869",
                    "real_time": true,
                    "destination": "Leith Street",
                    "journey_id": "4005",
                    "departure_time": "21:50",
                    "vehicle_id": "638",
                    "departure_time_unix": 1672696231,
                    "departure_time_iso": "2023-01-02T21:50:31+00:00"
                }]
            }]
        }"#;

        let resp: StopTimesResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.stop.id, UpstreamId::Number(6200204700));
        assert_eq!(resp.services.len(), 1);

        let dep: DepartureItem =
            serde_json::from_value(resp.services[0].departures[0].clone()).unwrap();
        assert_eq!(dep.service_name.as_deref(), Some("19"));
        assert_eq!(dep.stop_id, Some(UpstreamId::Text("36232869".into())));
        assert_eq!(dep.departure_time_unix, Some(1_672_696_231.0));
        assert_eq!(dep.real_time, Some(true));
        assert_eq!(dep.diverted, Some(false));
    }

    #[test]
    fn parse_stop_times_without_services() {
        let json = r#"{"stop": {"id": "6200243600"}}"#;
        let resp: StopTimesResponse = serde_json::from_str(json).unwrap();
        assert!(resp.services.is_empty());
        assert_eq!(resp.stop.id.to_text(), "6200243600");
    }

    #[test]
    fn parse_stop_routes() {
        let json = r##"{
            "stop": {
                "id": "6200243375",
                "name": "Princes St Waverley Steps",
                "services": [
                    {"name": "19", "color": "#ce1f43", "text_color": "#ffffff"},
                    {"name": "N37"}
                ]
            }
        }"##;

        let resp: StopResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.stop.services.len(), 2);
        assert_eq!(resp.stop.services[0].color.as_deref(), Some("#ce1f43"));
        assert_eq!(resp.stop.services[1].text_color, None);
    }

    #[test]
    fn upstream_id_to_text() {
        assert_eq!(UpstreamId::Number(42).to_text(), "42");
        assert_eq!(UpstreamId::Text("A7".into()).to_text(), "A7");
    }
}
