//! Built-in tables for the Craigleith / city centre deployment.

use crate::domain::StopId;

use super::tables::{
    DEFAULT_LOCATION, IgnoreRule, LocationConfig, StopConfig, StopScope, StopSlot, Tables, ViaRule,
};

/// The tables the board ships with.
pub fn edinburgh() -> Tables {
    Tables {
        anchors: ["6200204700", "6200245540", "6200245600"]
            .into_iter()
            .map(stop_id)
            .collect(),
        locations: vec![
            location(
                DEFAULT_LOCATION,
                &[
                    ("stop1", "6200204700", 10, "Crewe Road Cemetery"),
                    ("stop2", "6200204380", 5, "Craigleith Hill Road North Side"),
                    ("stop3", "6200245540", 5, "Craigleith Hill Road South Side"),
                ],
            ),
            location(
                "waverley",
                &[("stop1", "6200243375", 5, "Princes St Waverley Steps")],
            ),
            location("boots", &[("stop1", "6200243655", 5, "Princes St Boots")]),
            location("hanover", &[("stop1", "6200243600", 5, "Hanover St")]),
        ],
        via: vec![
            via("via Dean Bridge & Waverley", &["19", "37", "113", "N37"]),
            via("via Stockbridge & Fountainbridge", &["24"]),
            via("via Stockbridge & Waverley", &["29", "X29"]),
            via("via Retail Park & Murrayfield", &["38"]),
            via("via Dean Bridge & Fountainbridge", &["47", "X47", "22"]),
        ],
        ignore: vec![
            IgnoreRule {
                route: "38".into(),
                stop: StopScope::Stop(stop_id("6200204380")),
            },
            IgnoreRule {
                route: "104".into(),
                stop: StopScope::Any,
            },
        ],
    }
}

fn stop_id(s: &str) -> StopId {
    // Literals above are all digits.
    StopId::parse(s).unwrap_or_else(|e| unreachable!("built-in stop id: {e}"))
}

fn location(name: &str, slots: &[(&str, &str, u32, &str)]) -> LocationConfig {
    LocationConfig {
        name: name.to_string(),
        stops: slots
            .iter()
            .map(|(label, id, walk, friendly)| StopSlot {
                label: (*label).to_string(),
                stop: StopConfig {
                    id: stop_id(id),
                    walk_time_mins: *walk,
                    friendly_name: Some((*friendly).to_string()),
                },
            })
            .collect(),
    }
}

fn via(label: &str, routes: &[&str]) -> ViaRule {
    ViaRule {
        label: label.to_string(),
        routes: routes.iter().map(|r| (*r).to_string()).collect(),
    }
}
