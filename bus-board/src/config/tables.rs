//! Static configuration tables.
//!
//! These are plain serde types so the tables can come from the built-in
//! defaults or a JSON file. `ConfigStore` validates and indexes them.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::{InvalidStopId, StopId};

/// Name of the location shown when none is requested. Via labels are only
/// resolved here.
pub const DEFAULT_LOCATION: &str = "default";

/// A physical stop and how long it takes to walk there.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StopConfig {
    pub id: StopId,
    pub walk_time_mins: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub friendly_name: Option<String>,
}

/// One labelled stop within a location. Slot order is display-significant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StopSlot {
    pub label: String,
    #[serde(flatten)]
    pub stop: StopConfig,
}

/// A named viewing location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationConfig {
    pub name: String,
    pub stops: Vec<StopSlot>,
}

impl LocationConfig {
    pub fn is_default(&self) -> bool {
        self.name == DEFAULT_LOCATION
    }
}

/// Display label for a group of routes, e.g. "via Stockbridge & Waverley".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViaRule {
    pub label: String,
    pub routes: Vec<String>,
}

/// Which stops an ignore rule applies to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum StopScope {
    /// Written `*` in config files.
    Any,
    Stop(StopId),
}

impl StopScope {
    pub fn matches(&self, stop: &StopId) -> bool {
        match self {
            StopScope::Any => true,
            StopScope::Stop(id) => id == stop,
        }
    }
}

impl TryFrom<String> for StopScope {
    type Error = InvalidStopId;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        if value == "*" {
            Ok(StopScope::Any)
        } else {
            StopId::parse(&value).map(StopScope::Stop)
        }
    }
}

impl From<StopScope> for String {
    fn from(scope: StopScope) -> Self {
        scope.to_string()
    }
}

impl fmt::Display for StopScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StopScope::Any => f.write_str("*"),
            StopScope::Stop(id) => write!(f, "{id}"),
        }
    }
}

/// A route that must never be shown, at one stop or everywhere.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IgnoreRule {
    pub route: String,
    pub stop: StopScope,
}

/// Every static table the engine consults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tables {
    /// Stops whose current routes define which services are in scope.
    pub anchors: Vec<StopId>,
    pub locations: Vec<LocationConfig>,
    #[serde(default)]
    pub via: Vec<ViaRule>,
    #[serde(default)]
    pub ignore: Vec<IgnoreRule>,
}
