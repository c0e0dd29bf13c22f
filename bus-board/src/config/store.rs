//! Validated, read-only view over the static tables.

use std::collections::HashSet;
use std::path::Path;

use tracing::warn;

use crate::domain::StopId;

use super::error::ConfigError;
use super::tables::{LocationConfig, Tables};

/// Process-wide configuration lookups.
///
/// Built once at startup and shared by reference; nothing here changes
/// while requests are being served.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    tables: Tables,
}

impl ConfigStore {
    /// Validate the tables and build the store.
    ///
    /// Duplicate location names, locations without stops, and an empty
    /// anchor list are rejected. A route listed under more than one via
    /// rule, or a repeated ignore rule, is accepted (the first match
    /// wins) but logged.
    pub fn new(tables: Tables) -> Result<Self, ConfigError> {
        if tables.anchors.is_empty() {
            return Err(ConfigError::NoAnchors);
        }

        let mut names = HashSet::new();
        for location in &tables.locations {
            if !names.insert(location.name.as_str()) {
                return Err(ConfigError::DuplicateLocation(location.name.clone()));
            }
            if location.stops.is_empty() {
                return Err(ConfigError::EmptyLocation(location.name.clone()));
            }
        }

        let mut via_routes: HashSet<&str> = HashSet::new();
        for rule in &tables.via {
            let mut in_rule = HashSet::new();
            for route in &rule.routes {
                if in_rule.insert(route.as_str()) && !via_routes.insert(route.as_str()) {
                    warn!(
                        route = %route,
                        label = %rule.label,
                        "Route appears in more than one via rule; the first one wins"
                    );
                }
            }
        }

        let mut ignores = HashSet::new();
        for rule in &tables.ignore {
            if !ignores.insert(rule) {
                warn!(route = %rule.route, stop = %rule.stop, "Duplicate ignore rule");
            }
        }

        Ok(Self { tables })
    }

    /// Parse tables from JSON and validate them.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let tables: Tables = serde_json::from_str(json)?;
        Self::new(tables)
    }

    /// Load tables from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// The underlying tables.
    pub fn tables(&self) -> &Tables {
        &self.tables
    }

    /// Find a location by name.
    pub fn resolve_location(&self, name: &str) -> Option<&LocationConfig> {
        self.tables.locations.iter().find(|l| l.name == name)
    }

    /// Via label for a route, or `""` when no rule names it.
    pub fn resolve_via(&self, route_name: &str) -> &str {
        self.tables
            .via
            .iter()
            .find(|rule| rule.routes.iter().any(|r| r == route_name))
            .map(|rule| rule.label.as_str())
            .unwrap_or("")
    }

    /// Whether any ignore rule hides `route_name` at `stop`.
    pub fn is_ignored(&self, route_name: &str, stop: &StopId) -> bool {
        self.tables
            .ignore
            .iter()
            .any(|rule| rule.route == route_name && rule.stop.matches(stop))
    }

    /// Stops that define which routes are in scope.
    pub fn anchors(&self) -> &[StopId] {
        &self.tables.anchors
    }

    pub fn locations(&self) -> &[LocationConfig] {
        &self.tables.locations
    }

    /// Every distinct stop named by the anchors or any location, in
    /// first-seen order. This is the set ingestion has to keep fresh.
    pub fn stop_ids(&self) -> Vec<StopId> {
        let mut seen = HashSet::new();
        self.tables
            .anchors
            .iter()
            .chain(
                self.tables
                    .locations
                    .iter()
                    .flat_map(|l| l.stops.iter().map(|s| &s.stop.id)),
            )
            .filter(|id| seen.insert(*id))
            .cloned()
            .collect()
    }
}
