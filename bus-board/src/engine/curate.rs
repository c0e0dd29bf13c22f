//! Turns an accepted departure into a display-ready entry.

use crate::config::{ConfigStore, LocationConfig};
use crate::domain::{CuratedEntry, RawDeparture, RouteMeta, TimeStatus, Urgency};

/// Minutes the viewer can wait before setting off, net of walking time.
///
/// Floors the wait to whole minutes before subtracting the walk, so a bus
/// 59 seconds away with a 0 minute walk gives 0.
pub fn minutes_until_leave(departure_unix: i64, now: i64, walk_time_mins: u32) -> i64 {
    (departure_unix - now).div_euclid(60) - i64::from(walk_time_mins)
}

/// Enriches departures for one location.
#[derive(Debug, Clone, Copy)]
pub struct Curator<'a> {
    config: &'a ConfigStore,
    location: &'a LocationConfig,
    now: i64,
}

impl<'a> Curator<'a> {
    pub fn new(config: &'a ConfigStore, location: &'a LocationConfig, now: i64) -> Self {
        Self {
            config,
            location,
            now,
        }
    }

    /// Build the entry for a departure from a stop with the given walk time.
    ///
    /// Colours missing from `meta` are left empty. Via labels are only
    /// resolved at the default location.
    pub fn curate(
        &self,
        departure: &RawDeparture,
        meta: &RouteMeta,
        walk_time_mins: u32,
    ) -> CuratedEntry {
        let (background_color, text_color) = meta
            .colours(&departure.route_name)
            .map(|c| (c.background.clone(), c.text.clone()))
            .unwrap_or_default();

        let via_label = if self.location.is_default() {
            self.config.resolve_via(&departure.route_name).to_string()
        } else {
            String::new()
        };

        let minutes = minutes_until_leave(departure.departure_time_unix, self.now, walk_time_mins);

        CuratedEntry {
            route_name: departure.route_name.clone(),
            destination: departure.destination.clone(),
            departure_time_local: departure.departure_time_local.clone(),
            departure_time_unix: departure.departure_time_unix,
            stop_id: departure.stop_id.clone(),
            background_color,
            text_color,
            via_label,
            time_status: TimeStatus::from_real_time(departure.is_real_time),
            minutes_until_leave: minutes,
            urgency: Urgency::from_minutes(minutes),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::edinburgh;
    use crate::domain::{RouteColours, StopId};

    const NOW: i64 = 1_672_696_000;

    fn departure(route: &str, unix: i64, real_time: bool) -> RawDeparture {
        RawDeparture {
            route_name: route.into(),
            destination: "Leith Street".into(),
            departure_time_local: "21:50".into(),
            departure_time_unix: unix,
            stop_id: StopId::parse("6200204700").unwrap(),
            is_real_time: real_time,
        }
    }

    fn meta() -> RouteMeta {
        let mut meta = RouteMeta::new();
        meta.insert("19", RouteColours::new("#ce1f43", "#ffffff"));
        meta
    }

    #[test]
    fn minutes_floor_then_subtract_walk() {
        assert_eq!(minutes_until_leave(NOW + 600, NOW, 5), 5);
        assert_eq!(minutes_until_leave(NOW + 659, NOW, 5), 5);
        assert_eq!(minutes_until_leave(NOW + 59, NOW, 0), 0);
        assert_eq!(minutes_until_leave(NOW + 120, NOW, 10), -8);
        assert_eq!(minutes_until_leave(NOW, NOW, 0), 0);
    }

    #[test]
    fn copies_fields_and_resolves_colours() {
        let config = ConfigStore::new(edinburgh()).unwrap();
        let location = config.resolve_location("waverley").unwrap();
        let curator = Curator::new(&config, location, NOW);

        let entry = curator.curate(&departure("19", NOW + 900, true), &meta(), 5);

        assert_eq!(entry.route_name, "19");
        assert_eq!(entry.destination, "Leith Street");
        assert_eq!(entry.departure_time_local, "21:50");
        assert_eq!(entry.departure_time_unix, NOW + 900);
        assert_eq!(entry.stop_id.as_str(), "6200204700");
        assert_eq!(entry.background_color, "#ce1f43");
        assert_eq!(entry.text_color, "#ffffff");
        assert_eq!(entry.time_status, TimeStatus::Live);
        assert_eq!(entry.minutes_until_leave, 10);
        assert_eq!(entry.urgency, Urgency::LeaveIn);
    }

    #[test]
    fn missing_colours_stay_empty() {
        let config = ConfigStore::new(edinburgh()).unwrap();
        let location = config.resolve_location("boots").unwrap();
        let curator = Curator::new(&config, location, NOW);

        let entry = curator.curate(&departure("24", NOW + 900, false), &meta(), 5);

        assert_eq!(entry.background_color, "");
        assert_eq!(entry.text_color, "");
        assert_eq!(entry.time_status, TimeStatus::Scheduled);
    }

    #[test]
    fn via_label_only_at_default_location() {
        let config = ConfigStore::new(edinburgh()).unwrap();
        let dep = departure("19", NOW + 900, true);

        let default = config.resolve_location("default").unwrap();
        let entry = Curator::new(&config, default, NOW).curate(&dep, &meta(), 10);
        assert_eq!(entry.via_label, "via Dean Bridge & Waverley");

        let hanover = config.resolve_location("hanover").unwrap();
        let entry = Curator::new(&config, hanover, NOW).curate(&dep, &meta(), 5);
        assert_eq!(entry.via_label, "");
    }

    #[test]
    fn default_location_route_without_rule_has_empty_via() {
        let config = ConfigStore::new(edinburgh()).unwrap();
        let default = config.resolve_location("default").unwrap();

        let entry = Curator::new(&config, default, NOW).curate(
            &departure("41", NOW + 900, true),
            &meta(),
            10,
        );
        assert_eq!(entry.via_label, "");
    }

    #[test]
    fn make_up_when_walk_exceeds_wait() {
        let config = ConfigStore::new(edinburgh()).unwrap();
        let default = config.resolve_location("default").unwrap();

        let entry =
            Curator::new(&config, default, NOW).curate(&departure("19", NOW + 180, true), &meta(), 10);
        assert_eq!(entry.minutes_until_leave, -7);
        assert_eq!(entry.urgency, Urgency::MakeUp);
    }
}
