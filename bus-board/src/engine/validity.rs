//! Decides whether a raw departure belongs on the board.

use std::collections::HashSet;
use std::fmt;

use crate::config::ConfigStore;
use crate::domain::RawDeparture;

/// Route names currently seen at any anchor stop.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidServices(HashSet<String>);

impl ValidServices {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, route_name: impl Into<String>) {
        self.0.insert(route_name.into());
    }

    pub fn contains(&self, route_name: &str) -> bool {
        self.0.contains(route_name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for ValidServices {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

/// Routes already placed on the board during the current pass.
///
/// Threaded through the merge in slot order so the first qualifying
/// departure of each route wins.
#[derive(Debug, Clone, Default)]
pub struct SurfacedRoutes(HashSet<String>);

impl SurfacedRoutes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, route_name: &str) -> bool {
        self.0.contains(route_name)
    }

    pub fn mark(&mut self, route_name: &str) {
        self.0.insert(route_name.to_string());
    }
}

/// Why a departure was left off the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// Route does not currently serve any anchor stop
    OutOfScope,
    /// An ignore rule matches the route at this stop
    Ignored,
    /// An earlier departure of the same route is already on the board
    AlreadySurfaced,
    /// Departure time is before now
    Departed,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            Rejection::OutOfScope => "route not seen at any anchor",
            Rejection::Ignored => "route ignored at this stop",
            Rejection::AlreadySurfaced => "route already on the board",
            Rejection::Departed => "already departed",
        };
        f.write_str(reason)
    }
}

/// Per-pass inputs that do not change between departures.
#[derive(Debug, Clone, Copy)]
pub struct ValidityContext<'a> {
    pub valid_services: &'a ValidServices,
    pub config: &'a ConfigStore,
    pub now: i64,
}

/// Accept a departure iff its route is in scope, not ignored at its stop,
/// not yet surfaced in this pass, and it has not left yet. A departure at
/// exactly `now` is accepted.
pub fn evaluate(
    departure: &RawDeparture,
    ctx: &ValidityContext<'_>,
    surfaced: &SurfacedRoutes,
) -> Result<(), Rejection> {
    let route = departure.route_name.as_str();

    if !ctx.valid_services.contains(route) {
        return Err(Rejection::OutOfScope);
    }
    if ctx.config.is_ignored(route, &departure.stop_id) {
        return Err(Rejection::Ignored);
    }
    if surfaced.contains(route) {
        return Err(Rejection::AlreadySurfaced);
    }
    if departure.departure_time_unix < ctx.now {
        return Err(Rejection::Departed);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::edinburgh;
    use crate::domain::StopId;

    const NOW: i64 = 1_672_696_000;

    fn departure(route: &str, stop: &str, unix: i64) -> RawDeparture {
        RawDeparture {
            route_name: route.into(),
            destination: "Somewhere".into(),
            departure_time_local: "21:50".into(),
            departure_time_unix: unix,
            stop_id: StopId::parse(stop).unwrap(),
            is_real_time: false,
        }
    }

    fn check(dep: &RawDeparture, surfaced: &SurfacedRoutes) -> Result<(), Rejection> {
        let config = ConfigStore::new(edinburgh()).unwrap();
        let valid: ValidServices = ["19", "24", "38", "104"].into_iter().collect();
        let ctx = ValidityContext {
            valid_services: &valid,
            config: &config,
            now: NOW,
        };
        evaluate(dep, &ctx, surfaced)
    }

    #[test]
    fn accepts_future_in_scope_departure() {
        let dep = departure("19", "6200204700", NOW + 300);
        assert_eq!(check(&dep, &SurfacedRoutes::new()), Ok(()));
    }

    #[test]
    fn rejects_out_of_scope_route() {
        let dep = departure("41", "6200204700", NOW + 300);
        assert_eq!(
            check(&dep, &SurfacedRoutes::new()),
            Err(Rejection::OutOfScope)
        );
    }

    #[test]
    fn rejects_route_ignored_at_its_stop_only() {
        let at_ignored_stop = departure("38", "6200204380", NOW + 300);
        assert_eq!(
            check(&at_ignored_stop, &SurfacedRoutes::new()),
            Err(Rejection::Ignored)
        );

        let elsewhere = departure("38", "6200245540", NOW + 300);
        assert_eq!(check(&elsewhere, &SurfacedRoutes::new()), Ok(()));
    }

    #[test]
    fn rejects_wildcard_ignored_route_everywhere() {
        for stop in ["6200204700", "6200204380", "6200243600"] {
            let dep = departure("104", stop, NOW + 300);
            assert_eq!(
                check(&dep, &SurfacedRoutes::new()),
                Err(Rejection::Ignored)
            );
        }
    }

    #[test]
    fn rejects_already_surfaced_route() {
        let mut surfaced = SurfacedRoutes::new();
        surfaced.mark("24");

        let dep = departure("24", "6200204700", NOW + 300);
        assert_eq!(check(&dep, &surfaced), Err(Rejection::AlreadySurfaced));
    }

    #[test]
    fn departure_at_now_is_accepted() {
        let dep = departure("19", "6200204700", NOW);
        assert_eq!(check(&dep, &SurfacedRoutes::new()), Ok(()));
    }

    #[test]
    fn departure_one_second_ago_is_rejected() {
        let dep = departure("19", "6200204700", NOW - 1);
        assert_eq!(
            check(&dep, &SurfacedRoutes::new()),
            Err(Rejection::Departed)
        );
    }

    #[test]
    fn valid_services_collects_distinct_names() {
        let valid: ValidServices = ["19", "19", "24"].into_iter().collect();
        assert_eq!(valid.len(), 2);
        assert!(valid.contains("24"));
        assert!(!ValidServices::new().contains("24"));
    }

    #[test]
    fn rejection_display() {
        assert_eq!(Rejection::Departed.to_string(), "already departed");
        assert_eq!(
            Rejection::OutOfScope.to_string(),
            "route not seen at any anchor"
        );
    }
}
