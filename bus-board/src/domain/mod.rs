//! Domain types for the bus departure board.
//!
//! Raw departures and route colours come in from a departure source;
//! curated entries go out to whatever displays the board. Identifiers
//! enforce their invariants at construction time.

mod curated;
mod departure;
mod stop;

pub use curated::{CuratedEntry, TimeStatus, Urgency};
pub use departure::{RawDeparture, RouteColours, RouteMeta};
pub use stop::{InvalidStopId, StopId};
