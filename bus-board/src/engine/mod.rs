//! Departure curation engine.
//!
//! Answers: "which buses from this location's stops are worth showing,
//! and how long until I need to leave for each?"
//!
//! One pass works like this:
//! 1. collect every route seen at the anchor stops (the valid services)
//! 2. fetch departures and route colours for each of the location's stops
//! 3. walk the stops in configured order, keeping the first acceptable
//!    departure of each route and curating it for display
//! 4. sort the survivors by departure time

mod aggregate;
mod clock;
mod config;
mod curate;
mod error;
mod validity;


pub use aggregate::{DepartureBoard, SlotData, merge_slots, with_timeout};
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::EngineConfig;
pub use curate::{Curator, minutes_until_leave};
pub use error::BoardError;
pub use validity::{
    Rejection, SurfacedRoutes, ValidServices, ValidityContext, evaluate,
};
