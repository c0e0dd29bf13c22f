//! Display-ready departure records produced by the curation engine.

use std::fmt;

use serde::Serialize;

use super::StopId;

/// Whether a departure time comes from live tracking or the timetable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TimeStatus {
    Live,
    Scheduled,
}

impl TimeStatus {
    pub fn from_real_time(is_real_time: bool) -> Self {
        if is_real_time {
            TimeStatus::Live
        } else {
            TimeStatus::Scheduled
        }
    }

    /// Label shown on the board.
    pub fn label(self) -> &'static str {
        match self {
            TimeStatus::Live => "Live",
            TimeStatus::Scheduled => "Schedule",
        }
    }
}

/// Whether the viewer has time in hand or must hurry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Urgency {
    /// Already effectively late: the walk takes longer than the wait.
    MakeUp,
    LeaveIn,
}

impl Urgency {
    pub fn from_minutes(minutes_until_leave: i64) -> Self {
        if minutes_until_leave < 0 {
            Urgency::MakeUp
        } else {
            Urgency::LeaveIn
        }
    }

    /// Label shown on the board.
    pub fn label(self) -> &'static str {
        match self {
            Urgency::MakeUp => "Make up",
            Urgency::LeaveIn => "Leave in",
        }
    }
}

/// One finalized departure for a location's board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CuratedEntry {
    pub route_name: String,
    pub destination: String,
    pub departure_time_local: String,
    pub departure_time_unix: i64,
    pub stop_id: StopId,
    /// Empty when the stop's route metadata has no entry for this route.
    pub background_color: String,
    pub text_color: String,
    /// Empty except at the default location.
    pub via_label: String,
    pub time_status: TimeStatus,
    /// Minutes the viewer can wait before leaving, net of walking time.
    pub minutes_until_leave: i64,
    pub urgency: Urgency,
}

impl fmt::Display for CuratedEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:<5} {:<24} {} ({:<8}) {} {} min",
            self.route_name,
            self.destination,
            self.departure_time_local,
            self.time_status.label(),
            self.urgency.label(),
            self.minutes_until_leave.abs(),
        )?;
        if !self.via_label.is_empty() {
            write!(f, "  {}", self.via_label)?;
        }
        Ok(())
    }
}
