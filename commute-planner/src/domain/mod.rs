//! Domain types for the commute planner.
//!
//! These types are the validated form of timetable data. API DTOs are
//! converted into them at the data-source boundary, so the rest of the
//! planner never deals with raw strings for ids or timestamps.

mod departure;
mod stop;
pub mod time;

pub use departure::{Departure, DeparturesResult, Direction, DirectionId, RouteId, Run, RunId};
pub use stop::{RouteType, Stop, StopId};
pub use time::{TimeError, TimeOfDay, TimeUntil};
