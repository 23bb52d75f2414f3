//! Interactive commute planning state.
//!
//! Pure state machines: nothing in here performs I/O or reads the clock.
//! [`crate::session::Session`] drives them against a data source.

mod notice;
mod plan;
mod route;
mod station_search;
pub mod view;

pub use notice::{Notice, RouteError, Severity};
pub use plan::CommutePlan;
pub use route::{Commute, DeparturesQuery, DeparturesToken, PickerMode, RouteSelector, StationRole};
pub use station_search::{SearchPhase, SearchRequest, SearchToken, StationSearch};
pub use view::{PlanView, RoutePanelView, StationView};
