//! Stop and route-type identifiers.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Numeric stop identifier as issued by the timetable API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StopId(pub u32);

impl fmt::Display for StopId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Transport mode code.
///
/// The planner only ever asks for trains, but stops and search filters carry
/// the raw code so other modes pass through untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RouteType(pub u8);

impl RouteType {
    pub const TRAIN: RouteType = RouteType(0);
    pub const TRAM: RouteType = RouteType(1);
    pub const BUS: RouteType = RouteType(2);
    pub const VLINE: RouteType = RouteType(3);
    pub const NIGHT_BUS: RouteType = RouteType(4);
}

impl fmt::Display for RouteType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A physical station.
///
/// Identity is the [`StopId`]; two stops with the same id are the same stop
/// regardless of how their names were spelled by different responses.
#[derive(Debug, Clone, Serialize)]
pub struct Stop {
    pub id: StopId,
    pub name: String,
    pub route_type: RouteType,
    pub suburb: Option<String>,
}

impl Stop {
    pub fn new(id: StopId, name: impl Into<String>, route_type: RouteType) -> Self {
        Self {
            id,
            name: name.into(),
            route_type,
            suburb: None,
        }
    }

    pub fn with_suburb(mut self, suburb: impl Into<String>) -> Self {
        self.suburb = Some(suburb.into());
        self
    }

    /// First word of the stop name, used where space is tight
    /// ("Flinders Street" → "Flinders").
    pub fn short_name(&self) -> &str {
        self.name.split(' ').next().unwrap_or(&self.name)
    }
}

impl PartialEq for Stop {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Stop {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equality_is_by_id() {
        let a = Stop::new(StopId(1071), "Flinders Street", RouteType::TRAIN);
        let b = Stop::new(StopId(1071), "Flinders St", RouteType::TRAIN).with_suburb("Melbourne");
        let c = Stop::new(StopId(1181), "Flinders Street", RouteType::TRAIN);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn short_name_takes_first_word() {
        let stop = Stop::new(StopId(1071), "Flinders Street", RouteType::TRAIN);
        assert_eq!(stop.short_name(), "Flinders");

        let single = Stop::new(StopId(1162), "Richmond", RouteType::TRAIN);
        assert_eq!(single.short_name(), "Richmond");
    }

    #[test]
    fn ids_serialize_transparently() {
        assert_eq!(serde_json::to_string(&StopId(1071)).unwrap(), "1071");
        assert_eq!(serde_json::to_string(&RouteType::VLINE).unwrap(), "3");
    }
}
