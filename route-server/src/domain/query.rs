//! Resolved route queries, one variant per travel mode.

use std::fmt;

use chrono::NaiveDateTime;

use super::coordinates::Coordinates;
use super::options::{
    Avoid, BicyclePriority, CarFuel, CarType, DestinationPriority, PredictionType, Priority,
    RoadEvent, TransitPriority,
};

/// Upstream departure-time format (`yyyyMMddHHmm`).
const DEPARTURE_TIME_FORMAT: &str = "%Y%m%d%H%M";

/// Maximum number of car waypoints.
pub const MAX_WAYPOINTS: usize = 5;

/// Maximum number of multi-destination targets.
pub const MAX_DESTINATIONS: usize = 30;

/// Maximum multi-destination search radius in metres.
pub const MAX_RADIUS: u32 = 10_000;

/// Travel mode, one per upstream endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RouteMode {
    Car,
    FutureCar,
    Transit,
    Bicycle,
    Walk,
    MultiDestination,
}

impl RouteMode {
    pub const ALL: [RouteMode; 6] = [
        RouteMode::Car,
        RouteMode::FutureCar,
        RouteMode::Transit,
        RouteMode::Bicycle,
        RouteMode::Walk,
        RouteMode::MultiDestination,
    ];

    /// Path under the mobility base URL.
    pub fn path(self) -> &'static str {
        match self {
            RouteMode::Car => "/v1/directions",
            RouteMode::FutureCar => "/v1/future/directions",
            RouteMode::Transit => "/v1/directions/transit",
            RouteMode::Bicycle => "/v1/directions/bicycle",
            RouteMode::Walk => "/v1/directions/walk",
            RouteMode::MultiDestination => "/v1/destinations/directions",
        }
    }
}

impl fmt::Display for RouteMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RouteMode::Car => "car",
            RouteMode::FutureCar => "future car",
            RouteMode::Transit => "transit",
            RouteMode::Bicycle => "bicycle",
            RouteMode::Walk => "walk",
            RouteMode::MultiDestination => "multi-destination",
        };
        f.write_str(name)
    }
}

/// Error returned for a departure time that is not `yyyyMMddHHmm`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("departureTime must be yyyyMMddHHmm, got {0:?}")]
pub struct InvalidDepartureTime(String);

/// A departure time in the upstream `yyyyMMddHHmm` format.
///
/// Parsing checks that the value is a real calendar minute, so
/// `202402301200` (30 February) is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DepartureTime(NaiveDateTime);

impl DepartureTime {
    pub fn parse(s: &str) -> Result<Self, InvalidDepartureTime> {
        let trimmed = s.trim();
        if trimmed.len() != 12 || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
            return Err(InvalidDepartureTime(s.to_string()));
        }
        NaiveDateTime::parse_from_str(trimmed, DEPARTURE_TIME_FORMAT)
            .map(Self)
            .map_err(|_| InvalidDepartureTime(s.to_string()))
    }
}

impl fmt::Display for DepartureTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(DEPARTURE_TIME_FORMAT))
    }
}

/// Options shared by the car and future-car endpoints.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DrivingOptions {
    pub priority: Priority,
    pub car_fuel: CarFuel,
    pub car_hipass: bool,
    pub alternatives: bool,
    pub avoid: Vec<Avoid>,
    pub roadevent: Option<RoadEvent>,
    pub car_type: Option<CarType>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CarQuery {
    pub origin: Coordinates,
    pub destination: Coordinates,
    /// At most [`MAX_WAYPOINTS`], in travel order.
    pub waypoints: Vec<Coordinates>,
    pub options: DrivingOptions,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FutureCarQuery {
    pub origin: Coordinates,
    pub destination: Coordinates,
    pub departure_time: DepartureTime,
    pub prediction_type: PredictionType,
    pub options: DrivingOptions,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TransitQuery {
    pub origin: Coordinates,
    pub destination: Coordinates,
    pub priority: TransitPriority,
    pub departure_time: Option<DepartureTime>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BicycleQuery {
    pub origin: Coordinates,
    pub destination: Coordinates,
    pub priority: BicyclePriority,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WalkQuery {
    pub origin: Coordinates,
    pub destination: Coordinates,
}

/// One target of a multi-destination search.
#[derive(Debug, Clone, PartialEq)]
pub struct DestinationTarget {
    /// Caller-chosen label echoed back in the summary.
    pub key: String,
    pub coordinates: Coordinates,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MultiDestinationQuery {
    pub origin: Coordinates,
    pub origin_name: Option<String>,
    /// Between 1 and [`MAX_DESTINATIONS`] entries with unique keys.
    pub destinations: Vec<DestinationTarget>,
    /// Metres, 1 to [`MAX_RADIUS`].
    pub radius: u32,
    pub priority: Option<DestinationPriority>,
    pub avoid: Vec<Avoid>,
    pub roadevent: Option<RoadEvent>,
}

/// A fully resolved routing request.
#[derive(Debug, Clone, PartialEq)]
pub enum RouteQuery {
    Car(CarQuery),
    FutureCar(FutureCarQuery),
    Transit(TransitQuery),
    Bicycle(BicycleQuery),
    Walk(WalkQuery),
    MultiDestination(MultiDestinationQuery),
}

impl RouteQuery {
    pub fn mode(&self) -> RouteMode {
        match self {
            RouteQuery::Car(_) => RouteMode::Car,
            RouteQuery::FutureCar(_) => RouteMode::FutureCar,
            RouteQuery::Transit(_) => RouteMode::Transit,
            RouteQuery::Bicycle(_) => RouteMode::Bicycle,
            RouteQuery::Walk(_) => RouteMode::Walk,
            RouteQuery::MultiDestination(_) => RouteMode::MultiDestination,
        }
    }
}
