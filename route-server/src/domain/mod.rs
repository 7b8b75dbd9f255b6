//! Domain types for the route server.
//!
//! Values here are validated at construction, so code that receives a
//! `Coordinates` or a `RouteQuery` can trust it without re-checking.

mod coordinates;
mod options;
mod outcome;
mod place;
mod query;

pub use coordinates::{Coordinates, InvalidCoordinates};
pub use options::{
    Avoid, BicyclePriority, CarFuel, CarType, DestinationPriority, OptionOutOfRange,
    PredictionType, Priority, RoadEvent, TransitPriority, UnknownAvoid, join_avoid,
};
pub use outcome::{
    BicycleSummary, DestinationSummary, DrivingSummary, MultiDestinationSummary,
    NO_ROUTE_MESSAGE, RouteOutcome, RouteSummary, StepKind, TransitStep, TransitSummary,
    UpstreamFailure, WalkSummary,
};
pub use place::{GeocodeResult, Place};
pub use query::{
    BicycleQuery, CarQuery, DepartureTime, DestinationTarget, DrivingOptions, FutureCarQuery,
    InvalidDepartureTime, MAX_DESTINATIONS, MAX_RADIUS, MAX_WAYPOINTS, MultiDestinationQuery,
    RouteMode, RouteQuery, TransitQuery, WalkQuery,
};
