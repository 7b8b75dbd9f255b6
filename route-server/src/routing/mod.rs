//! Request handling shared by the HTTP and MCP surfaces.
//!
//! A routing request flows through three stages:
//! 1. validation of the inbound body ([`request`])
//! 2. location resolution, literal coordinates or one geocoder call per
//!    distinct token ([`LocationResolver`])
//! 3. exactly one upstream routing call, normalized into a
//!    [`RouteOutcome`](crate::domain::RouteOutcome) ([`RouteGateway`])
//!
//! [`RouteService`] runs the stages in order.

mod error;
mod gateway;
pub mod request;
mod resolver;
mod response;
mod service;

pub use error::RequestError;
pub use gateway::RouteGateway;
pub use request::{
    BicycleRouteRequest, CarRouteRequest, FutureRouteRequest, MultiDestinationRequest,
    SearchRequest, TransitRouteRequest, WalkRouteRequest,
};
pub use resolver::{
    Geocoder, LocationError, LocationResolver, LocationRole, ResolveError, ResolvedLocations,
};
pub use response::{ErrorResponse, PlacesResponse, RouteResponse};
pub use service::RouteService;
