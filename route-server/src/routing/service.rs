//! Route service: validate, resolve, route.
//!
//! This is the layer both inbound surfaces call. Each operation checks the
//! request body before doing any I/O, so a bad request never costs an
//! upstream call.

use tracing::{debug, info};

use crate::domain::{
    BicycleQuery, CarQuery, Coordinates, FutureCarQuery, GeocodeResult, MultiDestinationQuery,
    Place, RouteOutcome, RouteQuery, TransitQuery, WalkQuery,
};
use crate::kakao::KakaoClient;

use super::error::RequestError;
use super::gateway::RouteGateway;
use super::request::{
    BicycleRouteRequest, CarRouteRequest, FutureRouteRequest, MultiDestinationRequest,
    OriginInput, SearchRequest, TransitRouteRequest, WalkRouteRequest, required,
};
use super::resolver::{LocationResolver, LocationRole, ResolveError, document_coordinates};

/// Whether a future-car route assumes a hi-pass unit when the caller does
/// not say.
const FUTURE_HIPASS_DEFAULT: bool = true;

/// Routing and lookup operations over one Kakao client.
#[derive(Debug, Clone)]
pub struct RouteService {
    client: KakaoClient,
    resolver: LocationResolver<KakaoClient>,
    gateway: RouteGateway,
}

impl RouteService {
    pub fn new(client: KakaoClient) -> Self {
        Self {
            resolver: LocationResolver::new(client.clone()),
            gateway: RouteGateway::new(client.clone()),
            client,
        }
    }

    pub async fn car_route(&self, request: &CarRouteRequest) -> Result<RouteOutcome, RequestError> {
        let origin = required("origin", &request.origin)?;
        let destination = required("destination", &request.destination)?;
        let waypoints = waypoint_tokens(&request.waypoints)?;
        let options = request.driving.options(false)?;

        let locations = self
            .resolver
            .resolve_all(origin, destination, &waypoints)
            .await?;

        let query = RouteQuery::Car(CarQuery {
            origin: locations.origin,
            destination: locations.destination,
            waypoints: locations.waypoints,
            options,
        });
        Ok(self.gateway.route(&query).await)
    }

    pub async fn future_route(
        &self,
        request: &FutureRouteRequest,
    ) -> Result<RouteOutcome, RequestError> {
        let origin = required("origin", &request.origin)?;
        let destination = required("destination", &request.destination)?;
        let departure_time = request.departure_time()?;
        let options = request.driving.options(FUTURE_HIPASS_DEFAULT)?;

        let locations = self.resolver.resolve_all(origin, destination, &[]).await?;

        let query = RouteQuery::FutureCar(FutureCarQuery {
            origin: locations.origin,
            destination: locations.destination,
            departure_time,
            prediction_type: request.prediction_type.unwrap_or_default(),
            options,
        });
        Ok(self.gateway.route(&query).await)
    }

    pub async fn transit_route(
        &self,
        request: &TransitRouteRequest,
    ) -> Result<RouteOutcome, RequestError> {
        let origin = required("origin", &request.origin)?;
        let destination = required("destination", &request.destination)?;
        let departure_time = request.departure_time()?;

        let locations = self.resolver.resolve_all(origin, destination, &[]).await?;

        let query = RouteQuery::Transit(TransitQuery {
            origin: locations.origin,
            destination: locations.destination,
            priority: request.priority.unwrap_or_default(),
            departure_time,
        });
        Ok(self.gateway.route(&query).await)
    }

    pub async fn bicycle_route(
        &self,
        request: &BicycleRouteRequest,
    ) -> Result<RouteOutcome, RequestError> {
        let origin = required("origin", &request.origin)?;
        let destination = required("destination", &request.destination)?;

        let locations = self.resolver.resolve_all(origin, destination, &[]).await?;

        let query = RouteQuery::Bicycle(BicycleQuery {
            origin: locations.origin,
            destination: locations.destination,
            priority: request.priority.unwrap_or_default(),
        });
        Ok(self.gateway.route(&query).await)
    }

    pub async fn walk_route(
        &self,
        request: &WalkRouteRequest,
    ) -> Result<RouteOutcome, RequestError> {
        let origin = required("origin", &request.origin)?;
        let destination = required("destination", &request.destination)?;

        let locations = self.resolver.resolve_all(origin, destination, &[]).await?;

        let query = RouteQuery::Walk(WalkQuery {
            origin: locations.origin,
            destination: locations.destination,
        });
        Ok(self.gateway.route(&query).await)
    }

    /// Route from one origin to many destinations.
    ///
    /// Destinations carry literal coordinates; only a text origin is
    /// geocoded.
    pub async fn multi_destination_route(
        &self,
        request: &MultiDestinationRequest,
    ) -> Result<RouteOutcome, RequestError> {
        let destinations = request.targets()?;
        let radius = request.radius()?;
        let roadevent = request.roadevent()?;

        let (origin, origin_name) = match &request.origin {
            OriginInput::Token(token) => {
                let token = required("origin", token)?;
                let origin = self.resolver.resolve_as(LocationRole::Origin, token).await?;
                (origin, None)
            }
            OriginInput::Point { name, x, y } => {
                let origin = Coordinates::new(*x, *y)
                    .map_err(|e| RequestError::input(format!("origin: {e}")))?;
                let name = name
                    .as_deref()
                    .map(str::trim)
                    .filter(|n| !n.is_empty())
                    .map(str::to_string);
                (origin, name)
            }
        };

        let query = RouteQuery::MultiDestination(MultiDestinationQuery {
            origin,
            origin_name,
            destinations,
            radius,
            priority: request.priority,
            avoid: request.avoid(),
            roadevent,
        });
        Ok(self.gateway.route(&query).await)
    }

    /// Geocode an address with Kakao address search.
    pub async fn geocode(&self, request: &SearchRequest) -> Result<GeocodeResult, RequestError> {
        let query = required("query", &request.query)?;
        debug!(query, "address search");

        let response = self
            .client
            .search_address(query)
            .await
            .map_err(ResolveError::Upstream)?;

        let Some(doc) = response.documents.first() else {
            info!(query, "address not found");
            return Err(ResolveError::AddressNotFound {
                query: query.to_string(),
            }
            .into());
        };

        let at = document_coordinates(doc).map_err(ResolveError::Upstream)?;
        let address_name = match doc.address_name.as_str() {
            "" => doc.road_address_name().unwrap_or_default(),
            name => name,
        };

        Ok(GeocodeResult::new(query, address_name, at))
    }

    /// Keyword search. No hits is an empty list, not an error.
    pub async fn search_places(&self, request: &SearchRequest) -> Result<Vec<Place>, RequestError> {
        let query = required("query", &request.query)?;
        debug!(query, "keyword search");

        let response = self
            .client
            .search_keyword(query)
            .await
            .map_err(ResolveError::Upstream)?;

        let places = response
            .documents
            .iter()
            .map(|doc| {
                let at = document_coordinates(doc)?;
                Ok(Place {
                    name: doc
                        .place_name
                        .clone()
                        .unwrap_or_else(|| doc.address_name.clone()),
                    address: doc.address_name.clone(),
                    road_address: doc.road_address_name().map(str::to_string),
                    longitude: at.longitude(),
                    latitude: at.latitude(),
                })
            })
            .collect::<Result<Vec<_>, _>>()
            .map_err(ResolveError::Upstream)?;

        info!(query, count = places.len(), "keyword search done");
        Ok(places)
    }
}

/// Check that no waypoint is blank, returning them trimmed.
fn waypoint_tokens(waypoints: &[String]) -> Result<Vec<String>, RequestError> {
    waypoints
        .iter()
        .enumerate()
        .map(|(i, w)| required(&format!("waypoints[{i}]"), w).map(str::to_string))
        .collect()
}
