//! Routing gateway: one upstream call per query.

use serde::Serialize;
use tracing::info;

use crate::domain::{
    BicyclePriority, BicycleQuery, CarFuel, CarQuery, DrivingOptions, FutureCarQuery,
    MultiDestinationQuery, PredictionType, Priority, RouteOutcome, RouteQuery, TransitPriority,
    TransitQuery, WalkQuery, join_avoid,
};
use crate::kakao::{
    DestinationBody, DestinationsRequest, KakaoClient, OriginBody, failure_from_error, normalize,
};

/// Query string of a GET directions request. Unset fields are left out.
///
/// `P` is the mode's priority enum; walking has none and leaves it unset.
#[derive(Debug, Default, Serialize)]
struct DirectionsParams<P> {
    origin: String,
    destination: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    waypoints: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    departure_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    priority: Option<P>,
    #[serde(skip_serializing_if = "Option::is_none")]
    car_fuel: Option<CarFuel>,
    #[serde(skip_serializing_if = "Option::is_none")]
    car_hipass: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    prediction_type: Option<PredictionType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    alternatives: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    avoid: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    roadevent: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    car_type: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<bool>,
}

impl<P: Default> DirectionsParams<P> {
    fn between(origin: impl ToString, destination: impl ToString) -> Self {
        Self {
            origin: origin.to_string(),
            destination: destination.to_string(),
            ..Default::default()
        }
    }
}

impl<P> DirectionsParams<P> {
    fn with_priority(mut self, priority: P) -> Self {
        self.priority = Some(priority);
        self
    }
}

impl DirectionsParams<Priority> {
    fn with_driving(mut self, options: &DrivingOptions) -> Self {
        self.priority = Some(options.priority);
        self.car_fuel = Some(options.car_fuel);
        self.car_hipass = Some(options.car_hipass);
        self.alternatives = Some(options.alternatives);
        self.avoid = join_avoid(&options.avoid);
        self.roadevent = options.roadevent.map(|r| r.value());
        self.car_type = options.car_type.map(|c| c.value());
        self.summary = Some(true);
        self
    }
}

/// Issues routing requests and normalizes the replies.
#[derive(Debug, Clone)]
pub struct RouteGateway {
    client: KakaoClient,
}

impl RouteGateway {
    pub fn new(client: KakaoClient) -> Self {
        Self { client }
    }

    /// Run `query` against its upstream endpoint.
    ///
    /// Never fails: transport problems come back as
    /// [`RouteOutcome::ApiError`]. Nothing is retried.
    pub async fn route(&self, query: &RouteQuery) -> RouteOutcome {
        let mode = query.mode();

        let result = match query {
            RouteQuery::Car(q) => self.client.get_route(mode, &car_params(q)).await,
            RouteQuery::FutureCar(q) => self.client.get_route(mode, &future_params(q)).await,
            RouteQuery::Transit(q) => self.client.get_route(mode, &transit_params(q)).await,
            RouteQuery::Bicycle(q) => self.client.get_route(mode, &bicycle_params(q)).await,
            RouteQuery::Walk(q) => self.client.get_route(mode, &walk_params(q)).await,
            RouteQuery::MultiDestination(q) => {
                self.client.post_route(mode, &destinations_body(q)).await
            }
        };

        let (outcome, trans_id) = match result {
            Ok(response) => (normalize(mode, &response), response.trans_id),
            Err(e) => (RouteOutcome::ApiError(failure_from_error(mode, &e)), None),
        };

        match &outcome {
            RouteOutcome::Success(_) => info!(%mode, "route found"),
            RouteOutcome::NoRoute { .. } => info!(%mode, trans_id = ?trans_id, "no route"),
            RouteOutcome::ApiError(failure) => info!(
                %mode,
                trans_id = ?trans_id,
                code = ?failure.code,
                status = ?failure.status,
                message = %failure.message,
                "route request failed"
            ),
        }

        outcome
    }
}

fn car_params(q: &CarQuery) -> DirectionsParams<Priority> {
    let mut params = DirectionsParams::between(q.origin, q.destination).with_driving(&q.options);
    if !q.waypoints.is_empty() {
        let waypoints = q
            .waypoints
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("|");
        params.waypoints = Some(waypoints);
    }
    params
}

fn future_params(q: &FutureCarQuery) -> DirectionsParams<Priority> {
    let mut params = DirectionsParams::between(q.origin, q.destination).with_driving(&q.options);
    params.departure_time = Some(q.departure_time.to_string());
    params.prediction_type = Some(q.prediction_type);
    params
}

fn transit_params(q: &TransitQuery) -> DirectionsParams<TransitPriority> {
    let mut params = DirectionsParams::between(q.origin, q.destination).with_priority(q.priority);
    params.departure_time = q.departure_time.map(|t| t.to_string());
    params
}

fn bicycle_params(q: &BicycleQuery) -> DirectionsParams<BicyclePriority> {
    DirectionsParams::between(q.origin, q.destination).with_priority(q.priority)
}

fn walk_params(q: &WalkQuery) -> DirectionsParams<Priority> {
    DirectionsParams::between(q.origin, q.destination)
}

fn destinations_body(q: &MultiDestinationQuery) -> DestinationsRequest {
    DestinationsRequest {
        origin: OriginBody {
            name: q.origin_name.clone(),
            x: q.origin.longitude(),
            y: q.origin.latitude(),
        },
        destinations: q
            .destinations
            .iter()
            .map(|d| DestinationBody {
                key: d.key.clone(),
                x: d.coordinates.longitude(),
                y: d.coordinates.latitude(),
            })
            .collect(),
        radius: q.radius,
        priority: q.priority,
        avoid: (!q.avoid.is_empty()).then(|| q.avoid.clone()),
        roadevent: q.roadevent.map(|r| r.value()),
    }
}
