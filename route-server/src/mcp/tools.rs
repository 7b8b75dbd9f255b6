//! MCP tool catalogue and dispatch.
//!
//! Every tool takes the same JSON as the matching HTTP endpoint and answers
//! with the same JSON body, wrapped as text content.

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tracing::{info, warn};

use crate::domain::RouteOutcome;
use crate::routing::{
    BicycleRouteRequest, CarRouteRequest, ErrorResponse, FutureRouteRequest,
    MultiDestinationRequest, PlacesResponse, RequestError, RouteResponse, RouteService,
    SearchRequest, TransitRouteRequest, WalkRouteRequest,
};

use super::protocol::{INTERNAL_ERROR, JsonRpcError, ToolDefinition, ToolResult};

const PRIORITY: &[&str] = &["RECOMMEND", "TIME", "DISTANCE"];
const CAR_FUEL: &[&str] = &["GASOLINE", "DIESEL", "LPG"];
const AVOID: &[&str] = &["ferries", "toll", "motorway", "schoolzone", "uturn"];

fn location(description: &str) -> Value {
    json!({"type": "string", "description": description})
}

fn origin_and_destination() -> serde_json::Map<String, Value> {
    let mut properties = serde_json::Map::new();
    properties.insert(
        "origin".into(),
        location("Start: place name, address or \"longitude,latitude\""),
    );
    properties.insert(
        "destination".into(),
        location("End: place name, address or \"longitude,latitude\""),
    );
    properties
}

fn driving_properties(properties: &mut serde_json::Map<String, Value>) {
    properties.insert(
        "priority".into(),
        json!({"type": "string", "enum": PRIORITY, "description": "Route preference"}),
    );
    properties.insert(
        "carFuel".into(),
        json!({"type": "string", "enum": CAR_FUEL}),
    );
    properties.insert(
        "carHipass".into(),
        json!({"type": "boolean", "description": "Whether the car has a hi-pass unit"}),
    );
    properties.insert(
        "alternatives".into(),
        json!({"type": "boolean", "description": "Ask for alternative routes"}),
    );
    properties.insert(
        "avoid".into(),
        json!({"type": "array", "items": {"type": "string", "enum": AVOID}}),
    );
    properties.insert(
        "roadevent".into(),
        json!({"type": "integer", "minimum": 0, "maximum": 2}),
    );
    properties.insert(
        "carType".into(),
        json!({"type": "integer", "minimum": 0, "maximum": 7}),
    );
}

fn object_schema(properties: serde_json::Map<String, Value>, required: &[&str]) -> Value {
    json!({"type": "object", "properties": properties, "required": required})
}

/// All tools, in `tools/list` order.
pub fn definitions() -> Vec<ToolDefinition> {
    let mut car = origin_and_destination();
    car.insert(
        "waypoints".into(),
        json!({"type": "array", "items": {"type": "string"}, "maxItems": 5, "description": "Stops in travel order"}),
    );
    driving_properties(&mut car);

    let mut future = origin_and_destination();
    future.insert(
        "departureTime".into(),
        json!({"type": "string", "pattern": "^[0-9]{12}$", "description": "Departure time, yyyyMMddHHmm"}),
    );
    future.insert(
        "predictionType".into(),
        json!({"type": "string", "enum": ["TRAFFIC", "REALTIME"]}),
    );
    driving_properties(&mut future);

    let mut transit = origin_and_destination();
    transit.insert(
        "priority".into(),
        json!({"type": "string", "enum": ["RECOMMEND", "MINIMUM_TIME", "MINIMUM_TRANSFER"]}),
    );
    transit.insert(
        "departureTime".into(),
        json!({"type": "string", "pattern": "^[0-9]{12}$", "description": "Departure time, yyyyMMddHHmm"}),
    );

    let mut bicycle = origin_and_destination();
    bicycle.insert(
        "priority".into(),
        json!({"type": "string", "enum": ["RECOMMEND", "SAFE", "DISTANCE"]}),
    );

    let walk = origin_and_destination();

    let multi = json!({
        "type": "object",
        "properties": {
            "origin": {
                "description": "Start: place name, \"longitude,latitude\", or {x, y, name}",
                "oneOf": [
                    {"type": "string"},
                    {
                        "type": "object",
                        "properties": {
                            "name": {"type": "string"},
                            "x": {"type": "number", "description": "Longitude"},
                            "y": {"type": "number", "description": "Latitude"}
                        },
                        "required": ["x", "y"]
                    }
                ]
            },
            "destinations": {
                "type": "array",
                "minItems": 1,
                "maxItems": 30,
                "items": {
                    "type": "object",
                    "properties": {
                        "key": {"type": "string", "description": "Unique label echoed back"},
                        "x": {"type": "number", "description": "Longitude"},
                        "y": {"type": "number", "description": "Latitude"}
                    },
                    "required": ["key", "x", "y"]
                }
            },
            "radius": {"type": "integer", "minimum": 1, "maximum": 10000, "description": "Search radius in metres"},
            "priority": {"type": "string", "enum": ["TIME", "DISTANCE"]},
            "avoid": {"type": "array", "items": {"type": "string", "enum": AVOID}},
            "roadevent": {"type": "integer", "minimum": 0, "maximum": 2}
        },
        "required": ["origin", "destinations", "radius"]
    });

    let search = |description: &str| {
        json!({
            "type": "object",
            "properties": {"query": {"type": "string", "description": description}},
            "required": ["query"]
        })
    };

    vec![
        ToolDefinition {
            name: "car_route",
            description: "Car route between two places, with up to 5 waypoints. Returns distance (m), duration (s), toll fee and fuel price (won).",
            input_schema: object_schema(car, &["origin", "destination"]),
        },
        ToolDefinition {
            name: "future_car_route",
            description: "Car route for a future departure time, using predicted traffic.",
            input_schema: object_schema(future, &["origin", "destination", "departureTime"]),
        },
        ToolDefinition {
            name: "transit_route",
            description: "Public transport route with fare, transfers and bus/subway/walk steps.",
            input_schema: object_schema(transit, &["origin", "destination"]),
        },
        ToolDefinition {
            name: "bicycle_route",
            description: "Bicycle route with total ascent and descent.",
            input_schema: object_schema(bicycle, &["origin", "destination"]),
        },
        ToolDefinition {
            name: "walk_route",
            description: "Walking route between two places.",
            input_schema: object_schema(walk, &["origin", "destination"]),
        },
        ToolDefinition {
            name: "multi_destination_route",
            description: "Car routes from one origin to up to 30 destinations within a radius.",
            input_schema: multi,
        },
        ToolDefinition {
            name: "geocode",
            description: "Coordinates of an address.",
            input_schema: search("Address to look up"),
        },
        ToolDefinition {
            name: "address_search",
            description: "Places matching a keyword, with addresses and coordinates.",
            input_schema: search("Keyword, e.g. a place name"),
        },
    ]
}

/// Run tool `name`.
///
/// Unknown tools and arguments that do not fit the tool's schema are
/// protocol errors. Everything after that is reported inside the
/// [`ToolResult`].
pub async fn call_tool(
    service: &RouteService,
    name: &str,
    arguments: Value,
) -> Result<ToolResult, JsonRpcError> {
    info!(tool = name, "tool call");

    match name {
        "car_route" => {
            let request: CarRouteRequest = parse_arguments(name, arguments)?;
            route_result(service.car_route(&request).await)
        }
        "future_car_route" => {
            let request: FutureRouteRequest = parse_arguments(name, arguments)?;
            route_result(service.future_route(&request).await)
        }
        "transit_route" => {
            let request: TransitRouteRequest = parse_arguments(name, arguments)?;
            route_result(service.transit_route(&request).await)
        }
        "bicycle_route" => {
            let request: BicycleRouteRequest = parse_arguments(name, arguments)?;
            route_result(service.bicycle_route(&request).await)
        }
        "walk_route" => {
            let request: WalkRouteRequest = parse_arguments(name, arguments)?;
            route_result(service.walk_route(&request).await)
        }
        "multi_destination_route" => {
            let request: MultiDestinationRequest = parse_arguments(name, arguments)?;
            route_result(service.multi_destination_route(&request).await)
        }
        "geocode" => {
            let request: SearchRequest = parse_arguments(name, arguments)?;
            match service.geocode(&request).await {
                Ok(result) => Ok(ToolResult::text(to_text(&result)?, false)),
                Err(e) => error_result(&e),
            }
        }
        "address_search" => {
            let request: SearchRequest = parse_arguments(name, arguments)?;
            match service.search_places(&request).await {
                Ok(places) => Ok(ToolResult::text(
                    to_text(&PlacesResponse { places })?,
                    false,
                )),
                Err(e) => error_result(&e),
            }
        }
        other => Err(JsonRpcError::invalid_params(format!("Unknown tool: {other}"))),
    }
}

fn parse_arguments<T: DeserializeOwned>(tool: &str, arguments: Value) -> Result<T, JsonRpcError> {
    let arguments = match arguments {
        Value::Null => json!({}),
        other => other,
    };
    serde_json::from_value(arguments).map_err(|e| {
        warn!(tool, error = %e, "invalid tool arguments");
        JsonRpcError::invalid_params(format!("Invalid arguments for {tool}: {e}"))
    })
}

fn route_result(result: Result<RouteOutcome, RequestError>) -> Result<ToolResult, JsonRpcError> {
    match result {
        Ok(outcome) => {
            let response = RouteResponse::from(outcome);
            Ok(ToolResult::text(
                to_text(&response)?,
                response.is_api_error(),
            ))
        }
        Err(e) => error_result(&e),
    }
}

fn error_result(error: &RequestError) -> Result<ToolResult, JsonRpcError> {
    warn!(error = %error, upstream = error.is_upstream(), "tool call failed");
    Ok(ToolResult::text(
        to_text(&ErrorResponse::new(error.to_string()))?,
        true,
    ))
}

fn to_text<T: Serialize>(value: &T) -> Result<String, JsonRpcError> {
    serde_json::to_string(value).map_err(|e| JsonRpcError::new(INTERNAL_ERROR, e.to_string()))
}
