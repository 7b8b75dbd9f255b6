//! HTTP route handlers.

use axum::body::Bytes;
use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::de::DeserializeOwned;
use tower_http::trace::TraceLayer;
use tracing::warn;

use crate::domain::RouteOutcome;
use crate::routing::{
    BicycleRouteRequest, CarRouteRequest, ErrorResponse, FutureRouteRequest,
    MultiDestinationRequest, PlacesResponse, RequestError, RouteResponse, SearchRequest,
    TransitRouteRequest, WalkRouteRequest,
};

use super::state::AppState;

/// Characters of a rejected body to include in the log.
const LOGGED_BODY_CHARS: usize = 500;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/route/car", post(car_route))
        .route("/mcp_kakao_mobility_car_route", post(car_route))
        .route("/route/future", post(future_route))
        .route("/mcp_kakao_mobility_future_route", post(future_route))
        .route("/route/transit", post(transit_route))
        .route("/route/bicycle", post(bicycle_route))
        .route("/route/walk", post(walk_route))
        .route("/route/destinations", post(multi_destination_route))
        .route("/geocode", post(geocode))
        .route("/search/keyword", post(search_keyword))
        .route("/mcp", post(mcp))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

async fn car_route(State(state): State<AppState>, body: Bytes) -> Result<Response, AppError> {
    let req: CarRouteRequest = parse_body(&body)?;
    let outcome = state.service.car_route(&req).await?;
    Ok(route_response(outcome))
}

async fn future_route(State(state): State<AppState>, body: Bytes) -> Result<Response, AppError> {
    let req: FutureRouteRequest = parse_body(&body)?;
    let outcome = state.service.future_route(&req).await?;
    Ok(route_response(outcome))
}

async fn transit_route(State(state): State<AppState>, body: Bytes) -> Result<Response, AppError> {
    let req: TransitRouteRequest = parse_body(&body)?;
    let outcome = state.service.transit_route(&req).await?;
    Ok(route_response(outcome))
}

async fn bicycle_route(State(state): State<AppState>, body: Bytes) -> Result<Response, AppError> {
    let req: BicycleRouteRequest = parse_body(&body)?;
    let outcome = state.service.bicycle_route(&req).await?;
    Ok(route_response(outcome))
}

async fn walk_route(State(state): State<AppState>, body: Bytes) -> Result<Response, AppError> {
    let req: WalkRouteRequest = parse_body(&body)?;
    let outcome = state.service.walk_route(&req).await?;
    Ok(route_response(outcome))
}

async fn multi_destination_route(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Response, AppError> {
    let req: MultiDestinationRequest = parse_body(&body)?;
    let outcome = state.service.multi_destination_route(&req).await?;
    Ok(route_response(outcome))
}

/// Geocode an address.
async fn geocode(State(state): State<AppState>, body: Bytes) -> Result<Response, AppError> {
    let req: SearchRequest = parse_body(&body)?;
    let result = state.service.geocode(&req).await?;
    Ok(Json(result).into_response())
}

/// Search places by keyword.
async fn search_keyword(State(state): State<AppState>, body: Bytes) -> Result<Response, AppError> {
    let req: SearchRequest = parse_body(&body)?;
    let places = state.service.search_places(&req).await?;
    Ok(Json(PlacesResponse { places }).into_response())
}

/// MCP over HTTP: one JSON-RPC message or a batch per request.
async fn mcp(State(state): State<AppState>, body: Bytes) -> Response {
    match state.mcp.handle_message(&body).await {
        Some(response) => Json(response).into_response(),
        None => StatusCode::ACCEPTED.into_response(),
    }
}

/// Parse a JSON body, logging it on failure.
fn parse_body<T: DeserializeOwned>(body: &Bytes) -> Result<T, AppError> {
    serde_json::from_slice(body).map_err(|e| {
        let snippet: String = String::from_utf8_lossy(body)
            .chars()
            .take(LOGGED_BODY_CHARS)
            .collect();
        warn!(error = %e, body = %snippet, "rejected request body");
        AppError::BadRequest {
            message: format!("Invalid JSON: {e}"),
        }
    })
}

/// 200 for a route or a definite "no route", 502 when upstream failed.
fn route_response(outcome: RouteOutcome) -> Response {
    let response = RouteResponse::from(outcome);
    let status = if response.is_api_error() {
        StatusCode::BAD_GATEWAY
    } else {
        StatusCode::OK
    };
    (status, Json(response)).into_response()
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    BadGateway { message: String },
}

impl From<RequestError> for AppError {
    fn from(e: RequestError) -> Self {
        let message = e.to_string();
        if e.is_upstream() {
            AppError::BadGateway { message }
        } else {
            AppError::BadRequest { message }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest { message } => (StatusCode::BAD_REQUEST, message),
            AppError::BadGateway { message } => (StatusCode::BAD_GATEWAY, message),
        };

        warn!(status = status.as_u16(), %message, "request failed");

        (status, Json(ErrorResponse::new(message))).into_response()
    }
}
