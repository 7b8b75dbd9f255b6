//! Outbound JSON bodies shared by the HTTP and MCP surfaces.

use serde::Serialize;

use crate::domain::{Place, RouteOutcome, RouteSummary};

/// Wire form of a [`RouteOutcome`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RouteResponse {
    Ok {
        summary: RouteSummary,
    },
    NoRoute {
        message: String,
    },
    #[serde(rename_all = "camelCase")]
    ApiError {
        #[serde(skip_serializing_if = "Option::is_none")]
        code: Option<i64>,
        #[serde(skip_serializing_if = "Option::is_none")]
        http_status: Option<u16>,
        message: String,
    },
}

impl From<RouteOutcome> for RouteResponse {
    fn from(outcome: RouteOutcome) -> Self {
        match outcome {
            RouteOutcome::Success(summary) => RouteResponse::Ok { summary },
            RouteOutcome::NoRoute { message } => RouteResponse::NoRoute { message },
            RouteOutcome::ApiError(failure) => RouteResponse::ApiError {
                code: failure.code,
                http_status: failure.status,
                message: failure.message,
            },
        }
    }
}

impl RouteResponse {
    pub fn is_api_error(&self) -> bool {
        matches!(self, RouteResponse::ApiError { .. })
    }
}

/// Keyword search results.
#[derive(Debug, Clone, Serialize)]
pub struct PlacesResponse {
    pub places: Vec<Place>,
}

/// Body of every error reply.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
