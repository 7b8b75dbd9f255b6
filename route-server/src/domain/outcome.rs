//! Normalized route results.
//!
//! Every routing call ends in a [`RouteOutcome`], whatever the upstream
//! quirks were. "No route" is data, not an error.

use serde::Serialize;

/// Message reported when upstream finds no path.
pub const NO_ROUTE_MESSAGE: &str = "해당 구간의 경로를 찾을 수 없습니다";

/// Car and future-car summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DrivingSummary {
    /// Metres
    pub distance: u64,
    /// Seconds
    pub duration: u64,
    /// Won
    pub toll_fee: u64,
    /// Won
    pub fuel_price: u64,
}

/// Kind of a transit step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StepKind {
    Bus,
    Subway,
    Walk,
    Other,
}

/// One section of a transit route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransitStep {
    #[serde(rename = "type")]
    pub kind: StepKind,
    pub distance: u64,
    pub duration: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub route_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub station_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransitSummary {
    pub distance: u64,
    pub duration: u64,
    pub transfers: u32,
    pub fare: u64,
    pub steps: Vec<TransitStep>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BicycleSummary {
    pub distance: u64,
    pub duration: u64,
    /// Metres climbed
    pub ascent: u64,
    /// Metres descended
    pub descent: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WalkSummary {
    pub distance: u64,
    pub duration: u64,
}

/// Result for one target of a multi-destination search.
///
/// Targets fail independently upstream, so each carries its own code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DestinationSummary {
    pub key: String,
    pub result_code: i64,
    pub result_msg: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MultiDestinationSummary {
    pub destinations: Vec<DestinationSummary>,
}

/// Mode-specific summary of a successful search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum RouteSummary {
    Driving(DrivingSummary),
    Transit(TransitSummary),
    Bicycle(BicycleSummary),
    Walk(WalkSummary),
    MultiDestination(MultiDestinationSummary),
}

/// An upstream failure, with whatever diagnostics upstream provided.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamFailure {
    /// Upstream `result_code`, or the `code` of an error body.
    pub code: Option<i64>,
    /// HTTP status, for non-2xx replies.
    pub status: Option<u16>,
    pub message: String,
}

/// Normalized outcome of a routing call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteOutcome {
    Success(RouteSummary),
    NoRoute { message: String },
    ApiError(UpstreamFailure),
}

impl RouteOutcome {
    pub fn no_route() -> Self {
        RouteOutcome::NoRoute {
            message: NO_ROUTE_MESSAGE.to_string(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, RouteOutcome::Success(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn driving_summary_uses_camel_case() {
        let summary = RouteSummary::Driving(DrivingSummary {
            distance: 10000,
            duration: 600,
            toll_fee: 500,
            fuel_price: 1200,
        });
        assert_eq!(
            serde_json::to_value(&summary).unwrap(),
            serde_json::json!({
                "distance": 10000,
                "duration": 600,
                "tollFee": 500,
                "fuelPrice": 1200
            })
        );
    }

    #[test]
    fn transit_step_omits_missing_names() {
        let step = TransitStep {
            kind: StepKind::Walk,
            distance: 120,
            duration: 90,
            route_name: None,
            station_name: None,
        };
        assert_eq!(
            serde_json::to_value(&step).unwrap(),
            serde_json::json!({"type": "WALK", "distance": 120, "duration": 90})
        );
    }

    #[test]
    fn no_route_message() {
        assert_eq!(
            RouteOutcome::no_route(),
            RouteOutcome::NoRoute {
                message: "해당 구간의 경로를 찾을 수 없습니다".to_string()
            }
        );
        assert!(!RouteOutcome::no_route().is_success());
    }
}
