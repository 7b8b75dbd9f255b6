//! Conversion from Kakao directions responses to [`RouteOutcome`].
//!
//! The rules are the same for every mode: no routes is `NoRoute`, a
//! non-zero `result_code` on the first route is `ApiError`, anything else is
//! a mode-specific summary. Missing numbers default to zero.

use tracing::warn;

use crate::domain::{
    BicycleSummary, DestinationSummary, DrivingSummary, MultiDestinationSummary, RouteMode,
    RouteOutcome, RouteSummary, StepKind, TransitStep, TransitSummary, UpstreamFailure,
    WalkSummary,
};

use super::error::KakaoError;
use super::types::{DirectionsResponse, Route, Section};

/// Message for failures where upstream gave us nothing trustworthy.
const TRANSPORT_FAILURE_MESSAGE: &str = "upstream request failed";

/// Normalize a decoded directions response.
pub fn normalize(mode: RouteMode, response: &DirectionsResponse) -> RouteOutcome {
    let routes = response.routes.as_deref().unwrap_or_default();
    let Some(first) = routes.first() else {
        return RouteOutcome::no_route();
    };

    if first.result_code != 0 {
        return RouteOutcome::ApiError(UpstreamFailure {
            code: Some(first.result_code),
            status: None,
            message: first.result_msg.clone(),
        });
    }

    let summary = match mode {
        RouteMode::Car | RouteMode::FutureCar => RouteSummary::Driving(driving_summary(first)),
        RouteMode::Transit => RouteSummary::Transit(transit_summary(first)),
        RouteMode::Bicycle => RouteSummary::Bicycle(bicycle_summary(first)),
        RouteMode::Walk => RouteSummary::Walk(walk_summary(first)),
        RouteMode::MultiDestination => {
            RouteSummary::MultiDestination(multi_destination_summary(routes))
        }
    };

    RouteOutcome::Success(summary)
}

/// Map a client error to the failure reported to callers.
///
/// Non-2xx replies keep their status, code and message. Network errors,
/// timeouts and malformed bodies only get a generic message; the details go
/// to the log.
pub fn failure_from_error(mode: RouteMode, error: &KakaoError) -> UpstreamFailure {
    match error {
        KakaoError::Api {
            status,
            code,
            message,
        } => UpstreamFailure {
            code: *code,
            status: Some(*status),
            message: message.clone(),
        },
        other => {
            warn!(
                %mode,
                error = %other,
                timeout = other.is_timeout(),
                "Kakao directions request failed"
            );
            UpstreamFailure {
                code: None,
                status: None,
                message: TRANSPORT_FAILURE_MESSAGE.to_string(),
            }
        }
    }
}

fn driving_summary(route: &Route) -> DrivingSummary {
    let summary = route.summary.clone().unwrap_or_default();
    let fare = summary.fare.unwrap_or_default();
    DrivingSummary {
        distance: summary.distance,
        duration: summary.duration,
        toll_fee: fare.toll,
        fuel_price: fare.fuel,
    }
}

fn transit_summary(route: &Route) -> TransitSummary {
    let summary = route.summary.clone().unwrap_or_default();
    let fare = summary.fare.unwrap_or_default();
    TransitSummary {
        distance: summary.distance,
        duration: summary.duration,
        transfers: summary.transfers.unwrap_or(0),
        fare: fare.transit,
        steps: route.sections.iter().map(transit_step).collect(),
    }
}

fn transit_step(section: &Section) -> TransitStep {
    let kind = match section.kind.as_deref() {
        Some("BUS") => StepKind::Bus,
        Some("SUBWAY") => StepKind::Subway,
        Some("WALK") => StepKind::Walk,
        _ => StepKind::Other,
    };
    TransitStep {
        kind,
        distance: section.distance,
        duration: section.duration,
        route_name: section.route_name.clone(),
        station_name: section.station_name.clone(),
    }
}

fn bicycle_summary(route: &Route) -> BicycleSummary {
    let summary = route.summary.clone().unwrap_or_default();
    BicycleSummary {
        distance: summary.distance,
        duration: summary.duration,
        ascent: summary.ascent.unwrap_or(0),
        descent: summary.descent.unwrap_or(0),
    }
}

fn walk_summary(route: &Route) -> WalkSummary {
    let summary = route.summary.clone().unwrap_or_default();
    WalkSummary {
        distance: summary.distance,
        duration: summary.duration,
    }
}

fn multi_destination_summary(routes: &[Route]) -> MultiDestinationSummary {
    let destinations = routes
        .iter()
        .map(|route| {
            let summary = route.summary.as_ref().filter(|_| route.result_code == 0);
            DestinationSummary {
                key: route.key.clone().unwrap_or_default(),
                result_code: route.result_code,
                result_msg: route.result_msg.clone(),
                distance: summary.map(|s| s.distance),
                duration: summary.map(|s| s.duration),
            }
        })
        .collect();
    MultiDestinationSummary { destinations }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: serde_json::Value) -> DirectionsResponse {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn empty_routes_is_no_route_for_every_mode() {
        for mode in RouteMode::ALL {
            let outcome = normalize(mode, &parse(serde_json::json!({"routes": []})));
            assert_eq!(outcome, RouteOutcome::no_route(), "mode {mode}");

            let outcome = normalize(mode, &parse(serde_json::json!({})));
            assert_eq!(outcome, RouteOutcome::no_route(), "mode {mode}");
        }
    }

    #[test]
    fn non_zero_result_code_is_api_error_for_every_mode() {
        let response = parse(serde_json::json!({
            "routes": [{"result_code": -1, "result_msg": "출발지와 도착지가 너무 가까움"}]
        }));
        for mode in RouteMode::ALL {
            assert_eq!(
                normalize(mode, &response),
                RouteOutcome::ApiError(UpstreamFailure {
                    code: Some(-1),
                    status: None,
                    message: "출발지와 도착지가 너무 가까움".to_string(),
                }),
                "mode {mode}"
            );
        }
    }

    #[test]
    fn car_summary() {
        let response = parse(serde_json::json!({
            "routes": [{
                "result_code": 0,
                "result_msg": "길찾기 성공",
                "summary": {"distance": 10000, "duration": 600, "fare": {"toll": 500, "fuel": 1200}}
            }]
        }));
        assert_eq!(
            normalize(RouteMode::Car, &response),
            RouteOutcome::Success(RouteSummary::Driving(DrivingSummary {
                distance: 10000,
                duration: 600,
                toll_fee: 500,
                fuel_price: 1200,
            }))
        );
    }

    #[test]
    fn driving_summary_defaults_missing_fare() {
        let response = parse(serde_json::json!({
            "routes": [{"result_code": 0, "summary": {"distance": 42, "duration": 7}}]
        }));
        assert_eq!(
            normalize(RouteMode::FutureCar, &response),
            RouteOutcome::Success(RouteSummary::Driving(DrivingSummary {
                distance: 42,
                duration: 7,
                toll_fee: 0,
                fuel_price: 0,
            }))
        );
    }

    #[test]
    fn transit_summary_maps_sections_to_steps() {
        let response = parse(serde_json::json!({
            "routes": [{
                "result_code": 0,
                "summary": {"distance": 8200, "duration": 1800, "transfers": 1, "fare": {"transit": 1500}},
                "sections": [
                    {"type": "WALK", "distance": 300, "duration": 240},
                    {"type": "SUBWAY", "distance": 6000, "duration": 900, "route_name": "신분당선", "station_name": "판교"},
                    {"type": "BUS", "distance": 1700, "duration": 600, "route_name": "9007", "station_name": "강남역"},
                    {"type": "FERRY", "distance": 200, "duration": 60}
                ]
            }]
        }));

        let RouteOutcome::Success(RouteSummary::Transit(summary)) =
            normalize(RouteMode::Transit, &response)
        else {
            panic!("expected transit summary");
        };

        assert_eq!(summary.distance, 8200);
        assert_eq!(summary.transfers, 1);
        assert_eq!(summary.fare, 1500);
        assert_eq!(summary.steps.len(), 4);
        assert_eq!(summary.steps[0].kind, StepKind::Walk);
        assert_eq!(summary.steps[1].kind, StepKind::Subway);
        assert_eq!(summary.steps[1].route_name.as_deref(), Some("신분당선"));
        assert_eq!(summary.steps[2].station_name.as_deref(), Some("강남역"));
        assert_eq!(summary.steps[3].kind, StepKind::Other);
    }

    #[test]
    fn bicycle_summary() {
        let response = parse(serde_json::json!({
            "routes": [{"result_code": 0, "summary": {"distance": 5000, "duration": 1200, "ascent": 35, "descent": 12}}]
        }));
        assert_eq!(
            normalize(RouteMode::Bicycle, &response),
            RouteOutcome::Success(RouteSummary::Bicycle(BicycleSummary {
                distance: 5000,
                duration: 1200,
                ascent: 35,
                descent: 12,
            }))
        );
    }

    #[test]
    fn walk_summary() {
        let response = parse(serde_json::json!({
            "routes": [{"result_code": 0, "summary": {"distance": 900, "duration": 720}}]
        }));
        assert_eq!(
            normalize(RouteMode::Walk, &response),
            RouteOutcome::Success(RouteSummary::Walk(WalkSummary {
                distance: 900,
                duration: 720,
            }))
        );
    }

    #[test]
    fn multi_destination_keeps_per_target_codes() {
        let response = parse(serde_json::json!({
            "routes": [
                {"result_code": 0, "result_msg": "성공", "key": "home", "summary": {"distance": 3000, "duration": 400}},
                {"result_code": 104, "result_msg": "출발지와 도착지가 5 m 이내로 설정된 경우 경로를 탐색할 수 없음", "key": "office"}
            ]
        }));

        let RouteOutcome::Success(RouteSummary::MultiDestination(summary)) =
            normalize(RouteMode::MultiDestination, &response)
        else {
            panic!("expected multi-destination summary");
        };

        assert_eq!(summary.destinations.len(), 2);
        assert_eq!(summary.destinations[0].key, "home");
        assert_eq!(summary.destinations[0].distance, Some(3000));
        assert_eq!(summary.destinations[1].key, "office");
        assert_eq!(summary.destinations[1].result_code, 104);
        assert_eq!(summary.destinations[1].distance, None);
    }

    #[test]
    fn api_failure_keeps_status_code_and_message() {
        let error = KakaoError::Api {
            status: 401,
            code: Some(-401),
            message: "wrong appKey".into(),
        };
        assert_eq!(
            failure_from_error(RouteMode::Car, &error),
            UpstreamFailure {
                code: Some(-401),
                status: Some(401),
                message: "wrong appKey".into(),
            }
        );
    }

    #[test]
    fn transport_failure_is_generic() {
        let error = KakaoError::Json {
            message: "expected value at line 1 column 1".into(),
            body: Some("<html>".into()),
        };
        assert_eq!(
            failure_from_error(RouteMode::Walk, &error),
            UpstreamFailure {
                code: None,
                status: None,
                message: "upstream request failed".into(),
            }
        );
    }
}
