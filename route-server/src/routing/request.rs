//! Inbound request bodies.
//!
//! Both surfaces deserialize into these types (camelCase JSON) and hand them
//! to [`RouteService`](super::RouteService), which validates them into
//! [`RouteQuery`](crate::domain::RouteQuery) values. Enumerated options are
//! checked by serde; everything else is checked by the methods here.

use std::collections::HashSet;

use serde::Deserialize;

use crate::domain::{
    Avoid, BicyclePriority, CarFuel, CarType, Coordinates, DepartureTime, DestinationPriority,
    DestinationTarget, DrivingOptions, MAX_DESTINATIONS, MAX_RADIUS, PredictionType, Priority,
    RoadEvent, TransitPriority,
};

use super::error::RequestError;

/// Driving options shared by the car and future-car requests.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DrivingRequest {
    pub priority: Option<Priority>,
    pub car_fuel: Option<CarFuel>,
    pub car_hipass: Option<bool>,
    pub alternatives: Option<bool>,
    pub avoid: Vec<Avoid>,
    pub roadevent: Option<i64>,
    pub car_type: Option<i64>,
}

impl DrivingRequest {
    /// Validate into [`DrivingOptions`]. `hipass_default` applies when the
    /// caller did not say whether the car has a hi-pass unit.
    pub fn options(&self, hipass_default: bool) -> Result<DrivingOptions, RequestError> {
        Ok(DrivingOptions {
            priority: self.priority.unwrap_or_default(),
            car_fuel: self.car_fuel.unwrap_or_default(),
            car_hipass: self.car_hipass.unwrap_or(hipass_default),
            alternatives: self.alternatives.unwrap_or(false),
            avoid: dedup_avoid(&self.avoid),
            roadevent: self.roadevent.map(RoadEvent::new).transpose()?,
            car_type: self.car_type.map(CarType::new).transpose()?,
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CarRouteRequest {
    pub origin: String,
    pub destination: String,
    pub waypoints: Vec<String>,
    #[serde(flatten)]
    pub driving: DrivingRequest,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FutureRouteRequest {
    pub origin: String,
    pub destination: String,
    /// `yyyyMMddHHmm`
    pub departure_time: String,
    pub prediction_type: Option<PredictionType>,
    #[serde(flatten)]
    pub driving: DrivingRequest,
}

impl FutureRouteRequest {
    pub fn departure_time(&self) -> Result<DepartureTime, RequestError> {
        let text = required("departureTime", &self.departure_time)?;
        Ok(DepartureTime::parse(text)?)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TransitRouteRequest {
    pub origin: String,
    pub destination: String,
    pub priority: Option<TransitPriority>,
    pub departure_time: Option<String>,
}

impl TransitRouteRequest {
    /// Optional departure time; blank counts as unset.
    pub fn departure_time(&self) -> Result<Option<DepartureTime>, RequestError> {
        match self.departure_time.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(text) => Ok(Some(DepartureTime::parse(text)?)),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BicycleRouteRequest {
    pub origin: String,
    pub destination: String,
    pub priority: Option<BicyclePriority>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WalkRouteRequest {
    pub origin: String,
    pub destination: String,
}

/// Multi-destination origin: a location token, or literal coordinates with
/// an optional display name.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum OriginInput {
    Token(String),
    Point {
        #[serde(default)]
        name: Option<String>,
        x: f64,
        y: f64,
    },
}

impl Default for OriginInput {
    fn default() -> Self {
        OriginInput::Token(String::new())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DestinationInput {
    #[serde(default)]
    pub key: String,
    /// Longitude
    pub x: f64,
    /// Latitude
    pub y: f64,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MultiDestinationRequest {
    pub origin: OriginInput,
    pub destinations: Vec<DestinationInput>,
    /// Metres
    pub radius: Option<i64>,
    pub priority: Option<DestinationPriority>,
    pub avoid: Vec<Avoid>,
    pub roadevent: Option<i64>,
}

impl MultiDestinationRequest {
    /// Validate the destination list: 1 to [`MAX_DESTINATIONS`] entries,
    /// non-blank unique keys, in-range coordinates.
    pub fn targets(&self) -> Result<Vec<DestinationTarget>, RequestError> {
        let count = self.destinations.len();
        if count == 0 || count > MAX_DESTINATIONS {
            return Err(RequestError::input(format!(
                "destinations must contain between 1 and {MAX_DESTINATIONS} entries, got {count}"
            )));
        }

        let mut seen = HashSet::with_capacity(count);
        self.destinations
            .iter()
            .enumerate()
            .map(|(i, d)| {
                let key = d.key.trim();
                if key.is_empty() {
                    return Err(RequestError::input(format!(
                        "destinations[{i}].key is required"
                    )));
                }
                if !seen.insert(key) {
                    return Err(RequestError::input(format!(
                        "duplicate destination key: {key}"
                    )));
                }
                let coordinates = Coordinates::new(d.x, d.y)
                    .map_err(|e| RequestError::input(format!("destinations[{i}]: {e}")))?;
                Ok(DestinationTarget {
                    key: key.to_string(),
                    coordinates,
                })
            })
            .collect()
    }

    pub fn radius(&self) -> Result<u32, RequestError> {
        let radius = self
            .radius
            .ok_or_else(|| RequestError::input("radius is required"))?;
        u32::try_from(radius)
            .ok()
            .filter(|r| (1..=MAX_RADIUS).contains(r))
            .ok_or_else(|| {
                RequestError::input(format!(
                    "radius must be between 1 and {MAX_RADIUS}, got {radius}"
                ))
            })
    }

    pub fn roadevent(&self) -> Result<Option<RoadEvent>, RequestError> {
        Ok(self.roadevent.map(RoadEvent::new).transpose()?)
    }

    pub fn avoid(&self) -> Vec<Avoid> {
        dedup_avoid(&self.avoid)
    }
}

/// Body of the geocode and keyword-search operations.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SearchRequest {
    #[serde(alias = "placeName")]
    pub query: String,
}

/// Return `value` trimmed, or an input error naming `field` when blank.
pub fn required<'a>(field: &str, value: &'a str) -> Result<&'a str, RequestError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(RequestError::input(format!("{field} is required")));
    }
    Ok(trimmed)
}

/// Drop repeated avoid options, keeping first-seen order.
fn dedup_avoid(avoid: &[Avoid]) -> Vec<Avoid> {
    let mut seen = HashSet::new();
    avoid.iter().copied().filter(|a| seen.insert(*a)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse<T: serde::de::DeserializeOwned>(value: serde_json::Value) -> T {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn car_request_reads_camel_case() {
        let req: CarRouteRequest = parse(json!({
            "origin": "판교역",
            "destination": "127.1,37.5",
            "waypoints": ["강남역"],
            "priority": "TIME",
            "carFuel": "DIESEL",
            "carHipass": true,
            "avoid": ["toll", "toll", "uturn"],
            "roadevent": 1,
            "carType": 2
        }));

        assert_eq!(req.waypoints, vec!["강남역"]);
        let options = req.driving.options(false).unwrap();
        assert_eq!(options.priority, Priority::Time);
        assert_eq!(options.car_fuel, CarFuel::Diesel);
        assert!(options.car_hipass);
        assert_eq!(options.avoid, vec![Avoid::Toll, Avoid::Uturn]);
        assert_eq!(options.roadevent.map(RoadEvent::value), Some(1));
        assert_eq!(options.car_type.map(CarType::value), Some(2));
    }

    #[test]
    fn hipass_default_applies_only_when_unset() {
        let req: CarRouteRequest = parse(json!({"origin": "a", "destination": "b"}));
        assert!(req.driving.options(true).unwrap().car_hipass);
        assert!(!req.driving.options(false).unwrap().car_hipass);

        let req: CarRouteRequest =
            parse(json!({"origin": "a", "destination": "b", "carHipass": false}));
        assert!(!req.driving.options(true).unwrap().car_hipass);
    }

    #[test]
    fn unknown_enum_token_is_a_parse_error() {
        let result: Result<CarRouteRequest, _> =
            serde_json::from_value(json!({"origin": "a", "destination": "b", "priority": "FAST"}));
        assert!(result.is_err());
    }

    #[test]
    fn out_of_range_options_are_rejected() {
        let req: CarRouteRequest = parse(json!({"roadevent": 3}));
        assert!(matches!(req.driving.options(false), Err(RequestError::Input(_))));

        let req: CarRouteRequest = parse(json!({"carType": -1}));
        assert!(req.driving.options(false).is_err());
    }

    #[test]
    fn future_departure_time_required_and_checked() {
        let req: FutureRouteRequest = parse(json!({"origin": "a", "destination": "b"}));
        assert_eq!(
            req.departure_time().unwrap_err().to_string(),
            "departureTime is required"
        );

        let req: FutureRouteRequest = parse(json!({"departureTime": "202602301200"}));
        assert!(req.departure_time().is_err());

        let req: FutureRouteRequest = parse(json!({"departureTime": "202612251830"}));
        assert_eq!(req.departure_time().unwrap().to_string(), "202612251830");
    }

    #[test]
    fn transit_departure_time_is_optional() {
        let req: TransitRouteRequest = parse(json!({"departureTime": "  "}));
        assert_eq!(req.departure_time().unwrap(), None);

        let req: TransitRouteRequest = parse(json!({"departureTime": "bad"}));
        assert!(req.departure_time().is_err());
    }

    #[test]
    fn origin_accepts_token_or_point() {
        let req: MultiDestinationRequest = parse(json!({"origin": "판교역"}));
        assert!(matches!(req.origin, OriginInput::Token(ref t) if t == "판교역"));

        let req: MultiDestinationRequest =
            parse(json!({"origin": {"name": "집", "x": 127.1, "y": 37.5}}));
        assert!(matches!(
            req.origin,
            OriginInput::Point { name: Some(ref n), .. } if n == "집"
        ));
    }

    #[test]
    fn targets_validation() {
        let req: MultiDestinationRequest = parse(json!({"destinations": []}));
        assert!(req.targets().is_err());

        let many: Vec<_> = (0..31)
            .map(|i| json!({"key": i.to_string(), "x": 127.0, "y": 37.0}))
            .collect();
        let req: MultiDestinationRequest = parse(json!({ "destinations": many }));
        assert!(req.targets().is_err());

        let req: MultiDestinationRequest = parse(json!({"destinations": [
            {"key": "a", "x": 127.0, "y": 37.0},
            {"key": "a", "x": 127.1, "y": 37.1}
        ]}));
        assert_eq!(
            req.targets().unwrap_err().to_string(),
            "duplicate destination key: a"
        );

        let req: MultiDestinationRequest =
            parse(json!({"destinations": [{"key": " ", "x": 127.0, "y": 37.0}]}));
        assert_eq!(
            req.targets().unwrap_err().to_string(),
            "destinations[0].key is required"
        );

        let req: MultiDestinationRequest =
            parse(json!({"destinations": [{"key": "a", "x": 200.0, "y": 37.0}]}));
        assert!(req.targets().is_err());

        let req: MultiDestinationRequest =
            parse(json!({"destinations": [{"key": "a", "x": 127.0, "y": 37.0}]}));
        assert_eq!(req.targets().unwrap().len(), 1);
    }

    #[test]
    fn thirty_destinations_allowed() {
        let many: Vec<_> = (0..30)
            .map(|i| json!({"key": format!("d{i}"), "x": 127.0, "y": 37.0}))
            .collect();
        let req: MultiDestinationRequest = parse(json!({ "destinations": many }));
        assert_eq!(req.targets().unwrap().len(), 30);
    }

    #[test]
    fn radius_bounds() {
        for (radius, ok) in [(1, true), (10000, true), (0, false), (10001, false), (-5, false)] {
            let req: MultiDestinationRequest = parse(json!({ "radius": radius }));
            assert_eq!(req.radius().is_ok(), ok, "radius {radius}");
        }
        let req: MultiDestinationRequest = parse(json!({}));
        assert_eq!(req.radius().unwrap_err().to_string(), "radius is required");
    }

    #[test]
    fn search_request_accepts_place_name_alias() {
        let req: SearchRequest = parse(json!({"placeName": "카카오판교아지트"}));
        assert_eq!(req.query, "카카오판교아지트");
        let req: SearchRequest = parse(json!({"query": "서울역"}));
        assert_eq!(req.query, "서울역");
    }

    #[test]
    fn required_trims_and_rejects_blank() {
        assert_eq!(required("origin", "  판교역 ").unwrap(), "판교역");
        assert_eq!(
            required("origin", "   ").unwrap_err().to_string(),
            "origin is required"
        );
    }
}
