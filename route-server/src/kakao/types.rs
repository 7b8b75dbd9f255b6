//! Kakao API request and response DTOs.
//!
//! These map directly onto the provider's JSON. Kakao omits fields rather
//! than sending nulls, so most fields are optional or defaulted.

use serde::{Deserialize, Serialize};

use crate::domain::{Avoid, Coordinates, DestinationPriority, InvalidCoordinates};

/// Response from any of the directions endpoints.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DirectionsResponse {
    /// Upstream transaction id, useful when reporting problems to Kakao.
    pub trans_id: Option<String>,

    /// Candidate routes. Absent and empty both mean "no route".
    pub routes: Option<Vec<Route>>,
}

/// One route candidate.
#[derive(Debug, Clone, Deserialize)]
pub struct Route {
    /// 0 on success; anything else is an upstream failure reason.
    pub result_code: i64,

    #[serde(default)]
    pub result_msg: String,

    /// Destination key, multi-destination responses only.
    pub key: Option<String>,

    pub summary: Option<RouteSummaryDto>,

    #[serde(default)]
    pub sections: Vec<Section>,
}

/// `routes[].summary`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RouteSummaryDto {
    #[serde(default)]
    pub distance: u64,

    #[serde(default)]
    pub duration: u64,

    pub fare: Option<Fare>,

    /// Transit only.
    pub transfers: Option<u32>,

    /// Bicycle only.
    pub ascent: Option<u64>,

    /// Bicycle only.
    pub descent: Option<u64>,
}

/// `routes[].summary.fare`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Fare {
    #[serde(default)]
    pub toll: u64,

    #[serde(default)]
    pub fuel: u64,

    /// Transit fare.
    #[serde(default, alias = "total")]
    pub transit: u64,
}

/// `routes[].sections[]`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Section {
    /// Transit section kind: `BUS`, `SUBWAY` or `WALK`.
    #[serde(rename = "type")]
    pub kind: Option<String>,

    #[serde(default)]
    pub distance: u64,

    #[serde(default)]
    pub duration: u64,

    pub route_name: Option<String>,

    pub station_name: Option<String>,
}

/// Response from the local address and keyword search endpoints.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LocalSearchResponse {
    #[serde(default)]
    pub documents: Vec<Document>,
}

/// One search hit. Coordinates arrive as decimal strings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Document {
    /// Place name, keyword search only.
    pub place_name: Option<String>,

    #[serde(default)]
    pub address_name: String,

    /// Road address, keyword search form.
    pub road_address_name: Option<String>,

    /// Road address, address search form.
    pub road_address: Option<RoadAddress>,

    /// Longitude
    pub x: String,

    /// Latitude
    pub y: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RoadAddress {
    #[serde(default)]
    pub address_name: String,
}

impl Document {
    /// Parse `x`/`y` as longitude/latitude.
    pub fn coordinates(&self) -> Result<Coordinates, InvalidCoordinates> {
        let malformed = || InvalidCoordinates::Malformed(format!("{},{}", self.x, self.y));
        let longitude: f64 = self.x.trim().parse().map_err(|_| malformed())?;
        let latitude: f64 = self.y.trim().parse().map_err(|_| malformed())?;
        Coordinates::new(longitude, latitude)
    }

    /// Road address from whichever field the endpoint filled in.
    pub fn road_address_name(&self) -> Option<&str> {
        self.road_address_name
            .as_deref()
            .or(self.road_address.as_ref().map(|r| r.address_name.as_str()))
            .filter(|name| !name.is_empty())
    }
}

/// Error body sent with non-2xx replies.
///
/// The mobility API uses `code`/`msg`, the local API `errorType`/`message`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorBody {
    pub code: Option<i64>,
    pub msg: Option<String>,
    pub message: Option<String>,
    #[serde(rename = "errorType")]
    pub error_type: Option<String>,
}

impl ErrorBody {
    pub fn into_message(self) -> Option<String> {
        self.msg.or(self.message).or(self.error_type)
    }
}

/// Body of `POST /v1/destinations/directions`.
#[derive(Debug, Clone, Serialize)]
pub struct DestinationsRequest {
    pub origin: OriginBody,
    pub destinations: Vec<DestinationBody>,
    pub radius: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<DestinationPriority>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avoid: Option<Vec<Avoid>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub roadevent: Option<u8>,
}

#[derive(Debug, Clone, Serialize)]
pub struct OriginBody {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct DestinationBody {
    pub key: String,
    pub x: f64,
    pub y: f64,
}
