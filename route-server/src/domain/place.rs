//! Lookup results for the geocode and place-search operations.

use serde::Serialize;

use super::coordinates::Coordinates;

/// Best address match for a geocode query.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeocodeResult {
    /// The query as given, trimmed.
    pub query: String,
    pub address_name: String,
    pub longitude: f64,
    pub latitude: f64,
}

impl GeocodeResult {
    pub fn new(query: impl Into<String>, address_name: impl Into<String>, at: Coordinates) -> Self {
        Self {
            query: query.into(),
            address_name: address_name.into(),
            longitude: at.longitude(),
            latitude: at.latitude(),
        }
    }
}

/// One keyword-search hit.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Place {
    pub name: String,
    /// Lot-number address.
    pub address: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub road_address: Option<String>,
    pub longitude: f64,
    pub latitude: f64,
}
