//! Routing option enumerations.
//!
//! Each type serializes to the exact token the Kakao Mobility API expects,
//! and deserializes from the same token in request bodies.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Route priority for car and future-car searches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Priority {
    #[default]
    Recommend,
    Time,
    Distance,
}

/// Route priority for transit searches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransitPriority {
    #[default]
    Recommend,
    MinimumTime,
    MinimumTransfer,
}

/// Route priority for bicycle searches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BicyclePriority {
    #[default]
    Recommend,
    Safe,
    Distance,
}

/// Route priority for multi-destination searches. Upstream has no default
/// token, so the parameter is omitted when unset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DestinationPriority {
    Time,
    Distance,
}

/// Fuel type, used upstream to estimate fuel cost.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CarFuel {
    #[default]
    Gasoline,
    Diesel,
    Lpg,
}

/// How the future-directions API predicts traffic.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PredictionType {
    #[default]
    Traffic,
    Realtime,
}

/// Road features a route may avoid.
///
/// Serialized through [`Avoid::as_str`], which also backs parsing, so the
/// upstream token is spelled in one place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "&'static str")]
pub enum Avoid {
    Ferries,
    Toll,
    Motorway,
    Schoolzone,
    Uturn,
}

/// Error returned for an unknown avoid token.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown avoid option {0:?}, expected one of ferries, toll, motorway, schoolzone, uturn")]
pub struct UnknownAvoid(String);

impl Avoid {
    pub const ALL: [Avoid; 5] = [
        Avoid::Ferries,
        Avoid::Toll,
        Avoid::Motorway,
        Avoid::Schoolzone,
        Avoid::Uturn,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Avoid::Ferries => "ferries",
            Avoid::Toll => "toll",
            Avoid::Motorway => "motorway",
            Avoid::Schoolzone => "schoolzone",
            Avoid::Uturn => "uturn",
        }
    }
}

impl FromStr for Avoid {
    type Err = UnknownAvoid;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Avoid::ALL
            .into_iter()
            .find(|avoid| avoid.as_str() == s)
            .ok_or_else(|| UnknownAvoid(s.to_string()))
    }
}

impl TryFrom<String> for Avoid {
    type Error = UnknownAvoid;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Avoid> for &'static str {
    fn from(avoid: Avoid) -> Self {
        avoid.as_str()
    }
}

impl fmt::Display for Avoid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Road-closure handling. 0 applies all events, 1 ignores events near the
/// origin and destination, 2 ignores all events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoadEvent(u8);

/// Upstream car classification, 0 through 7.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CarType(u8);

/// Error returned for an out-of-range numeric option.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{name} must be between 0 and {max}, got {value}")]
pub struct OptionOutOfRange {
    pub name: &'static str,
    pub value: i64,
    pub max: u8,
}

impl RoadEvent {
    pub const MAX: u8 = 2;

    pub fn new(value: i64) -> Result<Self, OptionOutOfRange> {
        bounded("roadevent", value, Self::MAX).map(Self)
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

impl CarType {
    pub const MAX: u8 = 7;

    pub fn new(value: i64) -> Result<Self, OptionOutOfRange> {
        bounded("carType", value, Self::MAX).map(Self)
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

fn bounded(name: &'static str, value: i64, max: u8) -> Result<u8, OptionOutOfRange> {
    u8::try_from(value)
        .ok()
        .filter(|v| *v <= max)
        .ok_or(OptionOutOfRange { name, value, max })
}

/// Join avoid options with `|`, the upstream list separator.
pub fn join_avoid(avoid: &[Avoid]) -> Option<String> {
    if avoid.is_empty() {
        return None;
    }
    Some(
        avoid
            .iter()
            .map(|a| a.as_str())
            .collect::<Vec<_>>()
            .join("|"),
    )
}
