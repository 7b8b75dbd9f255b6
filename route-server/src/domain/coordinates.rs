//! Coordinate pairs and the literal `"<lon>,<lat>"` token format.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

/// Comma-separated signed decimals, at least two groups. ASCII digits only:
/// `\d` would also accept fullwidth and other Unicode digits.
static COORDINATE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[+-]?[0-9]+(\.[0-9]+)?(,[+-]?[0-9]+(\.[0-9]+)?)+$")
        .expect("coordinate pattern is valid")
});

/// Error returned when coordinates are malformed or out of range.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InvalidCoordinates {
    /// The text is not a `"<lon>,<lat>"` pair.
    #[error("not a coordinate pair: {0:?}")]
    Malformed(String),

    /// Longitude outside [-180, 180].
    #[error("longitude {0} out of range [-180, 180]")]
    Longitude(f64),

    /// Latitude outside [-90, 90].
    #[error("latitude {0} out of range [-90, 90]")]
    Latitude(f64),
}

/// A validated WGS84 point.
///
/// The textual form is always longitude first, matching what the Kakao
/// Mobility API expects for `origin`, `destination` and `waypoints`.
///
/// # Examples
///
/// ```
/// use kakao_route::domain::Coordinates;
///
/// let point = Coordinates::new(127.1, 37.5).unwrap();
/// assert_eq!(point.to_string(), "127.1,37.5");
/// assert_eq!("127.1,37.5".parse::<Coordinates>().unwrap(), point);
///
/// // Latitude is checked
/// assert!(Coordinates::new(127.1, 91.0).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Coordinates {
    longitude: f64,
    latitude: f64,
}

impl Coordinates {
    /// Create a point, validating both ranges.
    pub fn new(longitude: f64, latitude: f64) -> Result<Self, InvalidCoordinates> {
        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return Err(InvalidCoordinates::Longitude(longitude));
        }
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(InvalidCoordinates::Latitude(latitude));
        }
        Ok(Self {
            longitude,
            latitude,
        })
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    /// Whether `text` has the shape of a literal coordinate token.
    ///
    /// Only the shape is checked; ranges are validated by [`FromStr`].
    pub fn looks_like_literal(text: &str) -> bool {
        COORDINATE_PATTERN.is_match(text.trim())
    }
}

impl FromStr for Coordinates {
    type Err = InvalidCoordinates;

    /// Parse `"<lon>,<lat>[,...]"`. Groups beyond the second are ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if !COORDINATE_PATTERN.is_match(trimmed) {
            return Err(InvalidCoordinates::Malformed(s.to_string()));
        }

        let mut groups = trimmed.split(',').map(str::parse::<f64>);
        let (Some(Ok(longitude)), Some(Ok(latitude))) = (groups.next(), groups.next()) else {
            return Err(InvalidCoordinates::Malformed(s.to_string()));
        };

        Self::new(longitude, latitude)
    }
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.longitude, self.latitude)
    }
}
