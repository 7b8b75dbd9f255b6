//! Errors returned by [`RouteService`](super::RouteService).

use crate::domain::{InvalidCoordinates, InvalidDepartureTime, OptionOutOfRange};

use super::resolver::{LocationError, ResolveError};

/// Why a request could not be turned into a route or a lookup result.
#[derive(Debug, thiserror::Error)]
pub enum RequestError {
    /// The request body failed validation.
    #[error("{0}")]
    Input(String),

    /// A location token in a route request could not be resolved.
    #[error(transparent)]
    Location(#[from] LocationError),

    /// A geocode or search lookup failed.
    #[error(transparent)]
    Geocode(#[from] ResolveError),
}

impl RequestError {
    pub fn input(message: impl Into<String>) -> Self {
        Self::Input(message.into())
    }

    /// True when the fault lies with the upstream provider rather than the
    /// caller.
    pub fn is_upstream(&self) -> bool {
        match self {
            RequestError::Input(_) => false,
            RequestError::Location(e) => e.is_upstream(),
            RequestError::Geocode(e) => e.is_upstream(),
        }
    }
}

impl From<InvalidDepartureTime> for RequestError {
    fn from(e: InvalidDepartureTime) -> Self {
        Self::Input(e.to_string())
    }
}

impl From<OptionOutOfRange> for RequestError {
    fn from(e: OptionOutOfRange) -> Self {
        Self::Input(e.to_string())
    }
}

impl From<InvalidCoordinates> for RequestError {
    fn from(e: InvalidCoordinates) -> Self {
        Self::Input(e.to_string())
    }
}
