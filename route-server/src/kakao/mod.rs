//! Kakao API client.
//!
//! This module provides an HTTP client for two Kakao services:
//! - Kakao Mobility directions (`apis-navi.kakaomobility.com`), which
//!   answers car, future-traffic, transit, bicycle, walking and
//!   multi-destination route requests
//! - Kakao Local search (`dapi.kakao.com`), used to turn addresses and
//!   place names into coordinates
//!
//! Routing replies report success per route through `result_code`, so a
//! 200 response can still be a failure; [`normalize`] folds all of that
//! into a [`RouteOutcome`](crate::domain::RouteOutcome).

mod client;
mod convert;
mod error;
mod types;

pub use client::{
    DEFAULT_LOCAL_BASE_URL, DEFAULT_MOBILITY_BASE_URL, DEFAULT_TIMEOUT_SECS, KakaoClient, KakaoConfig,
};
pub use convert::{failure_from_error, normalize};
pub use error::KakaoError;
pub use types::{
    DestinationBody, DestinationsRequest, DirectionsResponse, Document, Fare, LocalSearchResponse,
    OriginBody, Route, RouteSummaryDto, Section,
};
