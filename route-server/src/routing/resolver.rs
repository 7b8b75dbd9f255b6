//! Location resolution.
//!
//! A location token is either literal coordinates (`"127.1,37.5"`), which
//! resolve without touching the network, or free text that is geocoded with
//! a single keyword search.

use std::fmt;
use std::future::Future;

use futures::future::join_all;
use tracing::debug;

use crate::domain::{Coordinates, InvalidCoordinates, MAX_WAYPOINTS};
use crate::kakao::{Document, KakaoClient, KakaoError};

/// Turns free text into coordinates.
pub trait Geocoder {
    /// Look up `query`, returning the best match or `None` when there is no
    /// match at all.
    fn locate(
        &self,
        query: &str,
    ) -> impl Future<Output = Result<Option<Coordinates>, KakaoError>> + Send;
}

impl Geocoder for KakaoClient {
    async fn locate(&self, query: &str) -> Result<Option<Coordinates>, KakaoError> {
        let response = self.search_keyword(query).await?;
        response.documents.first().map(document_coordinates).transpose()
    }
}

/// Coordinates of a search hit. Unparseable `x`/`y` count as a malformed
/// upstream reply.
pub(crate) fn document_coordinates(doc: &Document) -> Result<Coordinates, KakaoError> {
    doc.coordinates().map_err(|e| KakaoError::Json {
        message: e.to_string(),
        body: None,
    })
}

/// Which token of a request a location came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocationRole {
    Origin,
    Destination,
    Waypoint(usize),
}

impl fmt::Display for LocationRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LocationRole::Origin => f.write_str("origin"),
            LocationRole::Destination => f.write_str("destination"),
            LocationRole::Waypoint(i) => write!(f, "waypoint[{i}]"),
        }
    }
}

/// Failure to resolve a single token.
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    /// The geocoder returned no documents.
    #[error("주소를 찾을 수 없습니다: {query}")]
    AddressNotFound { query: String },

    /// The token looked like coordinates but was out of range.
    #[error(transparent)]
    InvalidCoordinates(#[from] InvalidCoordinates),

    /// The geocoding call itself failed.
    #[error("geocoding failed: {0}")]
    Upstream(#[from] KakaoError),
}

impl ResolveError {
    /// Whether the failure was upstream's rather than the caller's.
    pub fn is_upstream(&self) -> bool {
        matches!(self, ResolveError::Upstream(_))
    }
}

/// Failure to resolve the locations of a route request.
#[derive(Debug, thiserror::Error)]
pub enum LocationError {
    #[error("too many waypoints: {count} given, at most {MAX_WAYPOINTS} allowed")]
    TooManyWaypoints { count: usize },

    #[error("{role}: {source}")]
    Resolve {
        role: LocationRole,
        #[source]
        source: ResolveError,
    },
}

impl LocationError {
    pub fn is_upstream(&self) -> bool {
        matches!(self, LocationError::Resolve { source, .. } if source.is_upstream())
    }

    /// The role whose token failed, if the failure was token-specific.
    pub fn role(&self) -> Option<LocationRole> {
        match self {
            LocationError::TooManyWaypoints { .. } => None,
            LocationError::Resolve { role, .. } => Some(*role),
        }
    }
}

/// Coordinates for every token of a route request.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedLocations {
    pub origin: Coordinates,
    pub destination: Coordinates,
    pub waypoints: Vec<Coordinates>,
}

/// Resolves location tokens, consulting the geocoder only for free text.
#[derive(Debug, Clone)]
pub struct LocationResolver<G> {
    geocoder: G,
}

impl<G: Geocoder> LocationResolver<G> {
    pub fn new(geocoder: G) -> Self {
        Self { geocoder }
    }

    /// Resolve one token.
    pub async fn resolve(&self, token: &str) -> Result<Coordinates, ResolveError> {
        let token = token.trim();

        if Coordinates::looks_like_literal(token) {
            return Ok(token.parse()?);
        }

        debug!(query = token, "geocoding location");

        self.geocoder
            .locate(token)
            .await?
            .ok_or_else(|| ResolveError::AddressNotFound {
                query: token.to_string(),
            })
    }

    /// Resolve one token, attributing any failure to `role`.
    pub async fn resolve_as(
        &self,
        role: LocationRole,
        token: &str,
    ) -> Result<Coordinates, LocationError> {
        self.resolve(token)
            .await
            .map_err(|source| LocationError::Resolve { role, source })
    }

    /// Resolve the origin, destination and waypoints of one request.
    ///
    /// Tokens are resolved concurrently, and identical tokens are looked up
    /// once. If several fail, the error names the first failing role in the
    /// order origin, destination, waypoints.
    pub async fn resolve_all(
        &self,
        origin: &str,
        destination: &str,
        waypoints: &[String],
    ) -> Result<ResolvedLocations, LocationError> {
        if waypoints.len() > MAX_WAYPOINTS {
            return Err(LocationError::TooManyWaypoints {
                count: waypoints.len(),
            });
        }

        let entries: Vec<(LocationRole, &str)> = [
            (LocationRole::Origin, origin.trim()),
            (LocationRole::Destination, destination.trim()),
        ]
        .into_iter()
        .chain(
            waypoints
                .iter()
                .enumerate()
                .map(|(i, w)| (LocationRole::Waypoint(i), w.trim())),
        )
        .collect();

        let mut unique: Vec<&str> = Vec::with_capacity(entries.len());
        for (_, token) in &entries {
            if !unique.contains(token) {
                unique.push(*token);
            }
        }

        let mut outcomes = join_all(unique.iter().map(|token| self.resolve(token))).await;
        let positions: Vec<usize> = entries
            .iter()
            .map(|(_, token)| unique.iter().position(|t| t == token).unwrap_or_default())
            .collect();

        for ((role, _), &i) in entries.iter().zip(&positions) {
            if outcomes[i].is_err()
                && let Err(source) = outcomes.swap_remove(i)
            {
                return Err(LocationError::Resolve {
                    role: *role,
                    source,
                });
            }
        }

        let points: Vec<Coordinates> = positions
            .iter()
            .filter_map(|&i| outcomes[i].as_ref().ok().copied())
            .collect();

        Ok(ResolvedLocations {
            origin: points[0],
            destination: points[1],
            waypoints: points[2..].to_vec(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Geocoder backed by a fixed table, counting every call.
    #[derive(Clone, Default)]
    struct FakeGeocoder {
        places: HashMap<String, Coordinates>,
        failing: Vec<String>,
        calls: Arc<AtomicUsize>,
    }

    impl FakeGeocoder {
        fn with_place(mut self, name: &str, lon: f64, lat: f64) -> Self {
            self.places
                .insert(name.to_string(), Coordinates::new(lon, lat).unwrap());
            self
        }

        fn failing_on(mut self, name: &str) -> Self {
            self.failing.push(name.to_string());
            self
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl Geocoder for FakeGeocoder {
        async fn locate(&self, query: &str) -> Result<Option<Coordinates>, KakaoError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.failing.iter().any(|f| f == query) {
                return Err(KakaoError::Api {
                    status: 500,
                    code: None,
                    message: "boom".into(),
                });
            }
            Ok(self.places.get(query).copied())
        }
    }

    fn point(lon: f64, lat: f64) -> Coordinates {
        Coordinates::new(lon, lat).unwrap()
    }

    #[tokio::test]
    async fn literal_coordinates_skip_the_geocoder() {
        let geocoder = FakeGeocoder::default();
        let resolver = LocationResolver::new(geocoder.clone());

        let resolved = resolver.resolve("127.1,37.5").await.unwrap();

        assert_eq!(resolved, point(127.1, 37.5));
        assert_eq!(geocoder.calls(), 0);
    }

    #[tokio::test]
    async fn out_of_range_literal_is_rejected_without_lookup() {
        let geocoder = FakeGeocoder::default();
        let resolver = LocationResolver::new(geocoder.clone());

        let err = resolver.resolve("200,37.5").await.unwrap_err();

        assert!(matches!(err, ResolveError::InvalidCoordinates(_)));
        assert_eq!(geocoder.calls(), 0);
    }

    #[tokio::test]
    async fn free_text_is_geocoded_once() {
        let geocoder = FakeGeocoder::default().with_place("판교역", 127.1114, 37.3948);
        let resolver = LocationResolver::new(geocoder.clone());

        let resolved = resolver.resolve("  판교역 ").await.unwrap();

        assert_eq!(resolved, point(127.1114, 37.3948));
        assert_eq!(geocoder.calls(), 1);
    }

    #[tokio::test]
    async fn non_ascii_digits_are_geocoded() {
        let geocoder = FakeGeocoder::default()
            .with_place("１２７.１,３７.５", 127.1, 37.5)
            .with_place("١٢٧,٣٧", 127.0, 37.0);
        let resolver = LocationResolver::new(geocoder.clone());

        assert_eq!(
            resolver.resolve("１２７.１,３７.５").await.unwrap(),
            point(127.1, 37.5)
        );
        assert_eq!(resolver.resolve("١٢٧,٣٧").await.unwrap(), point(127.0, 37.0));
        assert_eq!(geocoder.calls(), 2);
    }

    #[tokio::test]
    async fn unknown_place_is_address_not_found() {
        let geocoder = FakeGeocoder::default();
        let resolver = LocationResolver::new(geocoder.clone());

        let err = resolver.resolve("없는 곳").await.unwrap_err();

        match err {
            ResolveError::AddressNotFound { query } => assert_eq!(query, "없는 곳"),
            other => panic!("expected AddressNotFound, got {other:?}"),
        }
        assert_eq!(geocoder.calls(), 1);
    }

    #[tokio::test]
    async fn geocoder_failure_is_upstream() {
        let geocoder = FakeGeocoder::default().failing_on("서울역");
        let resolver = LocationResolver::new(geocoder);

        let err = resolver.resolve("서울역").await.unwrap_err();

        assert!(err.is_upstream());
    }

    #[tokio::test]
    async fn too_many_waypoints_fails_before_any_lookup() {
        let geocoder = FakeGeocoder::default();
        let resolver = LocationResolver::new(geocoder.clone());
        let waypoints: Vec<String> = (0..6).map(|i| format!("경유지 {i}")).collect();

        let err = resolver
            .resolve_all("판교역", "서울역", &waypoints)
            .await
            .unwrap_err();

        assert!(matches!(err, LocationError::TooManyWaypoints { count: 6 }));
        assert_eq!(geocoder.calls(), 0);
    }

    #[tokio::test]
    async fn five_waypoints_are_allowed() {
        let geocoder = FakeGeocoder::default();
        let resolver = LocationResolver::new(geocoder.clone());
        let waypoints: Vec<String> = (0..5).map(|i| format!("127.{i},37.5")).collect();

        let resolved = resolver
            .resolve_all("127.0,37.0", "128.0,38.0", &waypoints)
            .await
            .unwrap();

        assert_eq!(resolved.waypoints.len(), 5);
        assert_eq!(resolved.waypoints[3], point(127.3, 37.5));
        assert_eq!(geocoder.calls(), 0);
    }

    #[tokio::test]
    async fn resolve_all_mixes_literals_and_text() {
        let geocoder = FakeGeocoder::default()
            .with_place("판교역", 127.1114, 37.3948)
            .with_place("강남역", 127.0276, 37.4979);
        let resolver = LocationResolver::new(geocoder.clone());

        let resolved = resolver
            .resolve_all("판교역", "126.9707,37.5547", &["강남역".to_string()])
            .await
            .unwrap();

        assert_eq!(resolved.origin, point(127.1114, 37.3948));
        assert_eq!(resolved.destination, point(126.9707, 37.5547));
        assert_eq!(resolved.waypoints, vec![point(127.0276, 37.4979)]);
        assert_eq!(geocoder.calls(), 2);
    }

    #[tokio::test]
    async fn identical_tokens_are_looked_up_once() {
        let geocoder = FakeGeocoder::default()
            .with_place("판교역", 127.1114, 37.3948)
            .with_place("강남역", 127.0276, 37.4979);
        let resolver = LocationResolver::new(geocoder.clone());

        let resolved = resolver
            .resolve_all("판교역", "판교역", &["강남역".to_string(), " 강남역".to_string()])
            .await
            .unwrap();

        assert_eq!(resolved.origin, resolved.destination);
        assert_eq!(resolved.waypoints.len(), 2);
        assert_eq!(geocoder.calls(), 2);
    }

    #[tokio::test]
    async fn failure_names_the_destination() {
        let geocoder = FakeGeocoder::default().with_place("판교역", 127.1114, 37.3948);
        let resolver = LocationResolver::new(geocoder);

        let err = resolver
            .resolve_all("판교역", "없는 곳", &[])
            .await
            .unwrap_err();

        assert_eq!(err.role(), Some(LocationRole::Destination));
        assert_eq!(
            err.to_string(),
            "destination: 주소를 찾을 수 없습니다: 없는 곳"
        );
    }

    #[tokio::test]
    async fn failure_names_the_waypoint_index() {
        let geocoder = FakeGeocoder::default()
            .with_place("판교역", 127.1114, 37.3948)
            .failing_on("서울역");
        let resolver = LocationResolver::new(geocoder);

        let err = resolver
            .resolve_all(
                "판교역",
                "127.0,37.0",
                &["126.9,37.5".to_string(), "서울역".to_string()],
            )
            .await
            .unwrap_err();

        assert_eq!(err.role(), Some(LocationRole::Waypoint(1)));
        assert!(err.is_upstream());
    }

    #[tokio::test]
    async fn earliest_role_wins_when_several_fail() {
        let geocoder = FakeGeocoder::default();
        let resolver = LocationResolver::new(geocoder);

        let err = resolver
            .resolve_all("어디", "아무데나", &["모름".to_string()])
            .await
            .unwrap_err();

        assert_eq!(err.role(), Some(LocationRole::Origin));
    }

    #[test]
    fn role_display() {
        assert_eq!(LocationRole::Origin.to_string(), "origin");
        assert_eq!(LocationRole::Destination.to_string(), "destination");
        assert_eq!(LocationRole::Waypoint(2).to_string(), "waypoint[2]");
    }

    mod kakao_geocoder {
        use super::*;
        use crate::kakao::KakaoConfig;
        use httpmock::prelude::*;
        use serde_json::json;

        fn client(server: &MockServer, timeout_secs: u64) -> KakaoClient {
            let config = KakaoConfig::new("test-key")
                .with_base_url(server.base_url())
                .with_timeout(timeout_secs);
            KakaoClient::new(config).unwrap()
        }

        #[tokio::test]
        async fn first_document_wins() {
            let server = MockServer::start_async().await;
            let search = server
                .mock_async(|when, then| {
                    when.method(GET)
                        .path("/v2/local/search/keyword.json")
                        .query_param("query", "판교역");
                    then.status(200).json_body(json!({
                        "documents": [
                            {"place_name": "판교역 신분당선", "x": "127.1114", "y": "37.3948"},
                            {"place_name": "판교역 버스정류장", "x": "127.1100", "y": "37.3950"}
                        ]
                    }));
                })
                .await;
            let resolver = LocationResolver::new(client(&server, 5));

            let point = resolver.resolve("판교역").await.unwrap();

            search.assert_hits_async(1).await;
            assert_eq!(point, Coordinates::new(127.1114, 37.3948).unwrap());
        }

        #[tokio::test]
        async fn literal_makes_no_request() {
            let server = MockServer::start_async().await;
            let search = server
                .mock_async(|when, then| {
                    when.path_contains("/v2/local");
                    then.status(200).json_body(json!({"documents": []}));
                })
                .await;
            let resolver = LocationResolver::new(client(&server, 5));

            resolver.resolve("127.1,37.5").await.unwrap();

            search.assert_hits_async(0).await;
        }

        #[tokio::test]
        async fn fullwidth_digits_reach_the_keyword_search() {
            let server = MockServer::start_async().await;
            let search = server
                .mock_async(|when, then| {
                    when.method(GET)
                        .path("/v2/local/search/keyword.json")
                        .query_param("query", "１２７.１,３７.５");
                    then.status(200).json_body(json!({
                        "documents": [{"place_name": "어딘가", "x": "127.1", "y": "37.5"}]
                    }));
                })
                .await;
            let resolver = LocationResolver::new(client(&server, 5));

            let point = resolver.resolve("１２７.１,３７.５").await.unwrap();

            search.assert_hits_async(1).await;
            assert_eq!(point, Coordinates::new(127.1, 37.5).unwrap());
        }

        #[tokio::test]
        async fn distinct_tokens_are_looked_up_concurrently() {
            let server = MockServer::start_async().await;
            let search = server
                .mock_async(|when, then| {
                    when.method(GET).path("/v2/local/search/keyword.json");
                    then.status(200)
                        .delay(std::time::Duration::from_millis(500))
                        .json_body(json!({
                            "documents": [{"place_name": "역", "x": "127.0", "y": "37.5"}]
                        }));
                })
                .await;
            let resolver = LocationResolver::new(client(&server, 5));
            let waypoints: Vec<String> = (0..5).map(|i| format!("경유지 {i}")).collect();

            let started = std::time::Instant::now();
            let resolved = resolver
                .resolve_all("판교역", "서울역", &waypoints)
                .await
                .unwrap();
            let elapsed = started.elapsed();

            search.assert_hits_async(7).await;
            assert_eq!(resolved.waypoints.len(), 5);
            // Seven sequential lookups would take at least 3.5s.
            assert!(
                elapsed < std::time::Duration::from_millis(2000),
                "took {elapsed:?}"
            );
        }

        #[tokio::test]
        async fn unparseable_document_is_upstream() {
            let server = MockServer::start_async().await;
            server
                .mock_async(|when, then| {
                    when.path("/v2/local/search/keyword.json");
                    then.status(200)
                        .json_body(json!({"documents": [{"x": "east", "y": "37.5"}]}));
                })
                .await;
            let resolver = LocationResolver::new(client(&server, 5));

            let err = resolver.resolve("어딘가").await.unwrap_err();

            assert!(err.is_upstream());
        }

        #[tokio::test]
        async fn timeout_is_upstream() {
            let server = MockServer::start_async().await;
            server
                .mock_async(|when, then| {
                    when.path("/v2/local/search/keyword.json");
                    then.status(200)
                        .delay(std::time::Duration::from_secs(3))
                        .json_body(json!({"documents": []}));
                })
                .await;
            let resolver = LocationResolver::new(client(&server, 1));

            let err = resolver.resolve("판교역").await.unwrap_err();

            assert!(matches!(err, ResolveError::Upstream(ref e) if e.is_timeout()));
        }
    }
}
