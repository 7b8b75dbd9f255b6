//! Kakao route server.
//!
//! Answers "how do I get from here to there?" for car, future-traffic car,
//! public transport, bicycle, walking and one-to-many car trips, using the
//! Kakao Mobility directions API and Kakao Local search for place names.
//! The same operations are served over HTTP and as MCP tools.

pub mod domain;
pub mod kakao;
pub mod mcp;
pub mod routing;
pub mod web;
