//! Integration tests for Like-Harvester
//!
//! These tests use wiremock to serve media and API pages over real HTTP and
//! tempfile directories as download targets.

mod api_tests;
mod fetch_tests;
mod harvest_tests;
