//! Integration tests for Marquee
//!
//! These tests exercise the suggestion controller actor end to end and the
//! TMDB-backed catalog against a local fake of the upstream API.

#[path = "integration/fake_tmdb.rs"]
mod fake_tmdb;

#[path = "integration/catalog_suggestions.rs"]
mod catalog_suggestions;
#[path = "integration/suggestion_flow.rs"]
mod suggestion_flow;
#[path = "integration/tmdb_catalog.rs"]
mod tmdb_catalog;
