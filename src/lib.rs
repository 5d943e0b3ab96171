//! Conflict Monitor posts backend.
//!
//! Fetches blog posts from a headless WordPress CMS over GraphQL, normalizes
//! them for the dashboard, and serves them as JSON to the page renderers.

// Allow raw string hashes for safety - they're harmless and prevent issues if content changes
#![allow(clippy::needless_raw_string_hashes)]

pub mod config;
pub mod datetime;
pub mod graphql;
pub mod posts;
pub mod web;
