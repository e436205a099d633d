//! Tests for the fetcher and count strategies against an in-memory transport

pub mod fake;
