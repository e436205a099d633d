//! Tests for the CLI module
//!
//! Argument parsing, config file merging, validation into scan options and
//! the summary display.

pub mod validation_tests;
