//! Unit tests for configuration loading and precedence.
//!
//! Tests are organised into modules by functional area:
//! - `helpers`: Shared test utilities
//! - `precedence`: Layer precedence tests
//! - `field_resolution`: Token, API URL, and resource resolution tests
//! - `query_values`: Page size, sort, and filter parsing tests
//! - `loading`: Environment and CLI loading tests

mod field_resolution;
mod helpers;
mod query_values;
