//! Shared utilities for the COVID-19 tracker crates.
//!
//! This crate holds the small amount of Polars glue every other crate needs:
//! turning `AnyValue` cells into typed Rust values and back into display text.

pub mod values;

pub use values::{
    DATE_FORMAT, any_to_date, any_to_f64, any_to_string, any_to_string_non_empty, format_date,
    format_numeric, is_present, parse_date, parse_f64,
};
