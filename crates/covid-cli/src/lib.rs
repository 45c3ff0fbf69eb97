//! Library components of the `covid-tracker` CLI.

pub mod config;
pub mod logging;
pub mod summary;
