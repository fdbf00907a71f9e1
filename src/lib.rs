//! ShopSphere Charts - answers five business questions from the ShopSphere
//! MART views in Snowflake and saves each answer as an HTML and PNG chart.
//!
//! This library exposes the core modules for the binary and integration tests.

pub mod charts;
pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod marts;
pub mod report;
pub mod safety;
pub mod warehouse;
