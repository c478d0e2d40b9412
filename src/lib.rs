// ABOUTME: Library root for nxsite - exposes public types for testing.
// ABOUTME: The main binary is in main.rs.

pub mod config;
pub mod diagnostics;
pub mod error;
pub mod gateway;
pub mod input;
pub mod lifecycle;
pub mod output;
pub mod render;
pub mod site;
pub mod store;
pub mod types;
pub mod validate;
