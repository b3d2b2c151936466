//! Common library for the course scheduling backend
//!
//! This crate provides the infrastructure shared by the service layer:
//! database connectivity, schema bootstrap, and error handling.

pub mod database;
pub mod error;
pub mod schema;
