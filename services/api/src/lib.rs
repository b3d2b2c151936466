//! Scheduler API service
//!
//! Session/credential lifecycle, CRUD over users, friendships, schedules,
//! and classes, and friend-based class recommendations.

pub mod credentials;
pub mod error;
pub mod middleware;
pub mod models;
pub mod recommendations;
pub mod repositories;
pub mod routes;
pub mod state;
pub mod validation;
