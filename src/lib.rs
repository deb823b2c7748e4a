//! Plaktaki planner API library
//!
//! Exposes the planner's services, storage and HTTP surface for the binary
//! and for integration tests.

pub mod app;
pub mod auth;
pub mod config;
pub mod database;
pub mod error;
pub mod http;
pub mod services;
pub mod storage;
