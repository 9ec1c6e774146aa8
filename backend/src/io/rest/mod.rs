//! # REST API Interface Layer
//!
//! Provides HTTP REST endpoints for shift scheduling.
//! This layer handles:
//! - HTTP request/response serialization and deserialization
//! - Input validation and conversion of wire DTOs into domain types
//! - Error translation from domain errors to HTTP status codes
//! - API key checking on every `/api` route
//!
//! ## Design Principles
//!
//! - **Domain Separation**: Pure translation layer without business logic
//! - **Request Logging**: Every handler logs its method, path and request

pub mod assignment_apis;
pub mod auth;
pub mod calendar_apis;
pub mod employee_apis;
pub mod mappers;
pub mod shift_apis;
