//! # IO Module
//!
//! External interfaces of the shift backend. Currently only the REST API.

pub mod rest;
