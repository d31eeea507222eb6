//! # CrewDesk Shared Library
//!
//! This crate contains the data layer and authentication primitives used by
//! the CrewDesk API server and the seed tool.
//!
//! ## Module Organization
//!
//! - `models`: Database models and data structures
//! - `auth`: Password hashing, JWT issuing/validation, request identity
//! - `db`: Connection pool and migration helpers

pub mod auth;
pub mod db;
pub mod models;

/// Current version of the CrewDesk shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
