//! # CrewDesk API Server Library
//!
//! This library provides the core functionality for the CrewDesk API server.
//!
//! ## Modules
//!
//! - `app`: Application state, router builder, and the auth layer
//! - `config`: Configuration management
//! - `error`: Error handling and HTTP response mapping
//! - `middleware`: Tower middleware (security headers)
//! - `routes`: API route handlers

pub mod app;
pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
