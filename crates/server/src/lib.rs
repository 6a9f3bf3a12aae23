//! Grandeur Server - e-commerce backend library.
//!
//! Exposes cart, checkout, and the read-only account/catalog slices the
//! cart-to-receipt pipeline needs. The binary in `main.rs` wires this
//! library to the network; the CLI reuses the repositories for
//! migrations and seeding.
//!
//! # Modules
//!
//! - [`config`] - Environment-driven configuration
//! - [`db`] - `PostgreSQL` repositories
//! - [`error`] - Unified `AppError` boundary
//! - [`models`] - Domain types
//! - [`payments`] - Payment gateway trait and Flutterwave client
//! - [`routes`] - Axum handlers
//! - [`services`] - Cart manager and checkout orchestrator
//! - [`state`] - Shared application state

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod payments;
pub mod routes;
pub mod services;
pub mod state;
