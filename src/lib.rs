//! Storefront
//!
//! Small self-hosted e-commerce storefront service.
//!
//! ## Features
//! - Product catalog with search and pagination
//! - Per-user client cart mirrored to durable storage
//! - Mock checkout with best-effort stock decrement
//! - Token-based auth with a bootstrap admin account
//! - Per-product reviews

pub mod auth;
pub mod client;
pub mod config;
pub mod domain;
pub mod error;
pub mod events;
pub mod routes;
pub mod state;
