//! Storefront Realtime - resilient client for the storefront dashboard's
//! chat and notification socket.
//!
//! This library exposes modules for use in the binary and integration tests.

pub mod adapters;
pub mod app;
pub mod auth;
pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod traits;
pub mod websocket;
