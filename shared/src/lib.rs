//! Shared types for the Bistro ordering backend.
//!
//! This crate holds the data models and DTOs exchanged between the server
//! and its clients, plus small helpers used on both sides:
//!
//! - [`models`]: entities (category, menu item, cart, order, user) and their
//!   create/update payloads
//! - [`money`]: integer-minor-unit money with decimal conversion at the edge
//! - [`util`]: timestamps and snowflake ID generation
//!
//! Database derives (`sqlx::FromRow`) are gated behind the `db` feature so
//! non-server consumers stay light.

pub mod models;
pub mod money;
pub mod util;
