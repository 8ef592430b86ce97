//! Domain logic for the knacks service.
//!
//! This crate has no internal dependencies so it can be shared by the
//! repository layer, the HTTP API and tests alike.

pub mod error;
pub mod listing;
pub mod pagination;
pub mod roles;
pub mod schema;
pub mod social;
pub mod thumbnail;
pub mod types;
pub mod upload;
