//! Internal modules for the tournament wrapper.
//!
//! This library provides the file commands, persistence and the pairing server
//! client used by the sp_wrapper binary.

pub mod api_client;
pub mod commands;
pub mod store;
