//! Types, configuration and authorization policy shared by the ITAMS server
//! and its navigation client.

pub mod config;
pub mod policy;
pub mod types;
