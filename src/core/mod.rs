//! core
//!
//! Persistent state owned by curveadm itself.
//!
//! # Modules
//!
//! - [`config`] - `curveadm.cfg` schema and loading
//! - [`audit`] - Append-only log of executed commands

pub mod audit;
pub mod config;
