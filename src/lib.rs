//! curveadm - Deploy and manage CurveBS/CurveFS clusters
//!
//! This crate is the command harness of curveadm: it parses the invoked verb,
//! routes it to one of the registered commands, and threads a single
//! administration context through every command.
//!
//! # Architecture
//!
//! - [`cli`] - Command tree, registration, dispatch and presentation
//! - [`context`] - The administration context shared by every command
//! - [`orchestrator`] - Seam between leaf commands and the deployment backend
//! - [`upgrade`] - Self-update routine behind `curveadm -u`
//! - [`core`] - Configuration and the audit log
//! - [`ui`] - User interaction utilities
//!
//! # Invariants
//!
//! 1. The command tree is built once, before any command runs, and is
//!    read-only afterwards
//! 2. Sibling command names are unique at every level
//! 3. At most one leaf action runs per process invocation
//! 4. Help wins over every other flag

pub mod cli;
pub mod context;
pub mod core;
pub mod orchestrator;
pub mod ui;
pub mod upgrade;
