//! cli
//!
//! Command-line interface layer for curveadm.
//!
//! # Responsibilities
//!
//! - Model the command tree and assemble it from registered constructors
//! - Resolve process arguments to one command and invoke it
//! - Render help, version, usage and errors
//! - Does NOT deploy, SSH or touch containers; leaf actions hand typed tasks
//!   to the orchestrator in the administration context
//!
//! # Architecture
//!
//! [`registry::build_root`] calls every constructor in
//! [`commands::REGISTRY`] once and installs the curveadm templates.
//! [`run`] then dispatches argv against the root and turns the outcome into
//! a process exit code.

pub mod command;
pub mod commands;
pub mod dispatch;
pub mod errors;
pub mod parse;
pub mod presentation;
pub mod registry;

pub use command::{Action, Command, CommandKind, Flag, FlagKind, Positional};
pub use commands::Shell;
pub use dispatch::{dispatch, Outcome};
pub use errors::{DispatchError, FlagError, FlagErrorKind, RegistrationConflict};
pub use parse::ParsedArgs;
pub use registry::{build_root, Root};

use std::io::Write;

use crate::context::AdministrationContext;

/// Dispatch `argv` and report any error on the context's error stream.
///
/// Returns the process exit code: 0 on success, 1 on any dispatch or action
/// failure.
pub fn run<S: AsRef<str>>(root: &Root, argv: &[S], ctx: &AdministrationContext) -> u8 {
    match dispatch(root, argv, ctx) {
        Ok(outcome) => {
            tracing::debug!(?outcome, "dispatch finished");
            0
        }
        Err(err) => {
            report(&err, root, ctx);
            1
        }
    }
}

/// Render a dispatch error for the user.
pub fn report(err: &DispatchError, root: &Root, ctx: &AdministrationContext) {
    let text = match err {
        DispatchError::FlagParse(flag_err) => (root.presentation().flag_error)(flag_err),
        DispatchError::UnknownCommand { message, .. } => message.clone(),
        DispatchError::Action(source) => format!("Error: {:#}", source),
        DispatchError::Output(_) => format!("{}: {}", root.name(), err),
    };

    let mut stream = ctx.err();
    if let Err(e) = writeln!(stream, "{}", text.trim_end()) {
        tracing::warn!("failed to write error report: {e}");
    }
}
