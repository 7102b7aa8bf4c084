//! cli::errors
//!
//! Error taxonomy of the dispatch layer.
//!
//! - [`DispatchError::UnknownCommand`] and [`DispatchError::FlagParse`] come
//!   from malformed invocations and are rendered for the user.
//! - [`DispatchError::Action`] wraps whatever a leaf action returned, unchanged.
//! - [`DispatchError::Output`] is a failed write of help or version text.
//! - [`RegistrationConflict`] is a programming error found while assembling
//!   the tree and never reachable from user input.

use thiserror::Error;

/// Errors returned by the dispatcher.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// No command matches a positional token.
    #[error("{message}")]
    UnknownCommand {
        /// The unrecognized token, verbatim.
        token: String,
        /// Path of the command whose children were searched, e.g. `curveadm cluster`.
        parent_path: String,
        /// Fully rendered user message.
        message: String,
    },

    /// Flags or positional arguments failed to parse.
    #[error(transparent)]
    FlagParse(#[from] FlagError),

    /// The matched leaf's action failed.
    #[error(transparent)]
    Action(anyhow::Error),

    /// Help or version text could not be written.
    #[error("failed to write output: {0}")]
    Output(#[source] std::io::Error),
}

impl DispatchError {
    /// Build an unknown-command error for `token` under `parent_path`.
    ///
    /// At the root the message reads
    /// `curveadm: 'bogus' is not a curveadm command.` and below it names the
    /// group, e.g. `... is not a curveadm cluster command.`.
    pub fn unknown_command(root_name: &str, parent_path: &str, token: &str) -> Self {
        let scope = parent_path
            .strip_prefix(root_name)
            .map(str::trim)
            .filter(|rest| !rest.is_empty())
            .map(|rest| format!("{} {}", root_name, rest))
            .unwrap_or_else(|| root_name.to_string());
        let message = format!(
            "{}: '{}' is not a {} command.\nSee '{} --help'",
            root_name, token, scope, parent_path
        );
        DispatchError::UnknownCommand {
            token: token.to_string(),
            parent_path: parent_path.to_string(),
            message,
        }
    }

    /// Whether usage text belongs next to this error.
    ///
    /// Action failures come from correctly invoked commands and suppress it.
    pub fn shows_usage(&self) -> bool {
        matches!(self, DispatchError::FlagParse(_))
    }
}

/// Category of a flag parsing failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlagErrorKind {
    /// A flag the command does not declare.
    UnknownFlag,
    /// A positional token the command does not accept.
    UnexpectedArgument,
    /// A value the flag's type rejects.
    InvalidValue,
    /// A value-taking flag given without its value.
    MissingValue,
    /// A required flag or argument is absent.
    MissingRequired,
    /// Anything else the parser rejected.
    Other,
}

/// A flag parsing failure at a resolved command.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct FlagError {
    /// Failure category.
    pub kind: FlagErrorKind,
    /// Parser message without decoration.
    pub message: String,
    /// Path of the command being parsed, e.g. `curveadm cluster add`.
    pub command_path: String,
    /// Usage text of that command, rendered by the usage template.
    pub usage: String,
    /// Underlying parser error.
    #[source]
    pub source: clap::Error,
}

/// Two siblings share a name.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("command '{name}' registered twice under '{parent}'")]
pub struct RegistrationConflict {
    /// Path of the parent command.
    pub parent: String,
    /// The duplicated child name.
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_top_level_command_message() {
        let err = DispatchError::unknown_command("curveadm", "curveadm", "bogus");
        assert_eq!(
            err.to_string(),
            "curveadm: 'bogus' is not a curveadm command.\nSee 'curveadm --help'"
        );
        assert!(!err.shows_usage());
    }

    #[test]
    fn unknown_nested_command_names_group() {
        let err = DispatchError::unknown_command("curveadm", "curveadm cluster", "bogus");
        assert_eq!(
            err.to_string(),
            "curveadm: 'bogus' is not a curveadm cluster command.\nSee 'curveadm cluster --help'"
        );
        match err {
            DispatchError::UnknownCommand {
                token, parent_path, ..
            } => {
                assert_eq!(token, "bogus");
                assert_eq!(parent_path, "curveadm cluster");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn action_errors_pass_through() {
        let err = DispatchError::Action(anyhow::anyhow!("ssh: connection refused"));
        assert_eq!(err.to_string(), "ssh: connection refused");
        assert!(!err.shows_usage());
    }

    #[test]
    fn output_errors_are_not_action_errors() {
        let err = DispatchError::Output(std::io::Error::new(
            std::io::ErrorKind::BrokenPipe,
            "broken pipe",
        ));
        assert_eq!(err.to_string(), "failed to write output: broken pipe");
        assert!(!err.shows_usage());
    }

    #[test]
    fn conflict_names_parent_and_child() {
        let err = RegistrationConflict {
            parent: "curveadm".to_string(),
            name: "deploy".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "command 'deploy' registered twice under 'curveadm'"
        );
    }
}
