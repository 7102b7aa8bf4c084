//! cli::parse
//!
//! Bridge between the command tree and clap.
//!
//! # Design
//!
//! Path resolution is done by the dispatcher over our own tree. Once the
//! target command is known, its flags (plus persistent flags inherited from
//! ancestors) and positionals are compiled into a single-level
//! [`clap::Command`] and the leftover tokens are parsed against it. Parser
//! failures are classified into [`FlagErrorKind`] so callers can tell an
//! unknown flag from a bad or missing value.
//!
//! The same compilation, applied recursively, yields the full clap tree used
//! for shell completion.

use clap::builder::BoolishValueParser;
use clap::error::{ContextKind, ContextValue, ErrorKind};
use clap::{Arg, ArgAction, ArgMatches, ColorChoice};

use crate::cli::command::{Command, Flag, FlagKind, Positional};
use crate::cli::errors::FlagErrorKind;

/// Id of the hidden positional that collects leftover tokens on groups.
pub(crate) const GROUP_ARGS_ID: &str = "__args";

/// Parsed flags and positionals handed to an action.
#[derive(Debug, Clone)]
pub struct ParsedArgs<'a> {
    command_path: String,
    matches: ArgMatches,
    root: &'a Command,
}

impl<'a> ParsedArgs<'a> {
    pub(crate) fn new(command_path: String, matches: ArgMatches, root: &'a Command) -> Self {
        Self {
            command_path,
            matches,
            root,
        }
    }

    /// Root of the tree the command was dispatched from.
    pub fn root(&self) -> &'a Command {
        self.root
    }

    /// Space-separated path of the invoked command, e.g. `curveadm cluster add`.
    pub fn command_path(&self) -> &str {
        &self.command_path
    }

    /// Value of a boolean flag; `false` if absent or undeclared.
    pub fn flag(&self, name: &str) -> bool {
        self.matches
            .try_get_one::<bool>(name)
            .ok()
            .flatten()
            .copied()
            .unwrap_or(false)
    }

    /// Value of a string flag or single positional.
    pub fn value(&self, name: &str) -> Option<&str> {
        self.matches
            .try_get_one::<String>(name)
            .ok()
            .flatten()
            .map(String::as_str)
    }

    /// Value of a string flag or positional that the parser guarantees.
    pub fn require(&self, name: &str) -> anyhow::Result<&str> {
        self.value(name)
            .ok_or_else(|| anyhow::anyhow!("missing required argument '{}'", name))
    }

    /// All values of a repeatable flag or multi-value positional.
    pub fn values(&self, name: &str) -> Vec<&str> {
        self.matches
            .try_get_many::<String>(name)
            .ok()
            .flatten()
            .map(|values| values.map(String::as_str).collect())
            .unwrap_or_default()
    }

    /// Value of an unsigned integer flag.
    pub fn uint(&self, name: &str) -> Option<u64> {
        self.matches.try_get_one::<u64>(name).ok().flatten().copied()
    }

    /// Leftover positional tokens collected on a group or the root.
    pub fn args(&self) -> Vec<&str> {
        self.values(GROUP_ARGS_ID)
    }
}

/// Compile one flag into a clap argument.
fn flag_arg(flag: &Flag) -> Arg {
    let mut arg = Arg::new(flag.name).long(flag.name).help(flag.help);
    if let Some(short) = flag.short {
        arg = arg.short(short);
    }

    arg = match flag.kind {
        FlagKind::Bool => arg
            .action(ArgAction::Set)
            .num_args(0..=1)
            .require_equals(true)
            .default_missing_value("true")
            .default_value(flag.default.unwrap_or("false"))
            .value_parser(BoolishValueParser::new()),
        FlagKind::String => arg.action(ArgAction::Set),
        FlagKind::StringList => arg.action(ArgAction::Append),
        FlagKind::Uint => arg
            .action(ArgAction::Set)
            .value_parser(clap::value_parser!(u64)),
    };

    if flag.kind != FlagKind::Bool {
        if let Some(default) = flag.default {
            arg = arg.default_value(default);
        }
        if let Some(placeholder) = flag.placeholder() {
            arg = arg.value_name(placeholder);
        }
    }

    arg.required(flag.required)
}

/// Compile one positional into a clap argument.
fn positional_arg(positional: &Positional) -> Arg {
    let arg = Arg::new(positional.name)
        .value_name(positional.value_name)
        .help(positional.help)
        .required(positional.required);
    if positional.multiple {
        arg.action(ArgAction::Append).num_args(1..)
    } else {
        arg.action(ArgAction::Set)
    }
}

fn base_clap(cmd: &Command) -> clap::Command {
    clap::Command::new(cmd.name())
        .about(cmd.about())
        .disable_help_flag(true)
        .disable_version_flag(true)
        .disable_help_subcommand(true)
        .color(ColorChoice::Never)
}

/// Single-level parser for a resolved command.
///
/// `inherited` are the persistent flags of all ancestors.
pub(crate) fn node_parser(cmd: &Command, inherited: &[&Flag], command_path: &str) -> clap::Command {
    let mut parser = base_clap(cmd)
        .no_binary_name(true)
        .args_override_self(true)
        .bin_name(command_path.to_string());

    for flag in inherited {
        parser = parser.arg(flag_arg(flag));
    }
    for flag in cmd.flag_list() {
        parser = parser.arg(flag_arg(flag));
    }

    if cmd.is_group() {
        parser = parser.arg(
            Arg::new(GROUP_ARGS_ID)
                .action(ArgAction::Append)
                .num_args(1..)
                .hide(true),
        );
    } else {
        for positional in cmd.positionals() {
            parser = parser.arg(positional_arg(positional));
        }
    }

    parser
}

/// Recursive clap tree, used to generate shell completions.
pub(crate) fn clap_tree(cmd: &Command) -> clap::Command {
    let mut tree = base_clap(cmd);
    for flag in cmd.flag_list() {
        let arg = flag_arg(flag);
        tree = tree.arg(if flag.persistent { arg.global(true) } else { arg });
    }
    for positional in cmd.positionals() {
        tree = tree.arg(positional_arg(positional));
    }
    for child in cmd.children() {
        tree = tree.subcommand(clap_tree(child));
    }
    tree
}

/// Parse `tokens` against a compiled node parser.
pub(crate) fn parse_tokens(
    parser: clap::Command,
    tokens: &[&str],
) -> Result<ArgMatches, clap::Error> {
    parser.try_get_matches_from(tokens.iter().copied())
}

/// Map a clap failure onto our flag error categories.
pub(crate) fn classify(err: &clap::Error) -> FlagErrorKind {
    match err.kind() {
        ErrorKind::UnknownArgument => match err.get(ContextKind::InvalidArg) {
            Some(ContextValue::String(arg)) if !arg.starts_with('-') => {
                FlagErrorKind::UnexpectedArgument
            }
            _ => FlagErrorKind::UnknownFlag,
        },
        ErrorKind::InvalidValue => match err.get(ContextKind::InvalidValue) {
            Some(ContextValue::String(value)) if value.is_empty() => FlagErrorKind::MissingValue,
            _ => FlagErrorKind::InvalidValue,
        },
        ErrorKind::ValueValidation | ErrorKind::InvalidUtf8 => FlagErrorKind::InvalidValue,
        ErrorKind::NoEquals => FlagErrorKind::MissingValue,
        ErrorKind::MissingRequiredArgument => FlagErrorKind::MissingRequired,
        _ => FlagErrorKind::Other,
    }
}

/// First line of a clap error without its `error: ` prefix.
pub(crate) fn short_message(err: &clap::Error) -> String {
    let rendered = err.to_string();
    let first = rendered.lines().next().unwrap_or_default();
    first.strip_prefix("error: ").unwrap_or(first).trim().to_string()
}

/// Literals the bool value parser reads as true.
const TRUE_LITERALS: &[&str] = &["y", "yes", "t", "true", "on", "1"];

/// True if the help flag is set anywhere before a `--` terminator.
///
/// Recognizes `--help`, `--help=<true>`, `-h` and short clusters such as
/// `-fh`. A cluster ends at the first short flag in `flags` that takes a
/// value, since the rest of the token is that value.
pub(crate) fn wants_help(tokens: &[&str], flags: &[&Flag]) -> bool {
    tokens
        .iter()
        .take_while(|token| **token != "--")
        .any(|token| requests_help(token, flags))
}

fn requests_help(token: &str, flags: &[&Flag]) -> bool {
    if let Some(long) = token.strip_prefix("--") {
        return match long.split_once('=') {
            Some(("help", value)) => TRUE_LITERALS.contains(&value.to_ascii_lowercase().as_str()),
            Some(_) => false,
            None => long == "help",
        };
    }

    let Some(cluster) = token.strip_prefix('-') else {
        return false;
    };
    for short in cluster.chars() {
        if short == 'h' {
            return true;
        }
        let takes_value = flags
            .iter()
            .any(|flag| flag.short == Some(short) && flag.kind != FlagKind::Bool);
        if takes_value || short == '=' {
            return false;
        }
    }
    false
}
