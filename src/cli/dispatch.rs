//! cli::dispatch
//!
//! Resolve process arguments to a command and invoke it.
//!
//! # Algorithm
//!
//! 1. Walk the tokens left to right, descending into the child whose name
//!    equals the next token exactly. Stop at the first token that matches no
//!    child, when tokens run out, or at a leaf.
//! 2. If the help flag is set among the remaining tokens (`-h`, `--help`,
//!    `--help=true` or a short cluster like `-fh`), print the target's help
//!    and stop. This wins over every other flag and over parse errors.
//! 3. Parse the remaining tokens as the target's flags and positionals.
//! 4. Leaf: run its action and return its result unchanged.
//!    Group: show help when nothing is left, otherwise report the first
//!    leftover token as an unknown command.
//!    Root: like a group, except `--version` prints the version and
//!    `--upgrade` runs the self-update routine, ignoring any positionals.
//!
//! # Invariants
//!
//! - Matching is exact-name only; no prefixes, no abbreviations
//! - At most one action runs per dispatch
//! - The tree and the context are only read

use std::io::Write;

use tracing::{debug, warn};

use crate::cli::command::{Action, Command, CommandKind, Flag};
use crate::cli::errors::{DispatchError, FlagError};
use crate::cli::parse::{self, ParsedArgs};
use crate::cli::presentation::{HelpView, VersionView};
use crate::cli::registry::Root;
use crate::context::AdministrationContext;
use crate::core::audit::AuditEntry;

/// What a successful dispatch did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// A leaf action ran and succeeded.
    Executed,
    /// Help was printed.
    HelpShown,
    /// The version was printed.
    VersionShown,
    /// The self-update routine ran.
    Upgraded,
}

/// The command a token sequence resolves to.
#[derive(Debug)]
pub struct Resolution<'a> {
    /// Commands above the target, root first.
    pub ancestors: Vec<&'a Command>,
    /// The deepest fully matched command.
    pub target: &'a Command,
    /// Number of leading tokens consumed as command names.
    pub consumed: usize,
}

impl Resolution<'_> {
    /// Space-separated path of the target, e.g. `curveadm cluster add`.
    pub fn command_path(&self) -> String {
        self.ancestors
            .iter()
            .map(|c| c.name())
            .chain(std::iter::once(self.target.name()))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// True if the target is the root itself.
    pub fn is_root(&self) -> bool {
        self.ancestors.is_empty()
    }
}

/// Find the longest prefix of `tokens` naming a path below `root`.
pub fn resolve<'a>(root: &'a Command, tokens: &[&str]) -> Resolution<'a> {
    let mut ancestors = Vec::new();
    let mut target = root;
    let mut consumed = 0;

    while let Some(token) = tokens.get(consumed) {
        match target.find_child(token) {
            Some(child) => {
                ancestors.push(target);
                target = child;
                consumed += 1;
            }
            None => break,
        }
    }

    Resolution {
        ancestors,
        target,
        consumed,
    }
}

/// Dispatch `argv` (without the program name) against `root`.
pub fn dispatch<S: AsRef<str>>(
    root: &Root,
    argv: &[S],
    ctx: &AdministrationContext,
) -> Result<Outcome, DispatchError> {
    let tokens: Vec<&str> = argv.iter().map(AsRef::as_ref).collect();
    let resolution = resolve(root.command(), &tokens);
    let rest = &tokens[resolution.consumed..];
    let command_path = resolution.command_path();
    let view = HelpView::new(&resolution.ancestors, resolution.target);

    debug!(path = %command_path, leftover = rest.len(), "resolved command");

    let flags: Vec<&Flag> = view.all_flags().collect();
    if parse::wants_help(rest, &flags) {
        return show_help(root, &view, ctx);
    }

    let parser = parse::node_parser(resolution.target, &view.inherited_flags, &command_path);
    let matches = parse::parse_tokens(parser, rest).map_err(|source| FlagError {
        kind: parse::classify(&source),
        message: parse::short_message(&source),
        command_path: command_path.clone(),
        usage: (root.presentation().usage)(&view),
        source,
    })?;
    let args = ParsedArgs::new(command_path, matches, root.command());

    // Anything the prescan missed but the parser still read as help.
    if args.flag("help") {
        return show_help(root, &view, ctx);
    }

    match resolution.target.kind() {
        CommandKind::Leaf(action) => run_action(*action, &args, &tokens, ctx),
        CommandKind::Group(_) if resolution.is_root() => run_root(root, &view, &args, ctx),
        CommandKind::Group(_) => show_group(root, &view, &args, ctx),
    }
}

fn show_help(
    root: &Root,
    view: &HelpView<'_>,
    ctx: &AdministrationContext,
) -> Result<Outcome, DispatchError> {
    write_out(ctx, &(root.presentation().help)(view))?;
    Ok(Outcome::HelpShown)
}

fn run_action(
    action: Action,
    args: &ParsedArgs,
    tokens: &[&str],
    ctx: &AdministrationContext,
) -> Result<Outcome, DispatchError> {
    let result = action(args, ctx);
    debug!(path = %args.command_path(), ok = result.is_ok(), "action finished");
    record_audit(ctx, tokens, result.is_ok());
    result
        .map(|()| Outcome::Executed)
        .map_err(DispatchError::Action)
}

fn run_root(
    root: &Root,
    view: &HelpView<'_>,
    args: &ParsedArgs,
    ctx: &AdministrationContext,
) -> Result<Outcome, DispatchError> {
    if args.flag("version") {
        let version = VersionView {
            name: root.name(),
            version: root.version(),
        };
        write_out(ctx, &(root.presentation().version)(&version))?;
        return Ok(Outcome::VersionShown);
    }

    if args.flag("upgrade") {
        debug!(ignored = ?args.args(), "upgrade shortcut set, skipping command routing");
        ctx.upgrader()
            .upgrade(ctx)
            .map_err(DispatchError::Action)?;
        return Ok(Outcome::Upgraded);
    }

    show_group(root, view, args, ctx)
}

fn show_group(
    root: &Root,
    view: &HelpView<'_>,
    args: &ParsedArgs,
    ctx: &AdministrationContext,
) -> Result<Outcome, DispatchError> {
    match args.args().first() {
        None => {
            let help = (root.presentation().help)(view);
            ctx.err()
                .write_all(help.as_bytes())
                .map_err(DispatchError::Output)?;
            Ok(Outcome::HelpShown)
        }
        Some(token) => Err(DispatchError::unknown_command(
            root.name(),
            &view.command_path,
            token,
        )),
    }
}

fn write_out(ctx: &AdministrationContext, text: &str) -> Result<(), DispatchError> {
    ctx.out()
        .write_all(text.as_bytes())
        .map_err(DispatchError::Output)
}

fn record_audit(ctx: &AdministrationContext, tokens: &[&str], success: bool) {
    let Some(audit) = ctx.audit() else {
        return;
    };

    let mut command = String::from(crate::cli::registry::ROOT_NAME);
    for token in tokens {
        command.push(' ');
        command.push_str(token);
    }
    let work_dir = std::env::current_dir()
        .map(|dir| dir.display().to_string())
        .unwrap_or_default();

    if let Err(e) = audit.append(&AuditEntry::new(command, work_dir, success)) {
        warn!("failed to record audit entry: {e}");
    }
}
