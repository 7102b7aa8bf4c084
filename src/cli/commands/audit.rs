//! audit command - Show the audit log of executed commands

use std::io::Write;

use anyhow::{bail, Context as _, Result};

use crate::cli::command::{Command, Flag};
use crate::cli::parse::ParsedArgs;
use crate::context::AdministrationContext;
use crate::core::audit::AuditEntry;

pub fn new_audit_command(_ctx: &AdministrationContext) -> Command {
    Command::leaf("audit", "Show audit log", audit)
        .usage("audit [OPTIONS]")
        .long_about("Show every command executed through curveadm, oldest first")
        .flag(Flag::uint("tail", "Show only the newest N entries").value_name("N"))
        .flag(Flag::bool("verbose", "Show entry id and working directory").short('v'))
}

fn audit(args: &ParsedArgs, ctx: &AdministrationContext) -> Result<()> {
    let Some(log) = ctx.audit() else {
        bail!("audit log is disabled");
    };

    let entries = match args.uint("tail") {
        Some(count) => log.tail(usize::try_from(count).unwrap_or(usize::MAX)),
        None => log.entries(),
    }
    .with_context(|| format!("Failed to read audit log {}", log.path().display()))?;

    let verbose = args.flag("verbose");
    let mut out = ctx.out();
    for entry in &entries {
        writeln!(out, "{}", render(entry, verbose))?;
    }
    Ok(())
}

fn render(entry: &AuditEntry, verbose: bool) -> String {
    let status = if entry.success { "success" } else { "failed" };
    let time = entry.executed_at.format("%Y-%m-%d %H:%M:%S");
    if verbose {
        format!(
            "{}  {}  {:<7}  {}  ({})",
            entry.id, time, status, entry.command, entry.work_dir
        )
    } else {
        format!("{}  {:<7}  {}", time, status, entry.command)
    }
}
