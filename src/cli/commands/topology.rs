//! scale-out/migrate/check commands - Operations driven by a topology file

use anyhow::Result;

use super::{owned_values, path_arg, submit};
use crate::cli::command::{Command, Flag, Positional};
use crate::cli::parse::ParsedArgs;
use crate::context::AdministrationContext;
use crate::orchestrator::Task;

fn topology_arg() -> Positional {
    Positional::required("topology", "TOPOLOGY", "Topology file")
}

pub fn new_scale_out_command(_ctx: &AdministrationContext) -> Command {
    Command::leaf("scale-out", "Scale out cluster", scale_out)
        .usage("scale-out TOPOLOGY")
        .arg(topology_arg())
}

pub fn new_migrate_command(_ctx: &AdministrationContext) -> Command {
    Command::leaf("migrate", "Migrate services", migrate)
        .usage("migrate TOPOLOGY")
        .arg(topology_arg())
}

pub fn new_check_command(_ctx: &AdministrationContext) -> Command {
    Command::leaf("check", "Check the health of hosts before deploying", check)
        .usage("check TOPOLOGY [OPTIONS]")
        .arg(topology_arg())
        .flag(Flag::list("skip", "Specify skipped check item").value_name("item"))
}

fn scale_out(args: &ParsedArgs, ctx: &AdministrationContext) -> Result<()> {
    let topology = path_arg(args, "topology")?;
    submit(ctx, Task::ScaleOut { topology })
}

fn migrate(args: &ParsedArgs, ctx: &AdministrationContext) -> Result<()> {
    let topology = path_arg(args, "topology")?;
    submit(ctx, Task::Migrate { topology })
}

fn check(args: &ParsedArgs, ctx: &AdministrationContext) -> Result<()> {
    submit(
        ctx,
        Task::Check {
            topology: path_arg(args, "topology")?,
            skip: owned_values(args, "skip"),
        },
    )
}
