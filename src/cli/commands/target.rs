//! target command - Manage iSCSI targets of CurveBS volumes

use anyhow::Result;

use super::{client_host_flag, submit};
use crate::cli::command::{Command, Flag, Positional};
use crate::cli::parse::ParsedArgs;
use crate::context::AdministrationContext;
use crate::orchestrator::Task;

pub fn new_target_command(ctx: &AdministrationContext) -> Command {
    Command::group(
        "target",
        "Manage SCSI target of CurveBS",
        vec![
            new_add_command(ctx),
            new_remove_command(ctx),
            new_list_command(ctx),
            new_start_command(ctx),
            new_stop_command(ctx),
        ],
    )
}

fn new_add_command(_ctx: &AdministrationContext) -> Command {
    Command::leaf("add", "Add a target of CurveBS", add)
        .usage("add USER:VOLUME [OPTIONS]")
        .arg(Positional::required("volume", "USER:VOLUME", "Volume to export"))
        .flag(client_host_flag())
        .flag(Flag::bool("create", "Create volume if not exist"))
        .flag(Flag::string("size", "Specify volume size").default_value("10GiB"))
}

fn new_remove_command(_ctx: &AdministrationContext) -> Command {
    Command::leaf("rm", "Delete a target of CurveBS", remove)
        .usage("rm TID [OPTIONS]")
        .arg(Positional::required("tid", "TID", "Target id"))
        .flag(client_host_flag())
}

fn new_list_command(_ctx: &AdministrationContext) -> Command {
    Command::leaf("ls", "List targets", list)
        .usage("ls [OPTIONS]")
        .flag(client_host_flag())
}

fn new_start_command(_ctx: &AdministrationContext) -> Command {
    Command::leaf("start", "Start target daemon", start)
        .usage("start [OPTIONS]")
        .flag(client_host_flag())
}

fn new_stop_command(_ctx: &AdministrationContext) -> Command {
    Command::leaf("stop", "Stop target daemon", stop)
        .usage("stop [OPTIONS]")
        .flag(client_host_flag())
}

fn host(args: &ParsedArgs) -> Result<String> {
    args.require("host").map(str::to_string)
}

fn add(args: &ParsedArgs, ctx: &AdministrationContext) -> Result<()> {
    submit(
        ctx,
        Task::TargetAdd {
            volume: args.require("volume")?.to_string(),
            host: host(args)?,
            create: args.flag("create"),
            size: args.require("size")?.to_string(),
        },
    )
}

fn remove(args: &ParsedArgs, ctx: &AdministrationContext) -> Result<()> {
    submit(
        ctx,
        Task::TargetRemove {
            tid: args.require("tid")?.to_string(),
            host: host(args)?,
        },
    )
}

fn list(args: &ParsedArgs, ctx: &AdministrationContext) -> Result<()> {
    submit(ctx, Task::TargetList { host: host(args)? })
}

fn start(args: &ParsedArgs, ctx: &AdministrationContext) -> Result<()> {
    submit(ctx, Task::TargetStart { host: host(args)? })
}

fn stop(args: &ParsedArgs, ctx: &AdministrationContext) -> Result<()> {
    submit(ctx, Task::TargetStop { host: host(args)? })
}
