//! plugin command - Manage plugins

use anyhow::Result;

use super::{owned_values, submit};
use crate::cli::command::{Command, Flag, Positional};
use crate::cli::parse::ParsedArgs;
use crate::context::AdministrationContext;
use crate::orchestrator::Task;

fn plugin_arg() -> Positional {
    Positional::required("name", "PLUGIN", "Plugin name")
}

pub fn new_plugin_command(ctx: &AdministrationContext) -> Command {
    Command::group(
        "plugin",
        "Manage plugins",
        vec![
            new_install_command(ctx),
            new_remove_command(ctx),
            new_list_command(ctx),
            new_run_command(ctx),
        ],
    )
}

fn new_install_command(_ctx: &AdministrationContext) -> Command {
    Command::leaf("install", "Install plugin", install)
        .usage("install PLUGIN")
        .arg(plugin_arg())
}

fn new_remove_command(_ctx: &AdministrationContext) -> Command {
    Command::leaf("rm", "Remove plugin", remove)
        .usage("rm PLUGIN")
        .arg(plugin_arg())
}

fn new_list_command(_ctx: &AdministrationContext) -> Command {
    Command::leaf("ls", "List plugins", list).usage("ls")
}

fn new_run_command(_ctx: &AdministrationContext) -> Command {
    Command::leaf("run", "Run plugin", run)
        .usage("run PLUGIN [OPTIONS]")
        .example(
            "Examples:
  $ curveadm plugin run shell --hosts host1 -a cmd=\"ls /\"  # Run plugin 'shell' on host1",
        )
        .arg(plugin_arg())
        .flag(Flag::string("hosts", "Specify target hosts").required())
        .flag(Flag::list("arg", "Plugin argument, key=value").short('a'))
}

fn name(args: &ParsedArgs) -> Result<String> {
    args.require("name").map(str::to_string)
}

fn install(args: &ParsedArgs, ctx: &AdministrationContext) -> Result<()> {
    submit(ctx, Task::PluginInstall { name: name(args)? })
}

fn remove(args: &ParsedArgs, ctx: &AdministrationContext) -> Result<()> {
    submit(ctx, Task::PluginRemove { name: name(args)? })
}

fn list(_args: &ParsedArgs, ctx: &AdministrationContext) -> Result<()> {
    submit(ctx, Task::PluginList)
}

fn run(args: &ParsedArgs, ctx: &AdministrationContext) -> Result<()> {
    submit(
        ctx,
        Task::PluginRun {
            name: name(args)?,
            hosts: args.require("hosts")?.to_string(),
            args: owned_values(args, "arg"),
        },
    )
}
