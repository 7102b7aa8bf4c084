//! start/stop/restart/reload commands - Service lifecycle of the current cluster

use anyhow::Result;

use super::{filter_flags, service_filter, submit};
use crate::cli::command::Command;
use crate::cli::parse::ParsedArgs;
use crate::context::AdministrationContext;
use crate::orchestrator::Task;

pub fn new_start_command(_ctx: &AdministrationContext) -> Command {
    Command::leaf("start", "Start service", start)
        .usage("start [OPTIONS]")
        .flags(filter_flags())
        .example(
            "Examples:
  $ curveadm start                           # Start all services
  $ curveadm start --host 10.0.1.1           # Start services on the host
  $ curveadm start --role mds                # Start all mds services",
        )
}

pub fn new_stop_command(_ctx: &AdministrationContext) -> Command {
    Command::leaf("stop", "Stop service", stop)
        .usage("stop [OPTIONS]")
        .flags(filter_flags())
}

pub fn new_restart_command(_ctx: &AdministrationContext) -> Command {
    Command::leaf("restart", "Restart service", restart)
        .usage("restart [OPTIONS]")
        .flags(filter_flags())
}

pub fn new_reload_command(_ctx: &AdministrationContext) -> Command {
    Command::leaf("reload", "Reload service", reload)
        .usage("reload [OPTIONS]")
        .long_about("Reload service configuration and restart it")
        .flags(filter_flags())
}

fn start(args: &ParsedArgs, ctx: &AdministrationContext) -> Result<()> {
    submit(ctx, Task::Start(service_filter(args)))
}

fn stop(args: &ParsedArgs, ctx: &AdministrationContext) -> Result<()> {
    submit(ctx, Task::Stop(service_filter(args)))
}

fn restart(args: &ParsedArgs, ctx: &AdministrationContext) -> Result<()> {
    submit(ctx, Task::Restart(service_filter(args)))
}

fn reload(args: &ParsedArgs, ctx: &AdministrationContext) -> Result<()> {
    submit(ctx, Task::Reload(service_filter(args)))
}
