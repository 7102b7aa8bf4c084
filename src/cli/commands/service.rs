//! status/clean/upgrade/enter/support commands - Inspect and maintain services

use anyhow::Result;

use super::{filter_flags, owned_values, service_filter, submit};
use crate::cli::command::{Command, Flag, Positional};
use crate::cli::parse::ParsedArgs;
use crate::context::AdministrationContext;
use crate::orchestrator::Task;

pub fn new_status_command(_ctx: &AdministrationContext) -> Command {
    Command::leaf("status", "Display service status", status)
        .usage("status [OPTIONS]")
        .flags(filter_flags())
        .flag(Flag::bool("verbose", "Verbose output for status").short('v'))
        .flag(Flag::bool("show-replicas", "Display service num").short('s'))
        .flag(Flag::bool("dir", "Display service data and log directory"))
}

pub fn new_clean_command(_ctx: &AdministrationContext) -> Command {
    Command::leaf("clean", "Clean service's environment", clean)
        .usage("clean [OPTIONS]")
        .example(
            "Examples:
  $ curveadm clean                               # Clean everything for all services
  $ curveadm clean --only='log,data'             # Clean log and data for all services
  $ curveadm clean --role=etcd --only=container  # Delete container for etcd services",
        )
        .flags(filter_flags())
        .flag(Flag::list("only", "Specify the items to clean").value_name("item"))
        .flag(Flag::list("without", "Specify the items to keep").value_name("item"))
}

pub fn new_upgrade_command(_ctx: &AdministrationContext) -> Command {
    Command::leaf("upgrade", "Upgrade service", upgrade)
        .usage("upgrade [OPTIONS]")
        .long_about("Upgrade services to the image version in the current topology")
        .flags(filter_flags())
        .flag(Flag::bool("force", "Never prompt").short('f'))
}

pub fn new_enter_command(_ctx: &AdministrationContext) -> Command {
    Command::leaf("enter", "Enter service container", enter)
        .usage("enter ID")
        .arg(Positional::required("id", "ID", "Service id"))
        .flag(Flag::string("home", "Specify the directory to enter").value_name("dir"))
}

pub fn new_support_command(_ctx: &AdministrationContext) -> Command {
    Command::leaf("support", "Get support from Curve team", support)
        .usage("support [OPTIONS]")
        .long_about("Collect logs and reports of the current cluster for the Curve team")
}

fn status(args: &ParsedArgs, ctx: &AdministrationContext) -> Result<()> {
    submit(
        ctx,
        Task::Status {
            filter: service_filter(args),
            verbose: args.flag("verbose"),
            show_replicas: args.flag("show-replicas"),
            with_dir: args.flag("dir"),
        },
    )
}

fn clean(args: &ParsedArgs, ctx: &AdministrationContext) -> Result<()> {
    submit(
        ctx,
        Task::Clean {
            filter: service_filter(args),
            only: split_items(owned_values(args, "only")),
            without: split_items(owned_values(args, "without")),
        },
    )
}

fn upgrade(args: &ParsedArgs, ctx: &AdministrationContext) -> Result<()> {
    submit(
        ctx,
        Task::Upgrade {
            filter: service_filter(args),
            force: args.flag("force"),
        },
    )
}

fn enter(args: &ParsedArgs, ctx: &AdministrationContext) -> Result<()> {
    submit(
        ctx,
        Task::Enter {
            id: args.require("id")?.to_string(),
            home: args.value("home").map(str::to_string),
        },
    )
}

fn support(_args: &ParsedArgs, ctx: &AdministrationContext) -> Result<()> {
    submit(ctx, Task::Support)
}

/// Accept both `--only a --only b` and `--only a,b`.
fn split_items(values: Vec<String>) -> Vec<String> {
    values
        .iter()
        .flat_map(|value| value.split(','))
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}
