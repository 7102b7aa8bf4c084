//! cluster command - Manage clusters
//!
//! Subcommands: add, checkout, ls, rm, import, export.

use std::path::PathBuf;

use anyhow::Result;

use super::submit;
use crate::cli::command::{Command, Flag, Positional};
use crate::cli::parse::ParsedArgs;
use crate::context::AdministrationContext;
use crate::orchestrator::Task;

fn cluster_arg() -> Positional {
    Positional::required("name", "CLUSTER", "Cluster name")
}

pub fn new_cluster_command(ctx: &AdministrationContext) -> Command {
    Command::group(
        "cluster",
        "Manage clusters",
        vec![
            new_add_command(ctx),
            new_checkout_command(ctx),
            new_list_command(ctx),
            new_remove_command(ctx),
            new_import_command(ctx),
            new_export_command(ctx),
        ],
    )
}

fn new_add_command(_ctx: &AdministrationContext) -> Command {
    Command::leaf("add", "Add cluster", add)
        .usage("add CLUSTER [OPTIONS]")
        .example(
            "Examples:
  $ curveadm cluster add c1                          # Add a cluster named 'c1'
  $ curveadm cluster add c1 -d \"first cluster\"       # Add a cluster with description
  $ curveadm cluster add c1 -f /path/to/topology.yaml  # Add a cluster with specified topology",
        )
        .arg(cluster_arg())
        .flag(Flag::string("description", "Description for cluster").short('d'))
        .flag(Flag::string("topology", "Specify the path of topology file").short('f'))
}

fn new_checkout_command(_ctx: &AdministrationContext) -> Command {
    Command::leaf("checkout", "Switch cluster", checkout)
        .usage("checkout CLUSTER")
        .arg(cluster_arg())
}

fn new_list_command(_ctx: &AdministrationContext) -> Command {
    Command::leaf("ls", "List clusters", list)
        .usage("ls [OPTIONS]")
        .flag(Flag::bool("verbose", "Verbose output for clusters").short('v'))
}

fn new_remove_command(_ctx: &AdministrationContext) -> Command {
    Command::leaf("rm", "Remove cluster", remove)
        .usage("rm CLUSTER [OPTIONS]")
        .arg(cluster_arg())
        .flag(Flag::bool("force", "Remove cluster by force").short('f'))
}

fn new_import_command(_ctx: &AdministrationContext) -> Command {
    Command::leaf("import", "Import cluster", import)
        .usage("import CLUSTER [OPTIONS]")
        .arg(cluster_arg())
        .flag(
            Flag::string("database", "Specify the path of database file")
                .short('f')
                .default_value("curveadm.db"),
        )
}

fn new_export_command(_ctx: &AdministrationContext) -> Command {
    Command::leaf("export", "Export cluster", export)
        .usage("export CLUSTER [OPTIONS]")
        .arg(cluster_arg())
        .flag(
            Flag::string("output", "Output to specified database file")
                .short('o')
                .default_value("curveadm.db"),
        )
}

fn name(args: &ParsedArgs) -> Result<String> {
    args.require("name").map(str::to_string)
}

fn add(args: &ParsedArgs, ctx: &AdministrationContext) -> Result<()> {
    submit(
        ctx,
        Task::ClusterAdd {
            name: name(args)?,
            description: args.value("description").map(str::to_string),
            topology: args.value("topology").map(PathBuf::from),
        },
    )
}

fn checkout(args: &ParsedArgs, ctx: &AdministrationContext) -> Result<()> {
    submit(ctx, Task::ClusterCheckout { name: name(args)? })
}

fn list(args: &ParsedArgs, ctx: &AdministrationContext) -> Result<()> {
    submit(
        ctx,
        Task::ClusterList {
            verbose: args.flag("verbose"),
        },
    )
}

fn remove(args: &ParsedArgs, ctx: &AdministrationContext) -> Result<()> {
    submit(
        ctx,
        Task::ClusterRemove {
            name: name(args)?,
            force: args.flag("force"),
        },
    )
}

fn import(args: &ParsedArgs, ctx: &AdministrationContext) -> Result<()> {
    submit(
        ctx,
        Task::ClusterImport {
            name: name(args)?,
            database: super::path_arg(args, "database")?,
        },
    )
}

fn export(args: &ParsedArgs, ctx: &AdministrationContext) -> Result<()> {
    submit(
        ctx,
        Task::ClusterExport {
            name: name(args)?,
            output: super::path_arg(args, "output")?,
        },
    )
}
