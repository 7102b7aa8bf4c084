//! config command - Manage the topology of the current cluster

use anyhow::Result;

use super::{path_arg, submit};
use crate::cli::command::{Command, Flag, Positional};
use crate::cli::parse::ParsedArgs;
use crate::context::AdministrationContext;
use crate::orchestrator::Task;

pub fn new_config_command(ctx: &AdministrationContext) -> Command {
    Command::group(
        "config",
        "Manage cluster topology",
        vec![
            new_show_command(ctx),
            new_diff_command(ctx),
            new_commit_command(ctx),
        ],
    )
}

fn new_show_command(_ctx: &AdministrationContext) -> Command {
    Command::leaf("show", "Show cluster topology", show)
        .usage("show [OPTIONS]")
        .flag(Flag::bool("decrypt", "Decrypt the topology before printing"))
}

fn new_diff_command(_ctx: &AdministrationContext) -> Command {
    Command::leaf("diff", "Diff topology", diff)
        .usage("diff TOPOLOGY")
        .arg(Positional::required("topology", "TOPOLOGY", "Topology file"))
}

fn new_commit_command(_ctx: &AdministrationContext) -> Command {
    Command::leaf("commit", "Commit cluster topology", commit)
        .usage("commit TOPOLOGY [OPTIONS]")
        .arg(Positional::required("topology", "TOPOLOGY", "Topology file"))
        .flag(Flag::bool("force", "Commit topology by force").short('f'))
        .flag(Flag::bool("slient", "Slient output for config commit").short('s'))
}

fn show(args: &ParsedArgs, ctx: &AdministrationContext) -> Result<()> {
    submit(
        ctx,
        Task::ConfigShow {
            decrypt: args.flag("decrypt"),
        },
    )
}

fn diff(args: &ParsedArgs, ctx: &AdministrationContext) -> Result<()> {
    let topology = path_arg(args, "topology")?;
    submit(ctx, Task::ConfigDiff { topology })
}

fn commit(args: &ParsedArgs, ctx: &AdministrationContext) -> Result<()> {
    submit(
        ctx,
        Task::ConfigCommit {
            topology: path_arg(args, "topology")?,
            force: args.flag("force"),
            slient: args.flag("slient"),
        },
    )
}

#[cfg(test)]
mod tests {
    use super::super::testing::task;
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn commit_flags() {
        assert_eq!(
            task(
                new_config_command,
                &["config", "commit", "topology.yaml", "-f", "--slient"]
            ),
            Task::ConfigCommit {
                topology: PathBuf::from("topology.yaml"),
                force: true,
                slient: true,
            }
        );
    }

    #[test]
    fn show_defaults_to_encrypted() {
        assert_eq!(
            task(new_config_command, &["config", "show"]),
            Task::ConfigShow { decrypt: false }
        );
    }
}
