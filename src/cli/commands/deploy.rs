//! deploy command - Deploy the current cluster

use anyhow::Result;

use super::{owned_values, submit};
use crate::cli::command::{Command, Flag};
use crate::cli::parse::ParsedArgs;
use crate::context::AdministrationContext;
use crate::orchestrator::Task;

const DEPLOY_EXAMPLE: &str = "Examples:
  $ curveadm deploy                          # Deploy current cluster
  $ curveadm deploy --skip snapshotclone     # Deploy cluster without snapshotclone
  $ curveadm deploy --insecure               # Deploy cluster without precheck";

pub fn new_deploy_command(_ctx: &AdministrationContext) -> Command {
    Command::leaf("deploy", "Deploy cluster", deploy)
        .usage("deploy [OPTIONS]")
        .example(DEPLOY_EXAMPLE)
        .flag(Flag::list("skip", "Specify skipped service roles").value_name("role"))
        .flag(Flag::bool("insecure", "Deploy without precheck").short('k'))
        .flag(Flag::string("poolset", "Specify the poolset name").default_value("default"))
        .flag(Flag::bool("yes", "Skip the confirmation prompt").short('y'))
}

fn deploy(args: &ParsedArgs, ctx: &AdministrationContext) -> Result<()> {
    submit(
        ctx,
        Task::Deploy {
            skip: owned_values(args, "skip"),
            insecure: args.flag("insecure"),
            poolset: args.value("poolset").map(str::to_string),
            skip_confirm: args.flag("yes"),
        },
    )
}
