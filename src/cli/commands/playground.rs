//! playground command - Single-host playground clusters

use anyhow::Result;

use super::submit;
use crate::cli::command::{Command, Flag, Positional};
use crate::cli::parse::ParsedArgs;
use crate::context::AdministrationContext;
use crate::orchestrator::Task;

fn playground_arg() -> Positional {
    Positional::required("id", "ID", "Playground id")
}

pub fn new_playground_command(ctx: &AdministrationContext) -> Command {
    Command::group(
        "playground",
        "Manage playground",
        vec![
            new_run_command(ctx),
            new_enter_command(ctx),
            new_list_command(ctx),
            new_remove_command(ctx),
        ],
    )
}

fn new_run_command(_ctx: &AdministrationContext) -> Command {
    Command::leaf("run", "Run playground", run)
        .usage("run [OPTIONS]")
        .flag(
            Flag::string("kind", "Specify the type of playground (curvebs/curvefs)")
                .short('k')
                .default_value("curvebs"),
        )
        .flag(Flag::string("container-image", "Specify the playground container image").short('c'))
        .flag(Flag::string("mount", "Specify the path to mount into the container"))
}

fn new_enter_command(_ctx: &AdministrationContext) -> Command {
    Command::leaf("enter", "Enter playground", enter)
        .usage("enter ID")
        .arg(playground_arg())
}

fn new_list_command(_ctx: &AdministrationContext) -> Command {
    Command::leaf("ls", "List playgrounds", list).usage("ls")
}

fn new_remove_command(_ctx: &AdministrationContext) -> Command {
    Command::leaf("rm", "Remove playground", remove)
        .usage("rm ID")
        .arg(playground_arg())
}

fn id(args: &ParsedArgs) -> Result<String> {
    args.require("id").map(str::to_string)
}

fn run(args: &ParsedArgs, ctx: &AdministrationContext) -> Result<()> {
    submit(
        ctx,
        Task::PlaygroundRun {
            kind: args.require("kind")?.to_string(),
            container_image: args.value("container-image").map(str::to_string),
            mount: args.value("mount").map(str::to_string),
        },
    )
}

fn enter(args: &ParsedArgs, ctx: &AdministrationContext) -> Result<()> {
    submit(ctx, Task::PlaygroundEnter { id: id(args)? })
}

fn list(_args: &ParsedArgs, ctx: &AdministrationContext) -> Result<()> {
    submit(ctx, Task::PlaygroundList)
}

fn remove(args: &ParsedArgs, ctx: &AdministrationContext) -> Result<()> {
    submit(ctx, Task::PlaygroundRemove { id: id(args)? })
}
