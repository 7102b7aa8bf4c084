//! completion command - Generate shell completion scripts

use anyhow::{anyhow, Result};
use clap::ValueEnum;
use clap_complete::{generate, shells};

use crate::cli::command::{Command, Positional};
use crate::cli::parse::{self, ParsedArgs};
use crate::cli::registry::ROOT_NAME;
use crate::context::AdministrationContext;

/// Supported shells for completion scripts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    #[value(name = "powershell")]
    PowerShell,
    Elvish,
}

pub fn new_completion_command(_ctx: &AdministrationContext) -> Command {
    Command::leaf("completion", "Generate shell completion script", completion)
        .usage("completion SHELL")
        .example(
            "Examples:
  $ curveadm completion bash > /etc/bash_completion.d/curveadm
  $ curveadm completion zsh > \"${fpath[1]}/_curveadm\"
  $ curveadm completion fish > ~/.config/fish/completions/curveadm.fish",
        )
        .arg(Positional::required(
            "shell",
            "SHELL",
            "bash, zsh, fish, powershell or elvish",
        ))
}

fn completion(args: &ParsedArgs, ctx: &AdministrationContext) -> Result<()> {
    let name = args.require("shell")?;
    let shell = Shell::from_str(name, true)
        .map_err(|_| anyhow!("unsupported shell '{}'", name))?;

    let mut cmd = parse::clap_tree(args.root());
    let mut out = ctx.out();

    match shell {
        Shell::Bash => generate(shells::Bash, &mut cmd, ROOT_NAME, &mut *out),
        Shell::Zsh => generate(shells::Zsh, &mut cmd, ROOT_NAME, &mut *out),
        Shell::Fish => generate(shells::Fish, &mut cmd, ROOT_NAME, &mut *out),
        Shell::PowerShell => generate(shells::PowerShell, &mut cmd, ROOT_NAME, &mut *out),
        Shell::Elvish => generate(shells::Elvish, &mut cmd, ROOT_NAME, &mut *out),
    }

    Ok(())
}
