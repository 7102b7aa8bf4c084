//! cli::registry
//!
//! Assembly of the root command.
//!
//! # Design
//!
//! Every subsystem exposes one [`Constructor`]: a function taking the shared
//! [`AdministrationContext`] and returning a fully formed [`Command`]. The
//! registry is a fixed, ordered slice of those constructors. Assembly calls
//! each exactly once, in order, and attaches the result under the root.
//! Order only affects help listings; matching is by exact name.
//!
//! Duplicate sibling names anywhere in the tree are reported as a
//! [`RegistrationConflict`] before any command runs.

use crate::cli::command::{Command, Flag};
use crate::cli::commands::REGISTRY;
use crate::cli::errors::RegistrationConflict;
use crate::cli::presentation::{
    curveadm_flag_error, curveadm_help, curveadm_usage, curveadm_version, FlagErrorFunc,
    HelpTemplate, Presentation, UsageTemplate, VersionTemplate,
};
use crate::context::AdministrationContext;

/// Builds one top-level command.
pub type Constructor = fn(&AdministrationContext) -> Command;

/// Name of the root command and the binary.
pub const ROOT_NAME: &str = "curveadm";

/// Version reported by `curveadm --version`.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

const CURVEADM_EXAMPLE: &str = "Examples:
  $ curveadm cluster add c1      # Add a cluster named 'c1'
  $ curveadm deploy              # Deploy current cluster
  $ curveadm stop                # Stop current cluster service
  $ curveadm clean               # Clean current cluster
  $ curveadm enter 6ff561598c6f  # Enter specified service container
  $ curveadm -u                  # Upgrade curveadm itself to the latest version";

/// The assembled, immutable root of the command tree.
#[derive(Debug, Clone)]
pub struct Root {
    command: Command,
    version: &'static str,
    presentation: Presentation,
}

impl Root {
    /// Wrap an assembled root command with default presentation.
    pub fn new(command: Command, version: &'static str) -> Self {
        Self {
            command,
            version,
            presentation: Presentation::default(),
        }
    }

    pub fn command(&self) -> &Command {
        &self.command
    }

    pub fn name(&self) -> &'static str {
        self.command.name()
    }

    pub fn version(&self) -> &'static str {
        self.version
    }

    pub fn presentation(&self) -> &Presentation {
        &self.presentation
    }

    pub fn set_version_template(&mut self, template: VersionTemplate) {
        self.presentation.version = template;
    }

    pub fn set_help_template(&mut self, template: HelpTemplate) {
        self.presentation.help = template;
    }

    pub fn set_usage_template(&mut self, template: UsageTemplate) {
        self.presentation.usage = template;
    }

    pub fn set_flag_error_func(&mut self, func: FlagErrorFunc) {
        self.presentation.flag_error = func;
    }
}

/// The root command with its global flags over `children`.
pub fn root_command(children: Vec<Command>) -> Command {
    Command::group(ROOT_NAME, "Deploy and manage CurveBS/CurveFS cluster", children)
        .usage("curveadm [OPTIONS] COMMAND [ARGS...]")
        .example(CURVEADM_EXAMPLE)
        .flag(Flag::bool("version", "Print version information and quit").short('v'))
        .flag(Flag::bool("help", "Print usage").short('h').persistent())
        .flag(Flag::bool("upgrade", "Upgrade curveadm itself to the latest version").short('u'))
}

/// Call every constructor once, in order, and attach the results to a root.
///
/// # Errors
///
/// Returns [`RegistrationConflict`] if two siblings anywhere in the tree
/// share a name.
pub fn assemble(
    ctx: &AdministrationContext,
    constructors: &[Constructor],
) -> Result<Root, RegistrationConflict> {
    let children: Vec<Command> = constructors.iter().map(|build| build(ctx)).collect();
    let command = root_command(children);
    check_unique(&command, ROOT_NAME)?;
    Ok(Root::new(command, VERSION))
}

/// Install the curveadm templates on an assembled root.
pub fn setup_root(root: &mut Root) {
    root.set_version_template(curveadm_version);
    root.set_flag_error_func(curveadm_flag_error);
    root.set_help_template(curveadm_help);
    root.set_usage_template(curveadm_usage);
}

/// Build the production root: every registered command plus presentation.
pub fn build_root(ctx: &AdministrationContext) -> Result<Root, RegistrationConflict> {
    let mut root = assemble(ctx, REGISTRY)?;
    setup_root(&mut root);
    Ok(root)
}

fn check_unique(cmd: &Command, path: &str) -> Result<(), RegistrationConflict> {
    let children = cmd.children();
    for (i, child) in children.iter().enumerate() {
        if children[..i].iter().any(|seen| seen.name() == child.name()) {
            return Err(RegistrationConflict {
                parent: path.to_string(),
                name: child.name().to_string(),
            });
        }
        check_unique(child, &format!("{} {}", path, child.name()))?;
    }
    Ok(())
}
