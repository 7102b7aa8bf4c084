//! cli::commands
//!
//! Constructors for every top-level command.
//!
//! # Architecture
//!
//! Each module exposes one constructor taking the administration context and
//! returning a fully formed [`Command`](crate::cli::command::Command). Grouping commands attach their
//! children inside the constructor. Leaf actions:
//! 1. Read their flags and positionals from [`ParsedArgs`]
//! 2. Build a typed [`Task`]
//! 3. Hand it to the context's orchestrator
//!
//! Actions do NOT talk to hosts, containers or topology files directly.

mod audit;
mod cluster;
mod completion;
mod config;
mod deploy;
mod lifecycle;
mod playground;
mod plugin;
mod service;
mod storage;
mod target;
mod topology;

pub use completion::Shell;

use std::path::PathBuf;

use anyhow::Result;

use crate::cli::command::Flag;
use crate::cli::parse::ParsedArgs;
use crate::cli::registry::Constructor;
use crate::context::AdministrationContext;
use crate::orchestrator::{ServiceFilter, Task};

/// Every top-level command, in help order.
pub const REGISTRY: &[Constructor] = &[
    cluster::new_cluster_command,
    config::new_config_command,
    target::new_target_command,
    plugin::new_plugin_command,
    playground::new_playground_command,
    deploy::new_deploy_command,
    lifecycle::new_start_command,
    lifecycle::new_stop_command,
    lifecycle::new_restart_command,
    lifecycle::new_reload_command,
    service::new_status_command,
    service::new_clean_command,
    service::new_upgrade_command,
    topology::new_scale_out_command,
    topology::new_migrate_command,
    service::new_enter_command,
    storage::new_mount_command,
    storage::new_umount_command,
    topology::new_check_command,
    service::new_support_command,
    storage::new_format_command,
    storage::new_map_command,
    storage::new_unmap_command,
    audit::new_audit_command,
    completion::new_completion_command,
];

/// `--id`, `--role` and `--host`, each defaulting to every service.
fn filter_flags() -> [Flag; 3] {
    [
        Flag::string("id", "Specify service id").default_value("*"),
        Flag::string("role", "Specify service role").default_value("*"),
        Flag::string("host", "Specify service host").default_value("*"),
    ]
}

/// Read the flags declared by [`filter_flags`].
fn service_filter(args: &ParsedArgs) -> ServiceFilter {
    let defaults = ServiceFilter::default();
    ServiceFilter {
        id: args.value("id").map_or(defaults.id, str::to_string),
        role: args.value("role").map_or(defaults.role, str::to_string),
        host: args.value("host").map_or(defaults.host, str::to_string),
    }
}

/// `--host` for commands that act on a single client host.
fn client_host_flag() -> Flag {
    Flag::string("host", "Specify target host").default_value("localhost")
}

fn owned_values(args: &ParsedArgs, name: &str) -> Vec<String> {
    args.values(name).into_iter().map(str::to_string).collect()
}

fn path_arg(args: &ParsedArgs, name: &str) -> Result<PathBuf> {
    args.require(name).map(PathBuf::from)
}

/// Hand a task to the orchestrator.
fn submit(ctx: &AdministrationContext, task: Task) -> Result<()> {
    ctx.orchestrator().execute(&task, ctx)
}


#[cfg(test)]
mod tests {
    use super::testing::run;
    use super::*;
    use crate::cli::command::Command;
    use crate::cli::dispatch::Outcome;

    #[test]
    fn registry_order_is_stable() {
        let ctx = AdministrationContext::builder(
            crate::core::config::Config::default(),
            "/tmp/curveadm",
        )
        .build();
        let names: Vec<_> = REGISTRY.iter().map(|build| build(&ctx).name()).collect();
        assert_eq!(
            names,
            vec![
                "cluster",
                "config",
                "target",
                "plugin",
                "playground",
                "deploy",
                "start",
                "stop",
                "restart",
                "reload",
                "status",
                "clean",
                "upgrade",
                "scale-out",
                "migrate",
                "enter",
                "mount",
                "umount",
                "check",
                "support",
                "format",
                "map",
                "unmap",
                "audit",
                "completion",
            ]
        );
    }

    #[test]
    fn no_leaf_shadows_the_help_shorthand() {
        fn walk(cmd: &Command) {
            for flag in cmd.flag_list() {
                if flag.name() != "help" {
                    assert_ne!(flag.short_alias(), Some('h'), "{}", cmd.name());
                }
            }
            for child in cmd.children() {
                walk(child);
            }
        }

        let ctx = AdministrationContext::builder(
            crate::core::config::Config::default(),
            "/tmp/curveadm",
        )
        .build();
        for build in REGISTRY {
            walk(&build(&ctx));
        }
    }

    #[test]
    fn service_filter_defaults_to_everything() {
        let run = run(lifecycle::new_start_command, &["start"]);
        assert!(matches!(run.result, Ok(Outcome::Executed)));
        assert_eq!(run.tasks, vec![Task::Start(ServiceFilter::default())]);
    }
}
