//! orchestrator
//!
//! Seam between leaf commands and the subsystems that actually touch hosts.
//!
//! # Design
//!
//! Leaf actions never talk to SSH, containers or topology files themselves.
//! They translate their parsed flags into a typed [`Task`] and hand it to the
//! [`Orchestrator`] installed in the administration context. The binary
//! ships [`DryRunOrchestrator`], which reports the resolved task; deployment
//! backends plug in behind the same trait.

use std::io::Write;
use std::path::PathBuf;

use anyhow::Result;
use serde::Serialize;

use crate::context::AdministrationContext;

/// Selects the services an operation applies to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceFilter {
    /// Service id, `*` for all
    pub id: String,
    /// Service role, `*` for all
    pub role: String,
    /// Service host, `*` for all
    pub host: String,
}

impl Default for ServiceFilter {
    fn default() -> Self {
        Self {
            id: "*".to_string(),
            role: "*".to_string(),
            host: "*".to_string(),
        }
    }
}

/// A fully parsed unit of work for the orchestration backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "task", rename_all = "kebab-case")]
pub enum Task {
    Deploy {
        skip: Vec<String>,
        insecure: bool,
        poolset: Option<String>,
        skip_confirm: bool,
    },
    Start(ServiceFilter),
    Stop(ServiceFilter),
    Restart(ServiceFilter),
    Reload(ServiceFilter),
    Status {
        filter: ServiceFilter,
        verbose: bool,
        show_replicas: bool,
        with_dir: bool,
    },
    Clean {
        filter: ServiceFilter,
        only: Vec<String>,
        without: Vec<String>,
    },
    Upgrade {
        filter: ServiceFilter,
        force: bool,
    },
    ScaleOut {
        topology: PathBuf,
    },
    Migrate {
        topology: PathBuf,
    },
    Enter {
        id: String,
        home: Option<String>,
    },
    Mount {
        name: String,
        mount_point: String,
        host: String,
        client_config: PathBuf,
        fstype: String,
    },
    Umount {
        mount_point: String,
        host: String,
    },
    Check {
        topology: PathBuf,
        skip: Vec<String>,
    },
    Support,
    Format {
        config: PathBuf,
        status: bool,
        stop: bool,
    },
    Map {
        volume: String,
        host: String,
        create: bool,
        size: String,
        client_config: PathBuf,
    },
    Unmap {
        volume: String,
        host: String,
    },
    ClusterAdd {
        name: String,
        description: Option<String>,
        topology: Option<PathBuf>,
    },
    ClusterCheckout {
        name: String,
    },
    ClusterList {
        verbose: bool,
    },
    ClusterRemove {
        name: String,
        force: bool,
    },
    ClusterImport {
        name: String,
        database: PathBuf,
    },
    ClusterExport {
        name: String,
        output: PathBuf,
    },
    ConfigShow {
        decrypt: bool,
    },
    ConfigDiff {
        topology: PathBuf,
    },
    ConfigCommit {
        topology: PathBuf,
        force: bool,
        slient: bool,
    },
    TargetAdd {
        volume: String,
        host: String,
        create: bool,
        size: String,
    },
    TargetRemove {
        tid: String,
        host: String,
    },
    TargetList {
        host: String,
    },
    TargetStart {
        host: String,
    },
    TargetStop {
        host: String,
    },
    PluginInstall {
        name: String,
    },
    PluginRemove {
        name: String,
    },
    PluginList,
    PluginRun {
        name: String,
        hosts: String,
        args: Vec<String>,
    },
    PlaygroundRun {
        kind: String,
        container_image: Option<String>,
        mount: Option<String>,
    },
    PlaygroundEnter {
        id: String,
    },
    PlaygroundList,
    PlaygroundRemove {
        id: String,
    },
}

impl Task {
    /// Command path that produces this task, e.g. `cluster add`.
    pub fn name(&self) -> &'static str {
        match self {
            Task::Deploy { .. } => "deploy",
            Task::Start(_) => "start",
            Task::Stop(_) => "stop",
            Task::Restart(_) => "restart",
            Task::Reload(_) => "reload",
            Task::Status { .. } => "status",
            Task::Clean { .. } => "clean",
            Task::Upgrade { .. } => "upgrade",
            Task::ScaleOut { .. } => "scale-out",
            Task::Migrate { .. } => "migrate",
            Task::Enter { .. } => "enter",
            Task::Mount { .. } => "mount",
            Task::Umount { .. } => "umount",
            Task::Check { .. } => "check",
            Task::Support => "support",
            Task::Format { .. } => "format",
            Task::Map { .. } => "map",
            Task::Unmap { .. } => "unmap",
            Task::ClusterAdd { .. } => "cluster add",
            Task::ClusterCheckout { .. } => "cluster checkout",
            Task::ClusterList { .. } => "cluster ls",
            Task::ClusterRemove { .. } => "cluster rm",
            Task::ClusterImport { .. } => "cluster import",
            Task::ClusterExport { .. } => "cluster export",
            Task::ConfigShow { .. } => "config show",
            Task::ConfigDiff { .. } => "config diff",
            Task::ConfigCommit { .. } => "config commit",
            Task::TargetAdd { .. } => "target add",
            Task::TargetRemove { .. } => "target rm",
            Task::TargetList { .. } => "target ls",
            Task::TargetStart { .. } => "target start",
            Task::TargetStop { .. } => "target stop",
            Task::PluginInstall { .. } => "plugin install",
            Task::PluginRemove { .. } => "plugin rm",
            Task::PluginList => "plugin ls",
            Task::PluginRun { .. } => "plugin run",
            Task::PlaygroundRun { .. } => "playground run",
            Task::PlaygroundEnter { .. } => "playground enter",
            Task::PlaygroundList => "playground ls",
            Task::PlaygroundRemove { .. } => "playground rm",
        }
    }
}

/// Executes tasks produced by leaf commands.
pub trait Orchestrator {
    /// Run a task to completion. Errors propagate unchanged to the process
    /// exit path.
    fn execute(&self, task: &Task, ctx: &AdministrationContext) -> Result<()>;
}

/// Reports each task instead of executing it.
#[derive(Debug, Clone, Copy, Default)]
pub struct DryRunOrchestrator;

impl Orchestrator for DryRunOrchestrator {
    fn execute(&self, task: &Task, ctx: &AdministrationContext) -> Result<()> {
        let config = ctx.config();
        tracing::info!(
            task = task.name(),
            sudo = config.sudo_alias(),
            timeout_secs = config.timeout_secs(),
            ssh_retries = config.ssh_retries(),
            ssh_timeout_secs = config.ssh_timeout_secs(),
            "dry-run orchestrator received task"
        );
        let body = serde_json::to_string(task)?;
        writeln!(ctx.out(), "[dry-run] {}: {}", task.name(), body)?;
        Ok(())
    }
}
