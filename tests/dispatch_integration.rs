//! Integration tests for command dispatch.
//!
//! These tests run the production command tree against an in-memory context
//! with recording collaborators, so every assertion is about routing and
//! presentation rather than about what a deployment backend would do.

use std::cell::RefCell;
use std::rc::Rc;

use anyhow::{bail, Result};
use tempfile::TempDir;

use curveadm::cli::{self, build_root, dispatch, DispatchError, FlagErrorKind, Outcome, Root};
use curveadm::context::{AdministrationContext, SharedBuffer};
use curveadm::core::audit::AuditLog;
use curveadm::core::config::Config;
use curveadm::orchestrator::{Orchestrator, ServiceFilter, Task};
use curveadm::upgrade::Upgrader;

// =============================================================================
// Test Fixtures
// =============================================================================

/// Records every task instead of executing it.
#[derive(Clone, Default)]
struct RecordingOrchestrator {
    tasks: Rc<RefCell<Vec<Task>>>,
    fail: bool,
}

impl Orchestrator for RecordingOrchestrator {
    fn execute(&self, task: &Task, _ctx: &AdministrationContext) -> Result<()> {
        self.tasks.borrow_mut().push(task.clone());
        if self.fail {
            bail!("ssh: connect to host 10.0.1.1 port 22: Connection refused");
        }
        Ok(())
    }
}

/// Counts upgrade invocations.
#[derive(Clone, Default)]
struct RecordingUpgrader {
    calls: Rc<RefCell<usize>>,
}

impl Upgrader for RecordingUpgrader {
    fn upgrade(&self, _ctx: &AdministrationContext) -> Result<()> {
        *self.calls.borrow_mut() += 1;
        Ok(())
    }
}

struct Harness {
    root: Root,
    ctx: AdministrationContext,
    out: SharedBuffer,
    err: SharedBuffer,
    orchestrator: RecordingOrchestrator,
    upgrader: RecordingUpgrader,
    _home: TempDir,
}

impl Harness {
    fn new() -> Self {
        Self::with_orchestrator(RecordingOrchestrator::default())
    }

    fn failing() -> Self {
        Self::with_orchestrator(RecordingOrchestrator {
            fail: true,
            ..RecordingOrchestrator::default()
        })
    }

    fn with_orchestrator(orchestrator: RecordingOrchestrator) -> Self {
        let home = TempDir::new().expect("failed to create temp dir");
        let out = SharedBuffer::default();
        let err = SharedBuffer::default();
        let upgrader = RecordingUpgrader::default();
        let ctx = AdministrationContext::builder(Config::default(), home.path())
            .stdout(out.clone())
            .stderr(err.clone())
            .orchestrator(orchestrator.clone())
            .upgrader(upgrader.clone())
            .audit(AuditLog::in_home(home.path()))
            .build();
        let root = build_root(&ctx).expect("registry has conflicts");

        Self {
            root,
            ctx,
            out,
            err,
            orchestrator,
            upgrader,
            _home: home,
        }
    }

    fn dispatch(&self, argv: &[&str]) -> Result<Outcome, DispatchError> {
        dispatch(&self.root, argv, &self.ctx)
    }

    fn tasks(&self) -> Vec<Task> {
        self.orchestrator.tasks.borrow().clone()
    }

    fn upgrades(&self) -> usize {
        *self.upgrader.calls.borrow()
    }
}

const TOP_LEVEL: &[&str] = &[
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
];

// =============================================================================
// Registration
// =============================================================================

#[test]
fn every_top_level_command_is_registered_once() {
    let h = Harness::new();
    let names: Vec<_> = h
        .root
        .command()
        .children()
        .iter()
        .map(|c| c.name())
        .collect();
    assert_eq!(names, TOP_LEVEL);
}

#[test]
fn root_help_lists_commands_in_registration_order() {
    let h = Harness::new();
    assert_eq!(h.dispatch(&[]).unwrap(), Outcome::HelpShown);

    let help = h.err.contents();
    let mut last = 0;
    for name in TOP_LEVEL {
        let needle = format!("\n  {name} ");
        let position = help
            .find(&needle)
            .unwrap_or_else(|| panic!("{name} missing from help"));
        assert!(position >= last, "{name} out of order");
        last = position;
    }
    assert!(h.tasks().is_empty());
}

#[test]
fn groups_list_their_children() {
    let h = Harness::new();
    for (group, children) in [
        ("cluster", &["add", "checkout", "ls", "rm", "import", "export"][..]),
        ("config", &["show", "diff", "commit"][..]),
        ("target", &["add", "rm", "ls", "start", "stop"][..]),
        ("plugin", &["install", "rm", "ls", "run"][..]),
        ("playground", &["run", "enter", "ls", "rm"][..]),
    ] {
        let node = h.root.command().find_child(group).unwrap();
        let names: Vec<_> = node.children().iter().map(|c| c.name()).collect();
        assert_eq!(names, children, "{group}");
    }
}

// =============================================================================
// Routing
// =============================================================================

#[test]
fn cluster_add_receives_positional() {
    let h = Harness::new();
    assert_eq!(h.dispatch(&["cluster", "add", "c1"]).unwrap(), Outcome::Executed);
    assert_eq!(
        h.tasks(),
        vec![Task::ClusterAdd {
            name: "c1".to_string(),
            description: None,
            topology: None,
        }]
    );
}

#[test]
fn top_level_and_nested_start_are_distinct() {
    let h = Harness::new();
    h.dispatch(&["start"]).unwrap();
    h.dispatch(&["target", "start"]).unwrap();
    assert_eq!(
        h.tasks(),
        vec![
            Task::Start(ServiceFilter::default()),
            Task::TargetStart {
                host: "localhost".to_string()
            },
        ]
    );
}

#[test]
fn unknown_top_level_command() {
    let h = Harness::new();
    let err = h.dispatch(&["bogus"]).unwrap_err();
    assert_eq!(
        err.to_string(),
        "curveadm: 'bogus' is not a curveadm command.\nSee 'curveadm --help'"
    );
    assert!(h.tasks().is_empty());
}

#[test]
fn unknown_nested_command() {
    let h = Harness::new();
    let err = h.dispatch(&["cluster", "bogus"]).unwrap_err();
    match &err {
        DispatchError::UnknownCommand {
            token, parent_path, ..
        } => {
            assert_eq!(token, "bogus");
            assert_eq!(parent_path, "curveadm cluster");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(
        err.to_string(),
        "curveadm: 'bogus' is not a curveadm cluster command.\nSee 'curveadm cluster --help'"
    );
}

#[test]
fn names_are_matched_exactly() {
    let h = Harness::new();
    for token in ["Deploy", "dep", "cluster-add", "scaleout"] {
        assert!(
            matches!(
                h.dispatch(&[token]),
                Err(DispatchError::UnknownCommand { .. })
            ),
            "{token}"
        );
    }
    assert!(h.tasks().is_empty());
}

// =============================================================================
// Help, version, upgrade
// =============================================================================

#[test]
fn help_succeeds_at_every_depth() {
    let h = Harness::new();
    for argv in [
        &["--help"][..],
        &["-h"][..],
        &["cluster", "--help"][..],
        &["cluster", "add", "-h"][..],
        &["deploy", "--bogus", "--help"][..],
        &["status", "--verbose=maybe", "-h"][..],
        &["-uh"][..],
        &["-vh"][..],
        &["status", "-vh"][..],
        &["cluster", "rm", "c1", "-fh"][..],
        &["deploy", "--help=true"][..],
    ] {
        assert_eq!(h.dispatch(argv).unwrap(), Outcome::HelpShown, "{argv:?}");
    }
    assert!(h.tasks().is_empty());
    assert_eq!(h.upgrades(), 0);
    assert!(h.err.is_empty());
    assert!(h.out.contents().contains("Usage:  curveadm cluster add CLUSTER [OPTIONS]"));
    assert!(!h.out.contents().contains("CurveAdm v"));
}

#[test]
fn help_after_terminator_is_an_argument() {
    let h = Harness::new();
    h.dispatch(&["enter", "--", "--help"]).unwrap();
    assert_eq!(
        h.tasks(),
        vec![Task::Enter {
            id: "--help".to_string(),
            home: None,
        }]
    );
}

#[test]
fn version_flag() {
    let h = Harness::new();
    assert_eq!(h.dispatch(&["--version"]).unwrap(), Outcome::VersionShown);
    assert_eq!(
        h.out.contents(),
        format!("CurveAdm v{}\n", env!("CARGO_PKG_VERSION"))
    );
}

#[test]
fn upgrade_shortcut_skips_routing() {
    let h = Harness::new();
    assert_eq!(h.dispatch(&["-u", "deploy"]).unwrap(), Outcome::Upgraded);
    assert_eq!(h.upgrades(), 1);
    assert!(h.tasks().is_empty());
}

#[test]
fn upgrade_subcommand_is_not_the_shortcut() {
    let h = Harness::new();
    assert_eq!(h.dispatch(&["upgrade"]).unwrap(), Outcome::Executed);
    assert_eq!(h.upgrades(), 0);
    assert_eq!(h.tasks()[0].name(), "upgrade");
}

#[test]
fn help_beats_version_and_upgrade() {
    let h = Harness::new();
    assert_eq!(h.dispatch(&["-v", "-u", "-h"]).unwrap(), Outcome::HelpShown);
    assert_eq!(h.upgrades(), 0);
}

#[test]
fn version_beats_upgrade() {
    let h = Harness::new();
    assert_eq!(h.dispatch(&["-u", "-v"]).unwrap(), Outcome::VersionShown);
    assert_eq!(h.upgrades(), 0);
}

// =============================================================================
// Errors
// =============================================================================

#[test]
fn bad_bool_value_never_reaches_the_action() {
    let h = Harness::new();
    let err = h.dispatch(&["deploy", "--insecure=perhaps"]).unwrap_err();
    match &err {
        DispatchError::FlagParse(flag_err) => {
            assert_eq!(flag_err.kind, FlagErrorKind::InvalidValue);
            assert!(flag_err.usage.contains("Usage:  curveadm deploy [OPTIONS]"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(h.tasks().is_empty());
}

#[test]
fn repeated_flags_keep_the_last_value() {
    let h = Harness::new();
    assert_eq!(
        h.dispatch(&["cluster", "add", "c1", "-d", "a", "-d", "b"]).unwrap(),
        Outcome::Executed
    );
    assert_eq!(
        h.dispatch(&["status", "-v", "-v"]).unwrap(),
        Outcome::Executed
    );

    let tasks = h.tasks();
    assert!(matches!(
        &tasks[0],
        Task::ClusterAdd { description: Some(d), .. } if d == "b"
    ));
    assert!(matches!(tasks[1], Task::Status { verbose: true, .. }));
}

#[test]
fn action_errors_propagate_and_are_reported() {
    let h = Harness::failing();
    assert_eq!(cli::run(&h.root, &["stop"], &h.ctx), 1);
    assert_eq!(
        h.err.contents(),
        "Error: ssh: connect to host 10.0.1.1 port 22: Connection refused\n"
    );
}

// =============================================================================
// Audit
// =============================================================================

#[test]
fn leaf_invocations_are_audited() {
    let h = Harness::new();
    h.dispatch(&["cluster", "checkout", "c1"]).unwrap();
    h.dispatch(&["--help"]).unwrap();
    let _ = h.dispatch(&["bogus"]);

    let entries = h.ctx.audit().unwrap().entries().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].command, "curveadm cluster checkout c1");
    assert!(entries[0].success);
}

#[test]
fn failed_actions_are_audited_as_failures() {
    let h = Harness::failing();
    let _ = h.dispatch(&["restart", "--role", "etcd"]);

    let entries = h.ctx.audit().unwrap().entries().unwrap();
    assert_eq!(entries.len(), 1);
    assert!(!entries[0].success);
}
