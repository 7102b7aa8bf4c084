//! context
//!
//! The administration context shared by every command.
//!
//! # Design
//!
//! Exactly one [`AdministrationContext`] is built per process, before the
//! command tree is assembled. Command constructors and actions receive it by
//! reference; nothing reaches it through global state. Tests build their own
//! context with in-memory streams and fake collaborators.
//!
//! # Example
//!
//! ```
//! use curveadm::context::{AdministrationContext, SharedBuffer};
//! use curveadm::core::config::Config;
//! use std::io::Write;
//!
//! let out = SharedBuffer::default();
//! let ctx = AdministrationContext::builder(Config::default(), "/tmp/curveadm")
//!     .stdout(out.clone())
//!     .build();
//!
//! writeln!(ctx.out(), "hello").unwrap();
//! assert_eq!(out.contents(), "hello\n");
//! ```

use std::cell::{RefCell, RefMut};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::rc::Rc;

use crate::core::audit::AuditLog;
use crate::core::config::Config;
use crate::orchestrator::{DryRunOrchestrator, Orchestrator};
use crate::upgrade::{ScriptUpgrader, Upgrader};

/// Process-wide handle passed to every command.
pub struct AdministrationContext {
    config: Config,
    home: PathBuf,
    out: RefCell<Box<dyn Write>>,
    err: RefCell<Box<dyn Write>>,
    orchestrator: Box<dyn Orchestrator>,
    upgrader: Box<dyn Upgrader>,
    audit: Option<AuditLog>,
}

impl AdministrationContext {
    /// Start building a context from a loaded config and the curveadm home.
    pub fn builder(config: Config, home: impl Into<PathBuf>) -> ContextBuilder {
        ContextBuilder {
            config,
            home: home.into(),
            out: None,
            err: None,
            orchestrator: None,
            upgrader: None,
            audit: None,
        }
    }

    /// Loaded configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The curveadm home directory (`~/.curveadm` by default).
    pub fn home(&self) -> &Path {
        &self.home
    }

    /// Output stream.
    ///
    /// The returned guard must not be held across a call that writes to the
    /// same stream.
    pub fn out(&self) -> RefMut<'_, Box<dyn Write>> {
        self.out.borrow_mut()
    }

    /// Error stream.
    pub fn err(&self) -> RefMut<'_, Box<dyn Write>> {
        self.err.borrow_mut()
    }

    /// The orchestration backend leaf commands hand their tasks to.
    pub fn orchestrator(&self) -> &dyn Orchestrator {
        self.orchestrator.as_ref()
    }

    /// The self-update routine behind `curveadm -u`.
    pub fn upgrader(&self) -> &dyn Upgrader {
        self.upgrader.as_ref()
    }

    /// Audit log, if enabled.
    pub fn audit(&self) -> Option<&AuditLog> {
        self.audit.as_ref()
    }
}

impl std::fmt::Debug for AdministrationContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdministrationContext")
            .field("config", &self.config)
            .field("home", &self.home)
            .field("audit", &self.audit)
            .finish_non_exhaustive()
    }
}

/// Builder for [`AdministrationContext`].
///
/// Anything left unset falls back to the production default: process
/// stdout/stderr, the dry-run orchestrator, the install-script upgrader and
/// no audit log.
pub struct ContextBuilder {
    config: Config,
    home: PathBuf,
    out: Option<Box<dyn Write>>,
    err: Option<Box<dyn Write>>,
    orchestrator: Option<Box<dyn Orchestrator>>,
    upgrader: Option<Box<dyn Upgrader>>,
    audit: Option<AuditLog>,
}

impl ContextBuilder {
    /// Replace the output stream.
    pub fn stdout(mut self, out: impl Write + 'static) -> Self {
        self.out = Some(Box::new(out));
        self
    }

    /// Replace the error stream.
    pub fn stderr(mut self, err: impl Write + 'static) -> Self {
        self.err = Some(Box::new(err));
        self
    }

    /// Install an orchestration backend.
    pub fn orchestrator(mut self, orchestrator: impl Orchestrator + 'static) -> Self {
        self.orchestrator = Some(Box::new(orchestrator));
        self
    }

    /// Install a self-update routine.
    pub fn upgrader(mut self, upgrader: impl Upgrader + 'static) -> Self {
        self.upgrader = Some(Box::new(upgrader));
        self
    }

    /// Enable the audit log.
    pub fn audit(mut self, audit: AuditLog) -> Self {
        self.audit = Some(audit);
        self
    }

    /// Finish building.
    pub fn build(self) -> AdministrationContext {
        AdministrationContext {
            config: self.config,
            home: self.home,
            out: RefCell::new(self.out.unwrap_or_else(|| Box::new(io::stdout()))),
            err: RefCell::new(self.err.unwrap_or_else(|| Box::new(io::stderr()))),
            orchestrator: self
                .orchestrator
                .unwrap_or_else(|| Box::new(DryRunOrchestrator)),
            upgrader: self
                .upgrader
                .unwrap_or_else(|| Box::new(ScriptUpgrader::default())),
            audit: self.audit,
        }
    }
}

/// Clonable in-memory writer for capturing a context's streams.
#[derive(Debug, Clone, Default)]
pub struct SharedBuffer(Rc<RefCell<Vec<u8>>>);

impl SharedBuffer {
    /// Everything written so far, lossily decoded.
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.borrow()).into_owned()
    }

    /// True if nothing has been written.
    pub fn is_empty(&self) -> bool {
        self.0.borrow().is_empty()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Resolve the curveadm home directory.
///
/// `$CURVEADM_HOME` wins, then `~/.curveadm`. Returns `None` when no home
/// directory can be determined.
pub fn default_home() -> Option<PathBuf> {
    if let Ok(home) = std::env::var("CURVEADM_HOME") {
        if !home.is_empty() {
            return Some(PathBuf::from(home));
        }
    }
    dirs::home_dir().map(|home| home.join(".curveadm"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn streams_are_captured_separately() {
        let out = SharedBuffer::default();
        let err = SharedBuffer::default();
        let ctx = AdministrationContext::builder(Config::default(), "/tmp/home")
            .stdout(out.clone())
            .stderr(err.clone())
            .build();

        write!(ctx.out(), "to out").unwrap();
        write!(ctx.err(), "to err").unwrap();

        assert_eq!(out.contents(), "to out");
        assert_eq!(err.contents(), "to err");
    }

    #[test]
    fn audit_is_disabled_by_default() {
        let ctx = AdministrationContext::builder(Config::default(), "/tmp/home").build();
        assert!(ctx.audit().is_none());
        assert_eq!(ctx.home(), Path::new("/tmp/home"));
    }

    #[test]
    fn shared_buffer_starts_empty() {
        let buf = SharedBuffer::default();
        assert!(buf.is_empty());
        assert_eq!(buf.contents(), "");
    }
}
