//! upgrade
//!
//! Self-update routine behind the root `--upgrade`/`-u` flag.
//!
//! The dispatcher only decides *when* to upgrade; fetching and installing the
//! release is delegated to an [`Upgrader`]. The default [`ScriptUpgrader`]
//! asks for confirmation and pipes the published install script into bash.

use std::io::{self, IsTerminal, Write};
use std::process::Command;

use anyhow::{bail, Context as _, Result};

use crate::context::AdministrationContext;
use crate::ui::prompts::{self, PromptError};

/// Install script published with every release.
pub const INSTALL_SCRIPT_URL: &str = "https://curveadm.nos-eastchina1.126.net/script/install.sh";

/// Replaces the running curveadm with the latest release.
pub trait Upgrader {
    /// Perform the upgrade.
    fn upgrade(&self, ctx: &AdministrationContext) -> Result<()>;
}

/// Upgrades by running the release install script.
#[derive(Debug, Clone)]
pub struct ScriptUpgrader {
    script_url: String,
}

impl ScriptUpgrader {
    /// Upgrader fetching the install script from `script_url`.
    pub fn new(script_url: impl Into<String>) -> Self {
        Self {
            script_url: script_url.into(),
        }
    }

    /// Shell pipeline that downloads and runs the install script.
    pub fn pipeline(&self) -> String {
        format!("curl -fsSL {} | bash -s upgrade", self.script_url)
    }
}

impl Default for ScriptUpgrader {
    fn default() -> Self {
        Self::new(INSTALL_SCRIPT_URL)
    }
}

impl Upgrader for ScriptUpgrader {
    fn upgrade(&self, ctx: &AdministrationContext) -> Result<()> {
        let interactive = io::stdin().is_terminal();
        let confirmed = {
            let mut err = ctx.err();
            prompts::confirm(
                "Upgrade curveadm to the latest version?",
                false,
                interactive,
                &mut io::stdin().lock(),
                &mut *err,
            )
        };

        match confirmed {
            Ok(true) => {}
            Ok(false) | Err(PromptError::Cancelled) => {
                writeln!(ctx.err(), "Upgrade abort")?;
                return Ok(());
            }
            Err(PromptError::NotInteractive) => {
                bail!("refusing to upgrade without confirmation: stdin is not a terminal")
            }
            Err(e) => return Err(e.into()),
        }

        tracing::info!(script = %self.script_url, "upgrading curveadm");
        let status = Command::new("bash")
            .arg("-c")
            .arg(self.pipeline())
            .status()
            .context("failed to launch install script")?;

        if !status.success() {
            bail!("upgrade failed: install script exited with {}", status);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pipeline_runs_install_script_in_upgrade_mode() {
        let upgrader = ScriptUpgrader::new("https://example.com/install.sh");
        assert_eq!(
            upgrader.pipeline(),
            "curl -fsSL https://example.com/install.sh | bash -s upgrade"
        );
    }

    #[test]
    fn default_uses_release_script() {
        assert!(ScriptUpgrader::default()
            .pipeline()
            .contains(INSTALL_SCRIPT_URL));
    }
}
