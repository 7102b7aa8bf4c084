//! curveadm binary entrypoint.

use std::io;
use std::process::ExitCode;

use tracing::warn;
use tracing_subscriber::EnvFilter;

use curveadm::cli;
use curveadm::context::{default_home, AdministrationContext};
use curveadm::core::audit::AuditLog;
use curveadm::core::config::Config;

/// Environment variable overriding the configured log filter.
const LOG_ENV: &str = "CURVEADM_LOG";

/// Exit code for failures before any command could run.
const EXIT_FATAL: u8 = 2;

fn main() -> ExitCode {
    let home = default_home();

    let loaded = match Config::load(home.as_deref()) {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("curveadm: {e}");
            return ExitCode::from(EXIT_FATAL);
        }
    };

    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(loaded.config.log_level()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    for warning in &loaded.warnings {
        warn!(path = %warning.path.display(), "{}", warning.message);
    }

    let ctx = match &home {
        Some(home) => AdministrationContext::builder(loaded.config, home)
            .audit(AuditLog::in_home(home))
            .build(),
        None => {
            warn!("no home directory found, audit log disabled");
            AdministrationContext::builder(loaded.config, ".").build()
        }
    };

    let root = match cli::build_root(&ctx) {
        Ok(root) => root,
        Err(e) => {
            eprintln!("curveadm: {e}");
            return ExitCode::from(EXIT_FATAL);
        }
    };

    let argv: Vec<String> = std::env::args().skip(1).collect();
    ExitCode::from(cli::run(&root, argv.as_slice(), &ctx))
}
