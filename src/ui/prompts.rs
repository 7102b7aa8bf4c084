//! ui::prompts
//!
//! Interactive confirmations.
//!
//! # Design
//!
//! Prompts are only shown in interactive mode. In non-interactive mode,
//! operations requiring user input fail with [`PromptError::NotInteractive`]
//! so callers can decide on a safe default.

use std::io::{BufRead, Write};

use thiserror::Error;

/// Errors from prompts.
#[derive(Debug, Error)]
pub enum PromptError {
    #[error("prompt cancelled by user")]
    Cancelled,

    #[error("not in interactive mode")]
    NotInteractive,

    #[error("IO error: {0}")]
    IoError(String),
}

/// Prompt for confirmation (yes/no).
///
/// Writes `message [yes/no]: (default=...)` to `output` and reads one line
/// from `input`. An empty answer selects `default`. End of input cancels.
pub fn confirm<R: BufRead, W: Write>(
    message: &str,
    default: bool,
    interactive: bool,
    input: &mut R,
    output: &mut W,
) -> Result<bool, PromptError> {
    if !interactive {
        return Err(PromptError::NotInteractive);
    }

    let hint = if default { "yes" } else { "no" };
    write!(output, "{} [yes/no]: (default={}) ", message, hint)
        .and_then(|_| output.flush())
        .map_err(|e| PromptError::IoError(e.to_string()))?;

    let mut answer = String::new();
    let read = input
        .read_line(&mut answer)
        .map_err(|e| PromptError::IoError(e.to_string()))?;
    if read == 0 {
        return Err(PromptError::Cancelled);
    }

    Ok(match answer.trim().to_ascii_lowercase().as_str() {
        "" => default,
        "y" | "yes" => true,
        _ => false,
    })
}
