//! Newtab error types
//!
//! - **`NewtabError`** - domain errors that surface to the operator. Display
//!   produces styled output; use `.into()` to convert to `anyhow::Error` while
//!   keeping the type available for `downcast_ref`.
//! - **`IpcError`** - failures talking to the terminal emulator. `Unavailable`
//!   is recoverable and routes the launcher to the fallback path.

use std::path::PathBuf;

use color_print::cformat;

use crate::styling::{error_message, hint_message};

/// Exit code for usage errors, matching clap's.
pub const USAGE_EXIT_CODE: i32 = 2;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NewtabError {
    /// Neither an inline command nor a script file was given
    NoCommand,
    /// More than one command source was given
    ConflictingCommands,
    /// `-s` points at a path that does not exist
    ScriptNotFound { path: PathBuf },
    /// `-d` points at a path that does not exist
    DirectoryNotFound { path: PathBuf },
    /// A script or directory path that can't be written into a shell record
    NonUtf8Path { path: PathBuf },
    /// `-w` names a window the emulator does not have
    WindowNotFound { id: u32, available: Vec<u32> },
}

impl NewtabError {
    pub fn is_usage(&self) -> bool {
        matches!(
            self,
            NewtabError::NoCommand
                | NewtabError::ConflictingCommands
                | NewtabError::ScriptNotFound { .. }
                | NewtabError::DirectoryNotFound { .. }
                | NewtabError::NonUtf8Path { .. }
        )
    }
}

impl std::error::Error for NewtabError {}

impl std::fmt::Display for NewtabError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NewtabError::NoCommand => write!(
                f,
                "{}\n{}",
                error_message("No command given"),
                hint_message(cformat!(
                    "Pass <bright-black>-e <<cmd>></>, <bright-black>-- <<cmd>>...</> or <bright-black>-s <<script>></>"
                ))
            ),
            NewtabError::ConflictingCommands => write!(
                f,
                "{}\n{}",
                error_message("More than one command given"),
                hint_message("Use exactly one of -e, -- or -s")
            ),
            NewtabError::ScriptNotFound { path } => {
                let path = path.display();
                write!(
                    f,
                    "{}",
                    error_message(cformat!("Script file <bold>{path}</> not found"))
                )
            }
            NewtabError::DirectoryNotFound { path } => {
                let path = path.display();
                write!(
                    f,
                    "{}",
                    error_message(cformat!("Directory <bold>{path}</> not found"))
                )
            }
            NewtabError::NonUtf8Path { path } => {
                let path = path.display();
                write!(
                    f,
                    "{}",
                    error_message(cformat!("Path <bold>{path}</> is not valid UTF-8"))
                )
            }
            NewtabError::WindowNotFound { id, available } => {
                write!(
                    f,
                    "{}",
                    error_message(cformat!("No terminal window with id <bold>{id}</>"))
                )?;
                if available.is_empty() {
                    Ok(())
                } else {
                    let ids = available
                        .iter()
                        .map(u32::to_string)
                        .collect::<Vec<_>>()
                        .join(", ");
                    write!(f, "\n{}", hint_message(format!("Available windows: {ids}")))
                }
            }
        }
    }
}

/// Errors from the terminal emulator's IPC surface.
#[derive(Debug)]
pub enum IpcError {
    /// No IPC endpoint answered (tool missing, service not registered)
    Unavailable(String),
    /// The endpoint answered but the call failed
    CallFailed { call: String, stderr: String },
}

impl IpcError {
    pub fn is_unavailable(&self) -> bool {
        matches!(self, IpcError::Unavailable(_))
    }
}

impl std::error::Error for IpcError {}

impl std::fmt::Display for IpcError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IpcError::Unavailable(reason) => write!(f, "terminal IPC unavailable: {reason}"),
            IpcError::CallFailed { call, stderr } => {
                write!(f, "{call} failed")?;
                let stderr = stderr.trim();
                if !stderr.is_empty() {
                    write!(f, ": {stderr}")?;
                }
                Ok(())
            }
        }
    }
}

/// Exit code for an error returned from a command handler.
pub fn exit_code(err: &anyhow::Error) -> i32 {
    match err.downcast_ref::<NewtabError>() {
        Some(e) if e.is_usage() => USAGE_EXIT_CODE,
        _ => 1,
    }
}
