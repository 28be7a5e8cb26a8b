//! Terminal emulator IPC
//!
//! Konsole exposes each top-level window on D-Bus as
//! `/konsole/MainWindow_<N>` under its service name. Listing the service's
//! object paths enumerates the windows; activating the `new-tab` action on a
//! window opens a tab there. We drive both through a D-Bus command line tool
//! (`qdbus` by default) rather than linking a D-Bus client.

use std::process::Command;

use crate::config::Config;
use crate::error::IpcError;
use crate::shell_exec::run;

const WINDOW_PATH_PREFIX: &str = "/konsole/MainWindow_";

/// A live top-level terminal window, addressed by its ordinal.
///
/// Ordinals grow as windows are created, so the highest one is the newest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WindowNode {
    pub id: u32,
}

impl WindowNode {
    pub fn new(id: u32) -> Self {
        Self { id }
    }

    pub fn object_path(&self) -> String {
        format!("{WINDOW_PATH_PREFIX}{}", self.id)
    }
}

impl std::fmt::Display for WindowNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.id)
    }
}

/// The IPC operations the launcher needs from the emulator.
pub trait TerminalIpc {
    /// Enumerate live windows, ordered by ordinal.
    fn list_windows(&self) -> Result<Vec<WindowNode>, IpcError>;

    /// Open a new tab in `window`.
    fn new_tab(&self, window: &WindowNode) -> Result<(), IpcError>;
}

/// Konsole over D-Bus, via a `qdbus`-compatible tool.
#[derive(Debug, Clone)]
pub struct KonsoleIpc {
    tool: String,
    service: String,
}

impl KonsoleIpc {
    pub fn new(tool: impl Into<String>, service: impl Into<String>) -> Self {
        Self {
            tool: tool.into(),
            service: service.into(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.ipc_tool(), config.service())
    }

    fn call(&self, args: &[&str]) -> Result<std::process::Output, IpcError> {
        let mut cmd = Command::new(&self.tool);
        cmd.arg(&self.service).args(args);
        run(&mut cmd, Some("ipc")).map_err(|e| {
            IpcError::Unavailable(format!("could not run {}: {e}", self.tool))
        })
    }

    fn describe(&self, args: &[&str]) -> String {
        let mut call = format!("{} {}", self.tool, self.service);
        for arg in args {
            call.push(' ');
            call.push_str(arg);
        }
        call
    }
}

impl TerminalIpc for KonsoleIpc {
    fn list_windows(&self) -> Result<Vec<WindowNode>, IpcError> {
        let output = self.call(&[])?;
        if !output.status.success() {
            // qdbus exits non-zero when the service isn't registered
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(IpcError::Unavailable(format!(
                "{} did not answer: {}",
                self.service,
                stderr.trim()
            )));
        }
        Ok(parse_window_nodes(&String::from_utf8_lossy(&output.stdout)))
    }

    fn new_tab(&self, window: &WindowNode) -> Result<(), IpcError> {
        let path = window.object_path();
        let args = [
            path.as_str(),
            "org.kde.KMainWindow.activateAction",
            "new-tab",
        ];
        let output = self.call(&args)?;
        if output.status.success() {
            Ok(())
        } else {
            Err(IpcError::CallFailed {
                call: self.describe(&args),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            })
        }
    }
}

/// Extract window nodes from a D-Bus object path listing.
///
/// Only exact `/konsole/MainWindow_<N>` paths count; nested action paths and
/// anything unparsable are skipped.
pub fn parse_window_nodes(listing: &str) -> Vec<WindowNode> {
    let mut nodes: Vec<WindowNode> = listing
        .lines()
        .filter_map(|line| line.trim().strip_prefix(WINDOW_PATH_PREFIX))
        .filter_map(|id| id.parse().ok())
        .map(WindowNode::new)
        .collect();
    nodes.sort();
    nodes.dedup();
    nodes
}
