//! New-window fallback
//!
//! When no tab can be opened over IPC, the record is embedded in a standalone
//! launcher script and a fresh emulator window is started on it. The script
//! ends by replacing itself with an interactive shell so the window stays
//! usable after the command finishes.

use std::borrow::Cow;
use std::io::Write as _;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::Duration;

use anyhow::Context;
use shell_escape::unix::escape;

use crate::config::Config;
use crate::pending::{PendingRecord, PendingSlot};
use crate::shell_exec;

/// Creates top-level emulator windows and cleans up after them.
pub trait WindowSpawner {
    /// Open a new top-level window running `script`.
    fn spawn_window(&self, script: &Path) -> anyhow::Result<()>;

    /// Delete `path` after `delay`, best effort.
    fn schedule_cleanup(&self, path: &Path, delay: Duration) -> anyhow::Result<()>;
}

/// Spawns `<emulator> -e <script>` detached from this process.
#[derive(Debug, Clone)]
pub struct DetachedSpawner {
    emulator: String,
}

impl DetachedSpawner {
    pub fn new(emulator: impl Into<String>) -> Self {
        Self {
            emulator: emulator.into(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.emulator())
    }
}

impl WindowSpawner for DetachedSpawner {
    fn spawn_window(&self, script: &Path) -> anyhow::Result<()> {
        let mut cmd = Command::new(&self.emulator);
        cmd.arg("-e").arg(script);
        shell_exec::spawn(&mut cmd, Some("fallback"))
            .with_context(|| format!("Failed to start {}", self.emulator))
    }

    fn schedule_cleanup(&self, path: &Path, delay: Duration) -> anyhow::Result<()> {
        let path = path.to_string_lossy();
        let command = format!(
            "sleep {}; rm -f -- {}",
            delay.as_secs(),
            escape(Cow::Borrowed(path.as_ref()))
        );
        shell_exec::spawn_detached(&command, "fallback-cleanup")
            .context("Failed to schedule launcher script cleanup")
    }
}

/// The standalone script a fallback window runs.
///
/// A blank line ends the record before `exec`, so a command with a trailing
/// backslash can't swallow the shell that keeps the window open.
pub fn launch_script(record: &PendingRecord) -> String {
    format!(
        "#!/usr/bin/env bash\n# Written by newtab; removed shortly after launch.\n{}\nexec \"${{SHELL:-/bin/sh}}\" -i\n",
        record.render()
    )
}

/// Write the launcher script for this process into the state directory.
pub fn write_launch_script(slot: &PendingSlot, record: &PendingRecord) -> anyhow::Result<PathBuf> {
    std::fs::create_dir_all(slot.dir()).with_context(|| {
        format!("Failed to create state directory {}", slot.dir().display())
    })?;

    let path = slot.launch_script_path(std::process::id());
    let mut file = std::fs::File::create(&path)
        .with_context(|| format!("Failed to create launcher script {}", path.display()))?;
    file.write_all(launch_script(record).as_bytes())
        .with_context(|| format!("Failed to write launcher script {}", path.display()))?;
    file.set_permissions(std::fs::Permissions::from_mode(0o755))
        .with_context(|| format!("Failed to make {} executable", path.display()))?;
    Ok(path)
}
