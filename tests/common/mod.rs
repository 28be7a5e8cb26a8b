// Not every test file uses every helper.
#![allow(dead_code)]

//! # Test utilities for newtab
//!
//! Each test gets a [`TestEnv`]: a temporary state directory, a working
//! directory, and a `newtab` command isolated from the host. The host's
//! `NEWTAB_*` and Konsole variables are scrubbed, the user config is pointed
//! at a nonexistent path, and the IPC tool and emulator are replaced:
//!
//! - IPC defaults to a tool that doesn't exist, so launches take the fallback
//!   path. [`TestEnv::fake_konsole`] installs a scripted `qdbus` stand-in that
//!   reports windows and records every call.
//! - The emulator is `true`, so fallback windows "open" and exit at once.

use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::process::Command;

use insta_cmd::get_cargo_bin;
use tempfile::TempDir;

/// Create a `newtab` command isolated from the host environment.
pub fn newtab_command() -> Command {
    let mut cmd = Command::new(get_cargo_bin("newtab"));
    configure_cli_command(&mut cmd);
    cmd
}

pub fn configure_cli_command(cmd: &mut Command) {
    for (key, _) in std::env::vars() {
        if key.starts_with("NEWTAB_") || key.starts_with("KONSOLE_") {
            cmd.env_remove(&key);
        }
    }
    // Never load the developer's real config
    cmd.env("NEWTAB_CONFIG_PATH", "/nonexistent/test/config.toml");
    cmd.env("NEWTAB_IPC_TOOL", "newtab-test-no-such-qdbus");
    cmd.env("NEWTAB_EMULATOR", "true");
    cmd.env("NEWTAB_FALLBACK_GRACE_SECS", "0");
    cmd.env("NO_COLOR", "1");
    cmd.env("RUST_LOG", "warn");
}

pub struct TestEnv {
    state: TempDir,
    work: TempDir,
    ipc_tool: Option<PathBuf>,
}

impl TestEnv {
    pub fn new() -> Self {
        Self {
            state: TempDir::new().unwrap(),
            work: TempDir::new().unwrap(),
            ipc_tool: None,
        }
    }

    /// Canonical state directory (macOS temp dirs sit behind a symlink).
    pub fn state_dir(&self) -> PathBuf {
        std::fs::canonicalize(self.state.path()).unwrap()
    }

    /// Canonical working directory the command runs in.
    pub fn work_dir(&self) -> PathBuf {
        std::fs::canonicalize(self.work.path()).unwrap()
    }

    pub fn pending_path(&self) -> PathBuf {
        self.state_dir().join("newtab-pending.sh")
    }

    /// Files in the state directory, sorted, excluding the fake IPC tool.
    pub fn state_files(&self) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(self.state.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .filter(|name| name != "qdbus" && name != "qdbus-calls.log")
            .collect();
        names.sort();
        names
    }

    /// Install a scripted `qdbus` reporting `windows` and logging every call.
    ///
    /// `new_tab_exit` is the exit status of `activateAction` calls.
    pub fn fake_konsole(&mut self, windows: &[u32], new_tab_exit: i32) {
        let listing: String = windows
            .iter()
            .map(|id| format!("/konsole/MainWindow_{id}\\n/konsole/MainWindow_{id}/actions\\n"))
            .collect();
        let tool = self.state.path().join("qdbus");
        std::fs::write(
            &tool,
            format!(
                "#!/bin/sh\n\
                 echo \"$@\" >> \"$(dirname \"$0\")/qdbus-calls.log\"\n\
                 if [ $# -eq 1 ]; then printf '/\\n/konsole\\n{listing}/MainApplication\\n'; exit 0; fi\n\
                 exit {new_tab_exit}\n"
            ),
        )
        .unwrap();
        std::fs::set_permissions(&tool, std::fs::Permissions::from_mode(0o755)).unwrap();
        self.ipc_tool = Some(tool);
    }

    /// Calls made to the fake `qdbus`, one line each.
    pub fn ipc_calls(&self) -> Vec<String> {
        std::fs::read_to_string(self.state.path().join("qdbus-calls.log"))
            .unwrap_or_default()
            .lines()
            .map(str::to_string)
            .collect()
    }

    pub fn command(&self) -> Command {
        let mut cmd = newtab_command();
        self.configure(&mut cmd);
        cmd
    }

    pub fn configure(&self, cmd: &mut Command) {
        cmd.env("NEWTAB_STATE_DIR", self.state.path());
        cmd.env("NEWTAB_SERVICE", "org.kde.konsole-test");
        if let Some(tool) = &self.ipc_tool {
            cmd.env("NEWTAB_IPC_TOOL", tool);
        }
        cmd.current_dir(self.work.path());
    }

    /// Wait for every state file to go away, e.g. a fallback launcher script.
    pub fn wait_for_empty_state(&self) -> bool {
        let dir = self.state_dir();
        self.state_files()
            .iter()
            .all(|name| wait_for_removal(&dir.join(name)))
            && self.state_files().is_empty()
    }

    pub fn write_work_file(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.work_dir().join(name);
        std::fs::write(&path, contents).unwrap();
        path
    }
}

pub fn stdout(output: &std::process::Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

pub fn stderr(output: &std::process::Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

/// Whether `shell` is on `PATH`; shell tests skip when it isn't.
pub fn is_shell_available(shell: &str) -> bool {
    Command::new("which")
        .arg(shell)
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

/// `PATH` with the built `newtab` binary in front.
pub fn path_with_newtab() -> String {
    let bin = get_cargo_bin("newtab");
    let bin_dir = bin.parent().unwrap();
    format!(
        "{}:{}",
        bin_dir.display(),
        std::env::var("PATH").unwrap_or_default()
    )
}

/// Poll until `path` is gone; fallback cleanup runs in a detached shell.
pub fn wait_for_removal(path: &Path) -> bool {
    for _ in 0..100 {
        if !path.exists() {
            return true;
        }
        std::thread::sleep(std::time::Duration::from_millis(20));
    }
    false
}
