//! Pending-command handoff
//!
//! The launcher leaves a shell snippet at a fixed path in the state
//! directory; the next shell that starts claims it by renaming it to a path
//! unique to that shell, then sources it. Only one rename of the same source
//! can succeed, so every record runs at most once, with no locks involved.
//!
//! ```text
//! <state-dir>/newtab-pending.sh        written by the launcher
//! <state-dir>/newtab-claimed-<pid>.sh  owned by the shell that won the claim
//! <state-dir>/newtab-launch-<pid>.sh   fallback launcher scripts
//! ```
//!
//! All three live in one directory so the claim rename never crosses a
//! filesystem boundary.

use std::borrow::Cow;
use std::fmt::Write as _;
use std::io::{ErrorKind, Write as _};
use std::path::{Path, PathBuf};

use anyhow::Context;
use shell_escape::unix::escape;

const PENDING_FILE_NAME: &str = "newtab-pending.sh";
const CLAIMED_PREFIX: &str = "newtab-claimed-";
const LAUNCH_PREFIX: &str = "newtab-launch-";

/// What the new tab should run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandSource {
    /// A command line, written into the record verbatim
    Inline(String),
    /// A script file, sourced by absolute path
    Script(PathBuf),
}

/// A command, its working directory and an optional tab title.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingRecord {
    pub title: Option<String>,
    pub directory: PathBuf,
    pub command: CommandSource,
}

impl PendingRecord {
    pub fn new(directory: impl Into<PathBuf>, command: CommandSource) -> Self {
        Self {
            title: None,
            directory: directory.into(),
            command,
        }
    }

    pub fn with_title(mut self, title: Option<String>) -> Self {
        self.title = title.filter(|t| !t.is_empty());
        self
    }

    /// Render as a shell snippet: title line, `cd` line, command line.
    ///
    /// The output only uses syntax shared by bash, zsh and fish.
    pub fn render(&self) -> String {
        let mut out = String::new();
        if let Some(title) = &self.title {
            // OSC 30 sets the Konsole tab title
            let _ = writeln!(out, "printf '\\033]30;%s\\007' {}", quote(title));
        }
        let _ = writeln!(out, "cd {}", quote_path(&self.directory));
        match &self.command {
            CommandSource::Inline(command) => {
                let _ = writeln!(out, "{}", command.trim_end());
            }
            CommandSource::Script(path) => {
                let _ = writeln!(out, "source {}", quote_path(path));
            }
        }
        out
    }
}

fn quote(s: &str) -> Cow<'_, str> {
    escape(Cow::Borrowed(s))
}

fn quote_path(path: &Path) -> String {
    quote(&path.to_string_lossy()).into_owned()
}

/// Join command words into one command line, quoting each word.
pub fn join_words(words: &[String]) -> String {
    words
        .iter()
        .map(|w| quote(w).into_owned())
        .collect::<Vec<_>>()
        .join(" ")
}

/// The single-slot mailbox in the state directory.
#[derive(Debug, Clone)]
pub struct PendingSlot {
    dir: PathBuf,
}

impl PendingSlot {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn pending_path(&self) -> PathBuf {
        self.dir.join(PENDING_FILE_NAME)
    }

    /// `pid` is usually a process id; `config show` passes a placeholder.
    pub fn claimed_path(&self, pid: impl std::fmt::Display) -> PathBuf {
        self.dir.join(format!("{CLAIMED_PREFIX}{pid}.sh"))
    }

    pub fn launch_script_path(&self, pid: impl std::fmt::Display) -> PathBuf {
        self.dir.join(format!("{LAUNCH_PREFIX}{pid}.sh"))
    }

    /// Whether an unclaimed record is waiting.
    pub fn has_pending(&self) -> bool {
        self.pending_path().is_file()
    }

    /// Publish a record, replacing any unclaimed one.
    ///
    /// The record is written to a temporary file next to the pending path and
    /// renamed into place, so a claimant sees either the old record, the new
    /// one, or nothing, never a partial write.
    pub fn write(&self, record: &PendingRecord) -> anyhow::Result<PathBuf> {
        std::fs::create_dir_all(&self.dir)
            .with_context(|| format!("Failed to create state directory {}", self.dir.display()))?;

        let mut tmp = tempfile::Builder::new()
            .prefix(".newtab-pending-")
            .suffix(".tmp")
            .tempfile_in(&self.dir)
            .context("Failed to create temporary pending file")?;
        tmp.write_all(record.render().as_bytes())
            .context("Failed to write pending record")?;

        let path = self.pending_path();
        tmp.persist(&path)
            .with_context(|| format!("Failed to publish pending record at {}", path.display()))?;
        log::debug!("Wrote pending record to {}", path.display());
        Ok(path)
    }

    /// Withdraw an unclaimed record. Missing is fine.
    pub fn discard(&self) -> std::io::Result<()> {
        match std::fs::remove_file(self.pending_path()) {
            Err(e) if e.kind() != ErrorKind::NotFound => Err(e),
            _ => Ok(()),
        }
    }

    /// Try to take ownership of the pending record on behalf of `pid`.
    ///
    /// Returns `Ok(None)` when there is nothing to claim, including when
    /// another shell renamed it first.
    pub fn claim(&self, pid: u32) -> std::io::Result<Option<ClaimedRecord>> {
        let pending = self.pending_path();
        let claimed = self.claimed_path(pid);
        match std::fs::rename(&pending, &claimed) {
            Ok(()) => {
                log::debug!("Claimed {} as {}", pending.display(), claimed.display());
                Ok(Some(ClaimedRecord { path: claimed }))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                log::debug!("Nothing to claim at {}", pending.display());
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }
}

/// A record this process owns after winning the claim.
#[derive(Debug)]
pub struct ClaimedRecord {
    path: PathBuf,
}

impl ClaimedRecord {
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn contents(&self) -> std::io::Result<String> {
        std::fs::read_to_string(&self.path)
    }

    /// Hand the file over to a caller that will delete it (the shell hook).
    pub fn into_path(self) -> PathBuf {
        self.path
    }

    pub fn remove(self) -> std::io::Result<()> {
        match std::fs::remove_file(&self.path) {
            Err(e) if e.kind() != ErrorKind::NotFound => Err(e),
            _ => Ok(()),
        }
    }
}
