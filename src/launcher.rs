//! Launch flow: validate the request, pick a window, hand off the record.
//!
//! On the tab path the record goes into the pending slot and the emulator is
//! asked for a new tab; the shell that starts there claims it. On the fallback
//! path the record is baked into a launcher script for a brand-new window.

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::NewtabError;
use crate::fallback::{WindowSpawner, write_launch_script};
use crate::ipc::{TerminalIpc, WindowNode};
use crate::pending::{CommandSource, PendingRecord, PendingSlot, join_words};
use crate::window::{FallbackReason, Resolution, WindowChooser, resolve_window};

/// What the operator asked for on the command line.
#[derive(Debug, Clone, Default)]
pub struct LaunchRequest {
    /// `-e`: a command line
    pub command: Option<String>,
    /// `-- cmd...`: command words
    pub words: Vec<String>,
    /// `-s`: a script to source
    pub script: Option<PathBuf>,
    /// `-d`: working directory, defaults to the caller's
    pub directory: Option<PathBuf>,
    /// `-t`: tab title
    pub title: Option<String>,
    /// `-w`: explicit target window
    pub window: Option<u32>,
    /// `-f`: skip IPC and open a new window
    pub force_fallback: bool,
}

impl LaunchRequest {
    /// Validate the request and build its record.
    ///
    /// Relative paths resolve against `cwd`. Nothing touches the state
    /// directory here, so usage errors never leave a record behind.
    pub fn to_record(&self, cwd: &Path) -> Result<PendingRecord, NewtabError> {
        let inline = self
            .command
            .as_deref()
            .filter(|c| !c.trim().is_empty())
            .map(str::to_string);
        let words = (!self.words.is_empty()).then(|| join_words(&self.words));

        let given = [inline.is_some(), words.is_some(), self.script.is_some()]
            .into_iter()
            .filter(|&g| g)
            .count();
        if given > 1 {
            return Err(NewtabError::ConflictingCommands);
        }

        let command = if let Some(script) = &self.script {
            let path = cwd.join(script);
            let path = std::fs::canonicalize(&path)
                .ok()
                .filter(|p| p.is_file())
                .ok_or_else(|| NewtabError::ScriptNotFound {
                    path: script.clone(),
                })?;
            CommandSource::Script(path)
        } else if let Some(command) = inline.or(words) {
            CommandSource::Inline(command)
        } else {
            return Err(NewtabError::NoCommand);
        };

        let directory = match &self.directory {
            Some(dir) => std::fs::canonicalize(cwd.join(dir))
                .ok()
                .filter(|p| p.is_dir())
                .ok_or_else(|| NewtabError::DirectoryNotFound { path: dir.clone() })?,
            None => cwd.to_path_buf(),
        };

        // Records are shell text; a lossy path would `cd` somewhere else
        let script = match &command {
            CommandSource::Script(path) => Some(path),
            CommandSource::Inline(_) => None,
        };
        if let Some(path) = [Some(&directory), script]
            .into_iter()
            .flatten()
            .find(|p| p.to_str().is_none())
        {
            return Err(NewtabError::NonUtf8Path { path: path.clone() });
        }

        Ok(PendingRecord::new(directory, command).with_title(self.title.clone()))
    }
}

/// Where the command ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LaunchOutcome {
    /// A new tab in an existing window
    Tab { window: WindowNode },
    /// A new top-level window running a launcher script
    NewWindow {
        script: PathBuf,
        reason: FallbackReason,
    },
}

pub struct Launcher<'a> {
    ipc: &'a dyn TerminalIpc,
    spawner: &'a dyn WindowSpawner,
    slot: PendingSlot,
    grace: Duration,
}

impl<'a> Launcher<'a> {
    pub fn new(
        ipc: &'a dyn TerminalIpc,
        spawner: &'a dyn WindowSpawner,
        slot: PendingSlot,
        grace: Duration,
    ) -> Self {
        Self {
            ipc,
            spawner,
            slot,
            grace,
        }
    }

    pub fn launch(
        &self,
        record: &PendingRecord,
        window: Option<u32>,
        force_fallback: bool,
        chooser: &mut dyn WindowChooser,
    ) -> anyhow::Result<LaunchOutcome> {
        let reason = match resolve_window(self.ipc, window, force_fallback, chooser)? {
            Resolution::Window(window) => match self.open_tab(record, &window)? {
                None => return Ok(LaunchOutcome::Tab { window }),
                Some(reason) => reason,
            },
            Resolution::Fallback(reason) => reason,
        };
        log::info!("Opening a new window instead of a tab: {reason}");
        self.open_window(record, reason)
    }

    /// Publish the record and ask for a tab. Returns why the tab path failed, if it did.
    fn open_tab(
        &self,
        record: &PendingRecord,
        window: &WindowNode,
    ) -> anyhow::Result<Option<FallbackReason>> {
        self.slot.write(record)?;
        match self.ipc.new_tab(window) {
            Ok(()) => {
                log::debug!("Requested new tab in window {window}");
                Ok(None)
            }
            Err(e) => {
                // No tab is coming for this record; don't leave it for some later shell
                if let Err(discard) = self.slot.discard() {
                    log::warn!("Failed to withdraw pending record: {discard}");
                }
                Ok(Some(FallbackReason::NewTabFailed(e.to_string())))
            }
        }
    }

    fn open_window(
        &self,
        record: &PendingRecord,
        reason: FallbackReason,
    ) -> anyhow::Result<LaunchOutcome> {
        let script = write_launch_script(&self.slot, record)?;
        if let Err(e) = self.spawner.spawn_window(&script) {
            let _ = std::fs::remove_file(&script);
            return Err(e);
        }
        if let Err(e) = self.spawner.schedule_cleanup(&script, self.grace) {
            log::warn!("{e:#}");
        }
        Ok(LaunchOutcome::NewWindow { script, reason })
    }
}
