//! Target window resolution
//!
//! | Situation | Result |
//! |-----------|--------|
//! | `--fallback` | fallback (IPC never consulted) |
//! | IPC unavailable | fallback |
//! | `-w <id>`, window exists | that window |
//! | `-w <id>`, window missing | error |
//! | no windows | fallback |
//! | one window | that window, no prompt |
//! | several windows | ask the [`WindowChooser`] |
//!
//! The chooser is injected: interactive sessions get [`PromptChooser`], others
//! get [`LatestWindow`], which picks the highest ordinal.

use std::io::{BufRead, Write};

use anyhow::Context;
use color_print::cformat;

use crate::error::NewtabError;
use crate::ipc::{TerminalIpc, WindowNode};
use crate::styling::{DEFAULT_CHOICE, prompt_message, warning_message};

/// Picks one of several candidate windows.
pub trait WindowChooser {
    /// `windows` is non-empty and ordered by ordinal.
    fn choose(&mut self, windows: &[WindowNode]) -> anyhow::Result<WindowNode>;
}

/// Deterministic choice: the most recently created window.
#[derive(Debug, Default, Clone, Copy)]
pub struct LatestWindow;

impl WindowChooser for LatestWindow {
    fn choose(&mut self, windows: &[WindowNode]) -> anyhow::Result<WindowNode> {
        latest(windows).context("no windows to choose from")
    }
}

fn latest(windows: &[WindowNode]) -> Option<WindowNode> {
    windows.iter().max().copied()
}

/// Asks the operator which window to use.
///
/// Empty input or end of input accepts the default (the latest window);
/// anything that isn't a listed id asks again.
pub struct PromptChooser<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> PromptChooser<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }
}

impl PromptChooser<std::io::StdinLock<'static>, std::io::Stderr> {
    /// Prompt on stderr, read from stdin.
    pub fn stdio() -> Self {
        Self::new(std::io::stdin().lock(), std::io::stderr())
    }
}

impl<R: BufRead, W: Write> WindowChooser for PromptChooser<R, W> {
    fn choose(&mut self, windows: &[WindowNode]) -> anyhow::Result<WindowNode> {
        let default = latest(windows).context("no windows to choose from")?;

        writeln!(self.output, "{} terminal windows are open:", windows.len())?;
        for window in windows {
            if *window == default {
                writeln!(
                    self.output,
                    "  {DEFAULT_CHOICE}{}{DEFAULT_CHOICE:#} (newest)",
                    window.id
                )?;
            } else {
                writeln!(self.output, "  {}", window.id)?;
            }
        }

        loop {
            write!(
                self.output,
                "{} ",
                prompt_message(cformat!("Open tab in window <bold>[{}]</>:", default.id))
            )?;
            self.output.flush()?;

            let mut line = String::new();
            if self.input.read_line(&mut line)? == 0 {
                writeln!(self.output)?;
                return Ok(default);
            }
            let answer = line.trim();
            if answer.is_empty() {
                return Ok(default);
            }
            match answer.parse::<u32>() {
                Ok(id) if windows.iter().any(|w| w.id == id) => return Ok(WindowNode::new(id)),
                _ => writeln!(
                    self.output,
                    "{}",
                    warning_message(cformat!("<bold>{answer}</> is not one of the listed windows"))
                )?,
            }
        }
    }
}

/// Why the launcher has to open a new top-level window instead of a tab.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FallbackReason {
    /// `--fallback` was passed
    Forced,
    /// No IPC endpoint answered
    IpcUnavailable(String),
    /// IPC answered but reported no windows
    NoWindows,
    /// The new-tab call failed after a window was chosen
    NewTabFailed(String),
}

impl std::fmt::Display for FallbackReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FallbackReason::Forced => write!(f, "fallback requested"),
            FallbackReason::IpcUnavailable(reason) => write!(f, "{reason}"),
            FallbackReason::NoWindows => write!(f, "no terminal windows found"),
            FallbackReason::NewTabFailed(reason) => write!(f, "{reason}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Window(WindowNode),
    Fallback(FallbackReason),
}

/// Decide where the command should run.
pub fn resolve_window(
    ipc: &dyn TerminalIpc,
    explicit: Option<u32>,
    force_fallback: bool,
    chooser: &mut dyn WindowChooser,
) -> anyhow::Result<Resolution> {
    if force_fallback {
        return Ok(Resolution::Fallback(FallbackReason::Forced));
    }

    let windows = match ipc.list_windows() {
        Ok(windows) => windows,
        Err(e) if e.is_unavailable() => {
            log::info!("Window IPC unavailable: {e}");
            return Ok(Resolution::Fallback(FallbackReason::IpcUnavailable(
                e.to_string(),
            )));
        }
        Err(e) => return Err(e.into()),
    };
    log::debug!(
        "Found windows: {:?}",
        windows.iter().map(|w| w.id).collect::<Vec<_>>()
    );

    if let Some(id) = explicit {
        return match windows.iter().find(|w| w.id == id) {
            Some(window) => Ok(Resolution::Window(*window)),
            None => Err(NewtabError::WindowNotFound {
                id,
                available: windows.iter().map(|w| w.id).collect(),
            }
            .into()),
        };
    }

    match windows.as_slice() {
        [] => Ok(Resolution::Fallback(FallbackReason::NoWindows)),
        [only] => Ok(Resolution::Window(*only)),
        several => Ok(Resolution::Window(chooser.choose(several)?)),
    }
}
