//! Shell integration code
//!
//! `newtab init <shell>` prints the startup hook for the shell. Users add one
//! line to their rc file:
//!
//! ```text
//! bash:  eval "$(newtab init bash)"        (~/.bashrc)
//! zsh:   eval "$(newtab init zsh)"         (~/.zshrc)
//! fish:  newtab init fish | source         (~/.config/fish/config.fish)
//! ```
//!
//! The hook only fires in interactive shells running inside Konsole
//! (`KONSOLE_VERSION` set). It asks `newtab hook claim` for the pending
//! record, sources the claimed file in the shell itself (so `cd` sticks) and
//! deletes it afterwards.

use askama::Template;

/// Default binary name referenced by the generated hook.
pub const DEFAULT_COMMAND_NAME: &str = "newtab";

/// Supported shells
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display, strum::EnumString)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Shell {
    Bash,
    Fish,
    Zsh,
}

impl Shell {
    /// The rc file line that loads the hook.
    pub fn config_line(&self, cmd: &str) -> String {
        let prefix_arg = if cmd == DEFAULT_COMMAND_NAME {
            String::new()
        } else {
            format!(" --cmd={cmd}")
        };
        match self {
            Self::Bash | Self::Zsh => format!(
                "if command -v {cmd} >/dev/null 2>&1; then eval \"$(command {cmd} init {self}{prefix_arg})\"; fi"
            ),
            Self::Fish => {
                format!("if type -q {cmd}; command {cmd} init {self}{prefix_arg} | source; end")
            }
        }
    }
}

/// Hook code for one shell
pub struct ShellInit {
    pub shell: Shell,
    pub cmd: String,
}

impl ShellInit {
    pub fn new(shell: Shell, cmd: impl Into<String>) -> Self {
        Self {
            shell,
            cmd: cmd.into(),
        }
    }

    pub fn generate(&self) -> Result<String, askama::Error> {
        match self.shell {
            Shell::Bash => BashTemplate { cmd: &self.cmd }.render(),
            Shell::Zsh => ZshTemplate { cmd: &self.cmd }.render(),
            Shell::Fish => FishTemplate { cmd: &self.cmd }.render(),
        }
    }
}

#[derive(Template)]
#[template(path = "bash.sh", escape = "none")]
struct BashTemplate<'a> {
    cmd: &'a str,
}

#[derive(Template)]
#[template(path = "zsh.zsh", escape = "none")]
struct ZshTemplate<'a> {
    cmd: &'a str,
}

#[derive(Template)]
#[template(path = "fish.fish", escape = "none")]
struct FishTemplate<'a> {
    cmd: &'a str,
}
