use std::path::PathBuf;

use clap::builder::styling::{AnsiColor, Color, Style, Styles};
use clap::{Args, Parser, Subcommand};
use newtab::launcher::LaunchRequest;
use newtab::shell::{DEFAULT_COMMAND_NAME, Shell};

const HEADER: Style = Style::new()
    .bold()
    .fg_color(Some(Color::Ansi(AnsiColor::Green)));
const LITERAL: Style = Style::new()
    .bold()
    .fg_color(Some(Color::Ansi(AnsiColor::Cyan)));

/// Help colors: green headings, cyan flags and values, red errors.
fn help_styles() -> Styles {
    Styles::styled()
        .header(HEADER)
        .usage(HEADER)
        .literal(LITERAL)
        .placeholder(Style::new().fg_color(Some(Color::Ansi(AnsiColor::Cyan))))
        .error(
            Style::new()
                .bold()
                .fg_color(Some(Color::Ansi(AnsiColor::Red))),
        )
}

#[derive(Parser)]
#[command(name = "newtab")]
#[command(about = "Open a terminal tab running a command", long_about = None)]
#[command(version)]
#[command(disable_help_subcommand = true)]
#[command(args_conflicts_with_subcommands = true)]
#[command(styles = help_styles())]
#[command(after_long_help = "\
Examples

  newtab -e 'make watch' -d ~/src/app -t build
  newtab -d /tmp -- tail -f log.txt
  newtab -s ./env.sh -w 2

The new tab runs the command through the shell hook; add
`eval \"$(newtab init bash)\"` to ~/.bashrc (or the zsh/fish equivalent).")]
pub(crate) struct Cli {
    #[command(flatten)]
    pub launch: LaunchArgs,

    /// Show debug info (-v), or also external commands (-vv)
    #[arg(
        long,
        short = 'v',
        global = true,
        action = clap::ArgAction::Count,
        display_order = 100,
        help_heading = "Global Options"
    )]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct LaunchArgs {
    /// Command line to run in the new tab
    #[arg(short = 'e', long = "command", value_name = "cmd")]
    pub inline: Option<String>,

    /// Script file to source in the new tab
    #[arg(short = 's', long, value_name = "path")]
    pub script: Option<PathBuf>,

    /// Working directory [default: current directory]
    #[arg(short = 'd', long, value_name = "path")]
    pub directory: Option<PathBuf>,

    /// Tab title
    #[arg(short = 't', long)]
    pub title: Option<String>,

    /// Open the tab in this window (see `newtab windows`)
    #[arg(short = 'w', long, value_name = "id")]
    pub window: Option<u32>,

    /// Skip tab IPC and open a new window
    #[arg(short = 'f', long)]
    pub fallback: bool,

    /// Print the record instead of launching it
    #[arg(long)]
    pub dry_run: bool,

    /// Command words, quoted individually
    #[arg(last = true, value_name = "cmd")]
    pub words: Vec<String>,
}

impl LaunchArgs {
    pub fn into_request(self) -> (LaunchRequest, bool) {
        let request = LaunchRequest {
            command: self.inline,
            words: self.words,
            script: self.script,
            directory: self.directory,
            title: self.title,
            window: self.window,
            force_fallback: self.fallback,
        };
        (request, self.dry_run)
    }
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Print the shell startup hook
    ///
    /// Add to the shell's rc file:
    /// bash/zsh: `eval "$(newtab init bash)"`, fish: `newtab init fish | source`
    Init {
        /// Shell to generate code for
        shell: Shell,

        /// Binary name the hook calls
        #[arg(long, default_value = DEFAULT_COMMAND_NAME)]
        cmd: String,
    },

    /// Claim the pending record (used by the shell hook)
    #[command(subcommand)]
    Hook(HookCommand),

    /// List terminal windows that can receive a tab
    Windows,

    /// Inspect configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

#[derive(Subcommand)]
pub(crate) enum HookCommand {
    /// Claim the pending record and print its path
    Claim {
        /// Claimant process id [default: parent process]
        #[arg(long)]
        pid: Option<u32>,
    },

    /// Claim the pending record and run it in a child shell
    Run,
}

#[derive(Subcommand)]
pub(crate) enum ConfigCommand {
    /// Show the effective configuration and state paths
    Show,
}
