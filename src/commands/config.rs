use std::fmt::Write as _;

use anyhow::Context;
use color_print::cformat;
use newtab::config::{Config, config_path};
use newtab::pending::PendingSlot;
use newtab::styling::{hint_message, info_message, print};

pub fn handle_config_show() -> anyhow::Result<()> {
    let config = Config::load()?;
    let mut out = String::new();

    match config_path() {
        Some(path) if path.exists() => writeln!(
            out,
            "{}",
            info_message(cformat!("Config file: <bold>{}</>", path.display()))
        )?,
        Some(path) => writeln!(
            out,
            "{}",
            hint_message(format!("{} not found; using defaults", path.display()))
        )?,
        None => writeln!(out, "{}", hint_message("No config directory; using defaults"))?,
    }
    writeln!(out)?;

    let toml = toml::to_string(&config.resolved()).context("Failed to serialize config")?;
    out.push_str(&toml);
    writeln!(out)?;

    let slot = PendingSlot::new(config.state_dir());
    writeln!(out, "# pending:  {}", slot.pending_path().display())?;
    writeln!(out, "# claimed:  {}", slot.claimed_path("<pid>").display())?;
    writeln!(out, "# launcher: {}", slot.launch_script_path("<pid>").display())?;

    print!("{out}");
    Ok(())
}
