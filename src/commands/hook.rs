use std::process::Command;

use anyhow::Context;
use newtab::config::Config;
use newtab::pending::PendingSlot;
use newtab::shell_exec;
use newtab::styling::println;

/// Claim the pending record for `pid` and print the claimed path.
///
/// Nothing pending (or another shell got there first) prints nothing and
/// succeeds; the hook treats empty output as "no work".
pub fn handle_hook_claim(pid: Option<u32>) -> anyhow::Result<()> {
    let config = Config::load()?;
    let slot = PendingSlot::new(config.state_dir());
    let pid = pid.unwrap_or_else(std::os::unix::process::parent_id);

    match slot
        .claim(pid)
        .with_context(|| format!("Failed to claim {}", slot.pending_path().display()))?
    {
        Some(claimed) => println!("{}", claimed.into_path().display()),
        None => log::debug!("Nothing pending in {}", slot.dir().display()),
    }
    Ok(())
}

/// Claim the pending record and run it in a child bash. Returns its exit code.
pub fn handle_hook_run() -> anyhow::Result<i32> {
    let config = Config::load()?;
    let slot = PendingSlot::new(config.state_dir());

    let Some(claimed) = slot
        .claim(std::process::id())
        .with_context(|| format!("Failed to claim {}", slot.pending_path().display()))?
    else {
        log::debug!("Nothing pending in {}", slot.dir().display());
        return Ok(0);
    };

    let mut cmd = Command::new("bash");
    cmd.arg(claimed.path());
    let status = shell_exec::status(&mut cmd, Some("hook-run"));

    if let Err(e) = claimed.remove() {
        log::warn!("Failed to remove claimed record: {e}");
    }

    let status = status.context("Failed to run claimed record")?;
    Ok(status.code().unwrap_or(1))
}
