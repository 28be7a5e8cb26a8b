use std::io::IsTerminal;

use anyhow::Context;
use color_print::cformat;
use newtab::config::Config;
use newtab::fallback::DetachedSpawner;
use newtab::ipc::KonsoleIpc;
use newtab::launcher::{LaunchOutcome, LaunchRequest, Launcher};
use newtab::pending::PendingSlot;
use newtab::styling::{eprintln, hint_message, print, success_message};
use newtab::window::{LatestWindow, PromptChooser};

pub fn handle_launch(request: LaunchRequest, dry_run: bool) -> anyhow::Result<()> {
    let cwd = std::env::current_dir().context("Failed to read current directory")?;
    let record = request.to_record(&cwd)?;

    if dry_run {
        print!("{}", record.render());
        return Ok(());
    }

    let config = Config::load()?;
    let ipc = KonsoleIpc::from_config(&config);
    let spawner = DetachedSpawner::from_config(&config);
    let launcher = Launcher::new(
        &ipc,
        &spawner,
        PendingSlot::new(config.state_dir()),
        config.fallback_grace(),
    );

    let interactive = std::io::stdin().is_terminal() && std::io::stderr().is_terminal();
    let outcome = if interactive {
        launcher.launch(
            &record,
            request.window,
            request.force_fallback,
            &mut PromptChooser::stdio(),
        )?
    } else {
        launcher.launch(
            &record,
            request.window,
            request.force_fallback,
            &mut LatestWindow,
        )?
    };

    match outcome {
        LaunchOutcome::Tab { window } => {
            eprintln!(
                "{}",
                success_message(cformat!("Opened tab in window <bold>{window}</>"))
            );
        }
        LaunchOutcome::NewWindow { reason, .. } => {
            eprintln!("{}", success_message("Opened a new terminal window"));
            eprintln!("{}", hint_message(reason.to_string()));
        }
    }
    Ok(())
}
