use newtab::config::Config;
use newtab::ipc::{KonsoleIpc, TerminalIpc};
use newtab::styling::{DEFAULT_CHOICE, eprintln, info_message, println};

pub fn handle_windows() -> anyhow::Result<()> {
    let config = Config::load()?;
    let ipc = KonsoleIpc::from_config(&config);
    let windows = ipc.list_windows()?;

    let Some(newest) = windows.iter().max().copied() else {
        eprintln!("{}", info_message("No terminal windows open"));
        return Ok(());
    };

    for window in &windows {
        if *window == newest {
            println!("{window} {DEFAULT_CHOICE}(newest){DEFAULT_CHOICE:#}");
        } else {
            println!("{window}");
        }
    }
    Ok(())
}
