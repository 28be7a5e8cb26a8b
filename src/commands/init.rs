use std::io::IsTerminal;

use anyhow::Context;
use color_print::cformat;
use newtab::shell::{Shell, ShellInit};
use newtab::styling::{eprintln, hint_message, println};

pub fn handle_init(shell: Shell, command_name: &str) -> anyhow::Result<()> {
    let init = ShellInit::new(shell, command_name);
    let code = init
        .generate()
        .context("Failed to generate shell code")?;

    println!("{code}");

    // Someone ran this by hand rather than from an rc file
    if std::io::stdout().is_terminal() {
        eprintln!(
            "{}",
            hint_message(cformat!(
                "To enable, add to your {shell} config: <bright-black>{}</>",
                shell.config_line(command_name)
            ))
        );
    }
    Ok(())
}
