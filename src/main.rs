use std::io::Write as _;
use std::process;

use clap::Parser;
use color_print::cformat;
use newtab::error::{NewtabError, exit_code};
use newtab::styling::{eprintln, error_message, warning_message};

mod cli;
mod commands;

use cli::{Cli, Commands, ConfigCommand, HookCommand};

/// Route `log` output to stderr: quiet by default, `-v` info, `-vv` debug.
/// `RUST_LOG` overrides the level when set.
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        _ => log::LevelFilter::Debug,
    };

    let mut builder = env_logger::Builder::new();
    builder
        .filter_level(level)
        .format(|buf, record| match record.level() {
            log::Level::Error | log::Level::Warn => {
                writeln!(buf, "{}", warning_message(record.args().to_string()))
            }
            _ => writeln!(buf, "{}", cformat!("<dim>{}</>", record.args())),
        });
    if let Ok(filters) = std::env::var("RUST_LOG") {
        builder.parse_filters(&filters);
    }
    builder.init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        None => {
            let (request, dry_run) = cli.launch.into_request();
            commands::handle_launch(request, dry_run).map(|()| 0)
        }
        Some(Commands::Init { shell, cmd }) => commands::handle_init(shell, &cmd).map(|()| 0),
        Some(Commands::Hook(HookCommand::Claim { pid })) => {
            commands::handle_hook_claim(pid).map(|()| 0)
        }
        Some(Commands::Hook(HookCommand::Run)) => commands::handle_hook_run(),
        Some(Commands::Windows) => commands::handle_windows().map(|()| 0),
        Some(Commands::Config(ConfigCommand::Show)) => commands::handle_config_show().map(|()| 0),
    };

    match result {
        Ok(0) => {}
        Ok(code) => process::exit(code),
        Err(e) => {
            // Domain errors carry their own styling
            if let Some(newtab_err) = e.downcast_ref::<NewtabError>() {
                eprintln!("{newtab_err}");
            } else {
                eprintln!("{}", error_message(format!("{e:#}")));
            }
            process::exit(exit_code(&e));
        }
    }
}
