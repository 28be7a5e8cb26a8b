//! Shell and external command execution
//!
//! Every external program newtab talks to (the IPC tool, the terminal
//! emulator, `sh` for detached work) is launched through this module so the
//! command line and its timing show up in `-vv` output:
//!
//! ```text
//! $ qdbus org.kde.konsole [ipc]
//! [newtab-trace] context=ipc cmd="qdbus org.kde.konsole" dur=12.3ms ok=true
//! ```

use std::path::PathBuf;
use std::process::{Command, ExitStatus, Stdio};
use std::sync::OnceLock;
use std::time::Instant;

/// Cached shell configuration
static SHELL_CONFIG: OnceLock<ShellConfig> = OnceLock::new();

/// Shell used for `sh -c` style execution
#[derive(Debug, Clone)]
pub struct ShellConfig {
    /// Path to the shell executable
    pub executable: PathBuf,
    /// Arguments to pass before the command
    pub args: Vec<String>,
}

impl ShellConfig {
    pub fn get() -> &'static ShellConfig {
        SHELL_CONFIG.get_or_init(|| ShellConfig {
            executable: PathBuf::from("sh"),
            args: vec!["-c".to_string()],
        })
    }

    /// Create a Command that passes `shell_command` to the shell for interpretation.
    pub fn command(&self, shell_command: &str) -> Command {
        let mut cmd = Command::new(&self.executable);
        cmd.args(&self.args);
        cmd.arg(shell_command);
        cmd
    }
}

fn command_string(cmd: &Command) -> String {
    let program = cmd.get_program().to_string_lossy();
    let args: Vec<_> = cmd.get_args().map(|a| a.to_string_lossy()).collect();
    if args.is_empty() {
        program.to_string()
    } else {
        format!("{} {}", program, args.join(" "))
    }
}

/// Execute a command to completion with timing and debug logging.
///
/// `context` labels the caller in trace lines (e.g. `ipc`), or `None`.
pub fn run(cmd: &mut Command, context: Option<&str>) -> std::io::Result<std::process::Output> {
    let cmd_str = log_start(cmd, context);

    // Never let a child read the user's terminal: the hook runs us inside `$(...)`
    cmd.stdin(Stdio::null());

    let t0 = Instant::now();
    let result = cmd.output();
    log_finish(&cmd_str, context, t0, result.as_ref().map(|o| o.status));
    result
}

/// Run a command attached to our stdio and wait for its exit status.
pub fn status(cmd: &mut Command, context: Option<&str>) -> std::io::Result<ExitStatus> {
    let cmd_str = log_start(cmd, context);

    let t0 = Instant::now();
    let result = cmd.status();
    log_finish(&cmd_str, context, t0, result.as_ref().copied());
    result
}

fn log_start(cmd: &Command, context: Option<&str>) -> String {
    let cmd_str = command_string(cmd);
    match context {
        Some(ctx) => log::debug!("$ {} [{}]", cmd_str, ctx),
        None => log::debug!("$ {}", cmd_str),
    }
    cmd_str
}

fn log_finish(
    cmd_str: &str,
    context: Option<&str>,
    t0: Instant,
    result: Result<ExitStatus, &std::io::Error>,
) {
    let duration_ms = t0.elapsed().as_secs_f64() * 1000.0;
    let ctx = context.map(|c| format!("context={c} ")).unwrap_or_default();
    match result {
        Ok(status) => log::debug!(
            "[newtab-trace] {}cmd=\"{}\" dur={:.1}ms ok={}",
            ctx,
            cmd_str,
            duration_ms,
            status.success()
        ),
        Err(e) => log::debug!(
            "[newtab-trace] {}cmd=\"{}\" dur={:.1}ms err=\"{}\"",
            ctx,
            cmd_str,
            duration_ms,
            e
        ),
    }
}

/// Start a program without waiting for it, in its own process group.
///
/// Unlike [`spawn_detached`], a missing executable is reported as an error.
#[cfg(unix)]
pub fn spawn(cmd: &mut Command, context: Option<&str>) -> std::io::Result<()> {
    use std::os::unix::process::CommandExt;

    let cmd_str = command_string(cmd);
    match context {
        Some(ctx) => log::debug!("$ {} & [{}]", cmd_str, ctx),
        None => log::debug!("$ {} &", cmd_str),
    }

    let child = cmd
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .process_group(0)
        .spawn()?;
    log::debug!("[newtab-trace] cmd=\"{}\" pid={}", cmd_str, child.id());
    Ok(())
}

/// Spawn a shell command fully detached from this process.
///
/// The command runs in the background of a throwaway `sh`, in its own process
/// group, so it survives both our exit and the closing of our terminal. Output
/// is discarded.
#[cfg(unix)]
pub fn spawn_detached(shell_command: &str, name: &str) -> std::io::Result<()> {
    use std::os::unix::process::CommandExt;

    log::debug!("spawn_detached: {} ({})", name, shell_command);

    let mut child = ShellConfig::get()
        .command(&format!("{shell_command} &"))
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .process_group(0)
        .spawn()?;

    // Returns as soon as sh has backgrounded the command
    child.wait()?;
    Ok(())
}
