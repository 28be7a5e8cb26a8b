//! Open a terminal tab that runs a command in a chosen directory.
//!
//! The launcher writes a *pending record* into a single well-known slot and
//! asks the terminal emulator (Konsole, over D-Bus) for a new tab. The shell
//! that starts in that tab runs the startup hook from `newtab init`, which
//! claims the record with an atomic rename and sources it, so each record runs
//! at most once. When no tab can be opened the record is run in a new
//! top-level window instead.
//!
//! The library API is not stable; it exists so the binary and the tests share
//! one implementation.

pub mod config;
pub mod error;
pub mod fallback;
pub mod ipc;
pub mod launcher;
pub mod pending;
pub mod shell;
pub mod shell_exec;
pub mod styling;
pub mod window;

pub use error::{IpcError, NewtabError};
