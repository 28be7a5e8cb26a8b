//! Styling for terminal output.
//!
//! Built on the anstyle ecosystem:
//! - anstream for auto-detecting color support
//! - color-print for `cformat!` markup in messages
//!
//! ## stdout vs stderr principle
//!
//! - **stdout**: data meant for the calling shell (claimed paths, init code,
//!   dry-run records, window ids)
//! - **stderr**: status messages (success, errors, hints, prompts)
//!
//! The hook snippet captures stdout with `$(...)`, so status output must never
//! leak there.

mod constants;

pub use anstream::{eprintln, print, println};

pub use constants::*;
