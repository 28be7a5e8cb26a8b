pub(crate) mod config;
pub(crate) mod hook;
pub(crate) mod init;
pub(crate) mod launch;
pub(crate) mod windows;

pub(crate) use config::handle_config_show;
pub(crate) use hook::{handle_hook_claim, handle_hook_run};
pub(crate) use init::handle_init;
pub(crate) use launch::handle_launch;
pub(crate) use windows::handle_windows;
