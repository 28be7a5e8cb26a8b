pub mod launch;
pub mod windows;
