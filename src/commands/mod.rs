#[cfg(feature = "desktop")]
pub mod backend_cmds;
pub mod session_cmds;
pub mod state;
