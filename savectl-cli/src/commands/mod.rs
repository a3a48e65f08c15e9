//! Command implementations for the savectl CLI

pub mod boards;
pub mod client;
pub mod config;
pub mod saves;
pub mod serve;

pub use boards::run_boards;
pub use config::run_config;
pub use saves::{run_remove, run_sheet, run_state, run_tap};
pub use serve::run_serve;
