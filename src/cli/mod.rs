pub mod commands;
pub mod handlers;

pub use commands::{CliArgs, Commands, ScanArgs};
pub use handlers::handle_scan;
