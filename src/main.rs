use bomscan::cli::commands::{CliArgs, Commands};
use bomscan::cli::handlers::handle_scan;
use bomscan::util::logging::{self, parse_level, LoggingConfig};
use bomscan::VERSION;

use clap::Parser;
use std::env;
use tracing::{debug, Level};

fn main() {
    let args = CliArgs::parse();
    init_logging_from_args(&args);

    debug!("bomscan v{} starting", VERSION);
    debug!("Arguments: {:?}", args);

    let exit_code = match &args.command {
        Commands::Scan(scan_args) => handle_scan(scan_args),
    };

    std::process::exit(exit_code);
}

fn init_logging_from_args(args: &CliArgs) {
    let level = if let Some(level_str) = &args.log_level {
        parse_level(level_str)
    } else if args.verbose {
        Level::DEBUG
    } else if args.quiet {
        Level::ERROR
    } else {
        let level_str = env::var("BOMSCAN_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
        parse_level(&level_str)
    };

    logging::init_logging(LoggingConfig::with_level(level));
}
