use devprobe::cli::commands::{CliArgs, Commands};
use devprobe::cli::handlers::{handle_detect, handle_detectors};
use devprobe::util::logging::{self, LoggingConfig};
use devprobe::{DevprobeConfig, NAME, VERSION};

use clap::Parser;
use std::process;
use tracing::debug;

fn main() {
    let args = CliArgs::parse();
    let config = resolve_config(&args);
    logging::init_logging(LoggingConfig::from(&config));

    debug!("{} v{} starting", NAME, VERSION);
    debug!("Arguments: {:?}", args);

    let exit_code = match &args.command {
        Commands::Detect(detect_args) => handle_detect(detect_args, &config, args.quiet),
        Commands::Detectors(detectors_args) => handle_detectors(detectors_args),
    };

    process::exit(exit_code);
}

/// Environment settings with command-line overrides applied
fn resolve_config(args: &CliArgs) -> DevprobeConfig {
    let config = DevprobeConfig::default();
    match args.log_level_override() {
        Some(level) => config.with_log_level(level),
        None => config,
    }
}
