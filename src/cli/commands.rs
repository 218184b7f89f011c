use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Detect the ecosystem and runtime needs of a project directory
#[derive(Parser, Debug)]
#[command(
    name = "devprobe",
    about = "Detect the ecosystem and runtime needs of a project directory",
    version,
    author,
    long_about = "devprobe reads package.json, go.mod, pyproject.toml, requirements.txt and \
                  Cargo.toml to work out a project's language, version, backing services, \
                  logging, queue, upload, metrics and tracing libraries."
)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(long, global = true, value_name = "LEVEL", help = "Set logging level")]
    pub log_level: Option<String>,

    #[arg(short = 'v', long, global = true, help = "Enable debug logging")]
    pub verbose: bool,

    #[arg(
        short = 'q',
        long,
        global = true,
        conflicts_with = "verbose",
        help = "Quiet mode - suppress non-error output"
    )]
    pub quiet: bool,
}

impl CliArgs {
    /// Log level requested on the command line, if any
    ///
    /// `--log-level` wins over `-v`/`-q`.
    pub fn log_level_override(&self) -> Option<&str> {
        if let Some(level) = self.log_level.as_deref() {
            Some(level)
        } else if self.verbose {
            Some("debug")
        } else if self.quiet {
            Some("error")
        } else {
            None
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    #[command(
        about = "Detect the project in a directory",
        long_about = "Runs every enabled detector against the directory and prints the most \
                      confident match.\n\n\
                      Examples:\n  \
                      devprobe detect\n  \
                      devprobe detect /path/to/project\n  \
                      devprobe detect --all --format json\n  \
                      devprobe detect --detectors go,rust"
    )]
    Detect(DetectArgs),

    #[command(about = "List available detectors and the manifests they read")]
    Detectors(DetectorsArgs),
}

#[derive(Parser, Debug, Clone)]
pub struct DetectArgs {
    #[arg(
        value_name = "PATH",
        help = "Path to project (defaults to current directory)"
    )]
    pub path: Option<PathBuf>,

    #[arg(long, help = "Print every match instead of only the most confident one")]
    pub all: bool,

    #[arg(
        short = 'f',
        long,
        value_enum,
        default_value = "human",
        help = "Output format"
    )]
    pub format: OutputFormatArg,

    #[arg(
        short = 'o',
        long,
        value_name = "FILE",
        help = "Write output to file instead of stdout"
    )]
    pub output: Option<PathBuf>,

    #[arg(
        long,
        value_name = "LIST",
        help = "Comma-separated detectors to run (overrides DEVPROBE_DETECTORS)"
    )]
    pub detectors: Option<String>,
}

#[derive(Parser, Debug, Clone)]
pub struct DetectorsArgs {
    #[arg(
        short = 'f',
        long,
        value_enum,
        default_value = "human",
        help = "Output format"
    )]
    pub format: OutputFormatArg,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormatArg {
    Json,
    Yaml,
    Human,
}

impl From<OutputFormatArg> for super::output::OutputFormat {
    fn from(arg: OutputFormatArg) -> Self {
        match arg {
            OutputFormatArg::Json => super::output::OutputFormat::Json,
            OutputFormatArg::Yaml => super::output::OutputFormat::Yaml,
            OutputFormatArg::Human => super::output::OutputFormat::Human,
        }
    }
}
