use clap::Parser;
use tracing::Level;

use rebank_client::{Commands, OutputFormat, commands};

#[derive(Parser)]
#[command(
    name = "rebank",
    about = "Soundbank client for inspecting, extracting, and merging .bnk archives",
    version,
    author,
    long_about = "A command-line tool for working with Wwise soundbank (.bnk) containers: list sections, extract audio sub-resources, rebuild banks from directories, and merge archives with correct internal addressing."
)]
struct Cli {
    /// Set the logging level
    #[arg(short, long, value_enum, default_value = "info")]
    log_level: LogLevel,

    /// Output format
    #[arg(short = 'o', long, value_enum, global = true, default_value = "text")]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl From<LogLevel> for Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => Level::TRACE,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Info => Level::INFO,
            LogLevel::Warn => Level::WARN,
            LogLevel::Error => Level::ERROR,
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_max_level(Level::from(cli.log_level))
        .with_target(false)
        .init();

    // Handle commands
    match cli.command {
        Commands::Info { bank } => commands::info::handle(&bank, cli.format)?,
        Commands::Extract {
            bank,
            output,
            ids,
            extension,
            bulk,
        } => commands::extract::handle(&bank, &output, &ids, &extension, bulk)?,
        Commands::Pack {
            input,
            output,
            extension,
        } => commands::pack::handle(&input, &output, &extension)?,
        Commands::Replace {
            bank,
            id,
            file,
            output,
        } => commands::replace::handle(&bank, id, &file, output.as_deref())?,
        Commands::Merge {
            left,
            right,
            output,
        } => commands::merge::handle(&left, &right, &output)?,
        Commands::Hash { name } => commands::hash::handle(&name, cli.format)?,
    }

    Ok(())
}
