//! CLI for feeding other programs' output into the quill logging facade.

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use quill_logger::{
    debugf, set_default_logger, Destination, LevelWriter, LogConfig, Logger, Severity,
    SharedWriter,
};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "quill-pipe")]
#[command(about = "Redirect raw output into leveled, rotating log files")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log every line read from stdin as one record
    Pipe {
        #[command(flatten)]
        log: LogArgs,

        /// Severity label for the records (unknown labels mean info)
        #[arg(long, default_value = "info")]
        level: String,
    },
    /// Log a single message
    Emit {
        #[command(flatten)]
        log: LogArgs,

        /// Severity of the message
        #[arg(long, default_value = "info")]
        level: Severity,

        /// Message text
        #[arg(required = true)]
        message: Vec<String>,
    },
}

#[derive(Args, Debug, Clone)]
struct LogArgs {
    /// JSON logger config; flags below override it
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log file path (stdout when omitted)
    #[arg(long)]
    file: Option<PathBuf>,

    /// Rotate after this many megabytes
    #[arg(long, allow_negative_numbers = true)]
    max_size: Option<i64>,

    /// Rotated files to keep
    #[arg(long, allow_negative_numbers = true)]
    max_backups: Option<i64>,

    /// Days to keep rotated files
    #[arg(long, allow_negative_numbers = true)]
    max_age: Option<i64>,

    /// Gzip rotated files
    #[arg(long, default_value = "false")]
    compress: bool,

    /// Minimum severity written
    #[arg(long, default_value = "debug")]
    threshold: Severity,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Pipe { log, level } => {
            install_logger(&log)?;
            let count = pipe_lines(io::stdin().lock(), LevelWriter::new(&level))?;
            debugf!("piped {} lines", count);
        }
        Commands::Emit {
            log,
            level,
            message,
        } => {
            install_logger(&log)?;
            quill_logger::log(level, format_args!("{}", message.join(" ")));
        }
    }

    quill_logger::flush()?;
    Ok(())
}

/// Merge the JSON config (if any) with the command line flags.
fn build_config(args: &LogArgs) -> anyhow::Result<LogConfig> {
    let mut config = match &args.config {
        Some(path) => LogConfig::from_json_file(path)
            .with_context(|| format!("Failed to load logger config {:?}", path))?,
        None => LogConfig::default(),
    };

    if let Some(file) = &args.file {
        config.destination = Some(Destination::file(file));
    }
    if config.destination.is_none() {
        config.destination = Some(Destination::Writer(SharedWriter::stdout()));
    }
    if let Some(max_size) = args.max_size {
        config.max_size = max_size;
    }
    if let Some(max_backups) = args.max_backups {
        config.max_backups = max_backups;
    }
    if let Some(max_age) = args.max_age {
        config.max_age = max_age;
    }
    config.compress |= args.compress;

    Ok(config)
}

/// Install the default logger, failing loudly when the log file cannot be opened.
fn install_logger(args: &LogArgs) -> anyhow::Result<()> {
    let config = build_config(args)?;
    let logger =
        Logger::try_new(config, args.threshold).context("Failed to open log destination")?;
    set_default_logger(logger);
    debugf!("logger installed with threshold {}", args.threshold);
    Ok(())
}

/// Copy `input` into `writer`, one write per line. Returns the number of lines.
fn pipe_lines<R: BufRead, W: Write>(input: R, mut writer: W) -> anyhow::Result<usize> {
    let mut count = 0;
    for line in input.lines() {
        let line = line.context("Failed to read input")?;
        writer.write_all(line.as_bytes())?;
        count += 1;
    }
    writer.flush()?;
    Ok(count)
}
