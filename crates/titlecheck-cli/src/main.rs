//! titlecheck - audit stored article titles against cleaned XML documents
//!
//! Reads a CSV export of stored titles, re-derives each title from the
//! article's cleaned XML document and writes both side by side for review.

use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};

mod cmd;
mod config;

use config::Config;

#[derive(Parser)]
#[command(name = "titlecheck")]
#[command(about = "Audit stored article titles against cleaned XML documents")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,

    /// Config file path (default: ./titlecheck.toml or ~/.config/titlecheck/config.toml)
    #[arg(short, long, global = true)]
    config: Option<std::path::PathBuf>,
}

#[derive(Subcommand)]
enum Command {
    /// Compare stored titles with document titles and write a report CSV
    Compare(cmd::compare::CompareArgs),
    /// Print the document title for a single identifier
    Extract(cmd::extract::ExtractArgs),
    /// Show current configuration
    Config,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let progress: titlecheck_core::SharedProgress =
        Arc::new(titlecheck_core::ProgressContext::new());

    // Logging:
    //   TTY:     quiet (warn) unless --debug (the record counter shows activity)
    //   non-TTY: info unless --debug (logs are the only progress indicator)
    let is_tty = progress.is_tty();
    let multi = if is_tty { Some(progress.multi()) } else { None };
    let quiet = if is_tty { !cli.debug } else { false };
    titlecheck_core::init_logging(quiet, cli.debug, multi);

    let config = if let Some(path) = cli.config {
        Config::from_file(&path)?
    } else {
        Config::load()?
    };

    match cli.command {
        Command::Compare(args) => cmd::compare::run(args, &config, &progress),
        Command::Extract(args) => cmd::extract::run(args, &config),
        Command::Config => {
            use comfy_table::{
                Cell, Color, Table, modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL,
            };

            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .apply_modifier(UTF8_ROUND_CORNERS)
                .set_header(vec![
                    Cell::new("Setting").fg(Color::Cyan),
                    Cell::new("Value").fg(Color::Cyan),
                ]);

            table.add_row(vec!["Input file", &config.input.file.display().to_string()]);
            table.add_row(vec![
                "Output file",
                &config.output.file.display().to_string(),
            ]);
            table.add_row(vec![
                "Content root",
                &config.store.root.display().to_string(),
            ]);
            table.add_row(vec![
                "Max records",
                &if config.run.max_records > 0 {
                    config.run.max_records.to_string()
                } else {
                    "unlimited".to_string()
                },
            ]);

            progress.println(format!("\n{table}"));
            Ok(())
        }
    }
}
