//! Compare subcommand - run the title audit over an input CSV

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use titlecheck_core::{ProgressContext, fmt_num};

use crate::config::Config;

#[derive(Args, Debug)]
pub struct CompareArgs {
    /// Input CSV (identifier,storedTitle,createdAt with a header row)
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Result CSV, overwritten if it exists
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Directory containing <identifier>.xml documents
    #[arg(long)]
    pub content_root: Option<PathBuf>,

    /// Stop after this many input records (0 = all)
    #[arg(short = 'n', long)]
    pub limit: Option<usize>,
}

/// File config first, then flags on top
fn resolve(args: CompareArgs, config: &Config) -> titlecheck_audit::Config {
    let mut audit = config.audit_config();
    if let Some(input) = args.input {
        audit.input_file = input;
    }
    if let Some(output) = args.output {
        audit.output_file = output;
    }
    if let Some(root) = args.content_root {
        audit.content_root = root;
    }
    if let Some(limit) = args.limit {
        audit.max_records = Some(limit);
    }
    audit
}

pub fn run(args: CompareArgs, config: &Config, progress: &ProgressContext) -> Result<()> {
    let audit = resolve(args, config);
    let pb = progress.counter_line("compare");

    let summary = titlecheck_audit::run(&audit, &pb)?;

    println!();
    println!("=== Title Comparison ===");
    println!("Records processed: {}", fmt_num(summary.processed));
    println!("Rows written: {}", fmt_num(summary.written));
    println!("Skipped (no content): {}", fmt_num(summary.skipped));
    println!(
        "Title mismatches: {} ({:.1}%)",
        fmt_num(summary.mismatched),
        if summary.written > 0 {
            summary.mismatched as f64 / summary.written as f64 * 100.0
        } else {
            0.0
        }
    );
    println!("Output: {}", audit.output_file.display());
    println!("Time: {:.1}s", summary.elapsed.as_secs_f64());

    Ok(())
}
