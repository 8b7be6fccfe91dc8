//! # vsrename: The Main Entry Point
//!
//! This module handles Command Line Interface (CLI) parsing, logging initialization,
//! the interactive prompts, and handing a `RenameConfig` to the renamer.
//!
//! Run it from the folder that contains the solution, *before* renaming anything by hand.

use std::io::Write;
use std::path::PathBuf;
use clap::Parser;
use log::{error, info, LevelFilter};
use simplelog::{Config, SimpleLogger, WriteLogger};

mod discovery;
mod error;
mod invariant_ppt;
mod prompt;
mod renamer;
mod system;
mod text;

use renamer::RenameConfig;
use system::RealFileSystem;

/// The primary Command Line Interface (CLI) configuration.
///
/// Any name not passed as a flag is asked for interactively.
#[derive(Parser)]
#[command(name = "vsrename")]
#[command(about = "Rename a Visual Studio C++ project and its files", long_about = None)]
struct Cli {
    /// The old project name (the keyword to replace).
    #[arg(long = "old", value_name = "NAME")]
    old_name: Option<String>,

    /// The new project name.
    #[arg(long = "new", value_name = "NAME")]
    new_name: Option<String>,

    /// Directory containing the solution.
    #[arg(short = 'C', long, value_name = "DIR", default_value = ".")]
    root: PathBuf,

    /// Dry run: print what would change without touching any file.
    #[arg(long)]
    dry_run: bool,

    /// Stop at the first failure instead of processing every entry.
    #[arg(long)]
    fail_fast: bool,

    /// Print the final report as JSON on stdout.
    #[arg(long)]
    json: bool,

    /// Turn on verbose logging.
    ///
    /// - `-v`: Debug
    /// - `-vv`: Trace
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() {
    let cli = Cli::parse();

    // Determine log level based on verbosity flag
    let log_level = match cli.verbose {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };

    // Keep stdout clean for the JSON report
    // We ignore the result here as logging failure shouldn't crash the startup
    let _ = if cli.json {
        WriteLogger::init(log_level, Config::default(), std::io::stderr())
    } else {
        SimpleLogger::init(log_level, Config::default())
    };

    let names = {
        let mut stdin = std::io::stdin().lock();
        let mut out: Box<dyn Write> = if cli.json {
            Box::new(std::io::stderr())
        } else {
            Box::new(std::io::stdout())
        };
        prompt::prompt_names(&mut stdin, &mut out, cli.old_name.clone(), cli.new_name.clone())
    };
    let (old_name, new_name) = match names {
        Ok(names) => names,
        Err(e) => {
            error!("Failed to read project names: {:#}", e);
            std::process::exit(1);
        }
    };

    let config = RenameConfig {
        root: cli.root.clone(),
        dry_run: cli.dry_run,
        fail_fast: cli.fail_fast,
        ..RenameConfig::new(old_name, new_name)
    };

    let fs = RealFileSystem;
    let result = if config.dry_run && !cli.json {
        renamer::plan_rename(&config, &fs).map(|plan| {
            renamer::print_plan(&plan, &config);
            renamer::execute_plan(&plan, &config, &fs)
        })
    } else {
        info!("Renaming {:?} to {:?} in {:?}...", config.old_name, config.new_name, config.root);
        renamer::run(&config, &fs)
    };

    let report = match result {
        Ok(report) => report,
        Err(e) => {
            error!("Failed to rename project: {:#}", e);
            std::process::exit(1);
        }
    };

    if cli.json {
        match renamer::report_json(&report) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                error!("{:#}", e);
                std::process::exit(1);
            }
        }
    } else {
        renamer::print_report(&report);
    }

    if !report.is_success() {
        std::process::exit(1);
    }
}
