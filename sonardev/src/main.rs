//! # sonardev
//!
//! Development-time CLI for SonarQube plugin authors, built on top of
//! sonardevlib.
//!
//! ## Overview
//!
//! Two commands for the edit-build-try loop:
//!
//! - `upload` stages a freshly built plugin into a local server installation
//!   and asks the server to restart, so the new build is live a few seconds
//!   after `mvn package` finishes.
//! - `trim` strips leading and trailing whitespace from every line of the
//!   selected files, which keeps diffs quiet in codebases that reject stray
//!   whitespace.
//!
//! ## Usage
//!
//! ```bash
//! # Stage a plugin into a local server and restart it
//! sonardev upload --server-home ~/sonarqube-9.9 --artifact target/my-plugin-1.0.jar
//!
//! # Same, against a server on a non-default port
//! sonardev upload -s ~/sonarqube-9.9 -a target/my-plugin-1.0.jar \
//!     --server-url http://localhost:9100
//!
//! # Trim every file under src/
//! sonardev trim src
//!
//! # Only touch Java sources, leave generated code alone
//! sonardev trim . --include "**/*.java" --exclude "**/generated/**"
//!
//! # Machine-readable report
//! sonardev trim src --output json
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{Arg, ArgAction, ArgMatches, Command};
use console::style;
use sonardevlib::{trim_files, FileSelection, TrimOutcome, Uploader, DEFAULT_SERVER_URL};
use tracing_subscriber::EnvFilter;

/// Build the clap Command structure
fn build_command() -> Command {
    Command::new("sonardev")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Development-time helpers for SonarQube plugin authors")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("upload")
                .about("Copy a built plugin into a local server installation and restart it")
                .arg(
                    Arg::new("server-home")
                        .short('s')
                        .long("server-home")
                        .value_name("DIR")
                        .required(true)
                        .help("Home directory of the local server installation"),
                )
                .arg(
                    Arg::new("artifact")
                        .short('a')
                        .long("artifact")
                        .value_name("FILE")
                        .required(true)
                        .help("Path to the built plugin artifact"),
                )
                .arg(
                    Arg::new("server-url")
                        .short('u')
                        .long("server-url")
                        .value_name("URL")
                        .default_value(DEFAULT_SERVER_URL)
                        .help("Base URL of the running server"),
                ),
        )
        .subcommand(
            Command::new("trim")
                .about("Strip leading/trailing whitespace from text files, line by line")
                .arg(
                    Arg::new("directory")
                        .value_name("DIRECTORY")
                        .required(true)
                        .help("Root directory to scan"),
                )
                .arg(
                    Arg::new("include")
                        .short('i')
                        .long("include")
                        .value_name("GLOB")
                        .action(ArgAction::Append)
                        .help("Only trim files matching this root-relative pattern"),
                )
                .arg(
                    Arg::new("exclude")
                        .short('e')
                        .long("exclude")
                        .value_name("GLOB")
                        .action(ArgAction::Append)
                        .help("Skip files matching this root-relative pattern"),
                )
                .arg(
                    Arg::new("output")
                        .short('o')
                        .long("output")
                        .value_parser(["text", "json"])
                        .default_value("text")
                        .help("Report format"),
                ),
        )
}

/// Build a file selection from trim arguments
fn build_selection(matches: &ArgMatches) -> anyhow::Result<FileSelection> {
    let directory = matches
        .get_one::<String>("directory")
        .map(PathBuf::from)
        .context("missing directory argument")?;

    let mut selection = FileSelection::new(directory);

    if let Some(includes) = matches.get_many::<String>("include") {
        selection = selection.include_many(includes)?;
    }

    if let Some(excludes) = matches.get_many::<String>("exclude") {
        selection = selection.exclude_many(excludes)?;
    }

    Ok(selection)
}

/// Handler for the upload command
fn run_upload(matches: &ArgMatches) -> anyhow::Result<()> {
    let server_home = matches
        .get_one::<String>("server-home")
        .context("missing server home")?;
    let artifact = matches
        .get_one::<String>("artifact")
        .context("missing artifact")?;
    let server_url = matches
        .get_one::<String>("server-url")
        .context("missing server URL")?;

    let uploader = Uploader::new(server_home, artifact, server_url)?;
    let staged = uploader.run()?;

    println!(
        "{} staged at {}, server restarting",
        style(artifact).bold(),
        staged.display()
    );
    Ok(())
}

/// Handler for the trim command
fn run_trim(matches: &ArgMatches) -> anyhow::Result<()> {
    let selection = build_selection(matches)?;
    let report = trim_files(&selection)?;

    let output = matches
        .get_one::<String>("output")
        .map(|s| s.as_str())
        .unwrap_or("text");

    if output == "json" {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        for result in report.failures() {
            if let TrimOutcome::Failed { message } = &result.outcome {
                eprintln!(
                    "{} {}: {}",
                    style("failed").red(),
                    result.path.display(),
                    message
                );
            }
        }
        println!(
            "{}",
            style(format!(
                "{} files scanned: {} rewritten, {} unchanged, {} failed",
                report.total(),
                report.rewritten(),
                report.unchanged(),
                report.failed()
            ))
            .bold()
        );
    }

    if report.has_failures() {
        anyhow::bail!(
            "{} of {} files could not be trimmed",
            report.failed(),
            report.total()
        );
    }
    Ok(())
}

/// Install the tracing subscriber: stderr, info by default, RUST_LOG wins.
fn init_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("sonardev=info,sonardevlib=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> ExitCode {
    init_logging();

    let matches = build_command().get_matches();
    let result = match matches.subcommand() {
        Some(("upload", sub)) => run_upload(sub),
        Some(("trim", sub)) => run_trim(sub),
        _ => Ok(()),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
