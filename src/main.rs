// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! strict-soup CLI - strict CSS selection from the command line

use std::env;
use std::io::{self, Read};
use std::process::ExitCode;

use anyhow::{bail, Context};
use serde::Serialize;
use strict_soup::{parser_config_from_env, ParseMode, ParserConfig, StrictSoup, StrictTag};

/// Output record for `--json`
#[derive(Debug, Serialize)]
struct TagRecord {
    name: Option<String>,
    attrs: Vec<(String, String)>,
    text: String,
    html: String,
}

impl From<&StrictTag> for TagRecord {
    fn from(tag: &StrictTag) -> Self {
        Self {
            name: tag.name(),
            attrs: tag.attrs(),
            text: tag.text(),
            html: tag.outer_html(),
        }
    }
}

/// Parsed command line
#[derive(Debug, Default)]
struct Options {
    json: bool,
    fragment: bool,
    base_url: Option<String>,
    positional: Vec<String>,
}

impl Options {
    fn parse(mut args: impl Iterator<Item = String>) -> anyhow::Result<Self> {
        let mut opts = Options::default();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--json" => opts.json = true,
                "--fragment" => opts.fragment = true,
                "--base-url" => {
                    let url = args.next().context("--base-url needs a value")?;
                    opts.base_url = Some(url);
                }
                flag if flag.starts_with("--") => bail!("unknown option: {flag}"),
                _ => opts.positional.push(arg.clone()),
            }
        }
        Ok(opts)
    }

    fn config(&self) -> anyhow::Result<ParserConfig> {
        let mut config = parser_config_from_env()?;
        if self.fragment {
            config = config.mode(ParseMode::Fragment);
        }
        if let Some(url) = &self.base_url {
            config = config.base_url_str(url)?;
        }
        Ok(config)
    }

    /// Load the document from the positional argument at `idx`, or stdin
    fn load(&self, idx: usize) -> anyhow::Result<StrictSoup> {
        let config = self.config()?;
        match self.positional.get(idx).map(String::as_str) {
            None | Some("-") => {
                let mut buf = Vec::new();
                io::stdin()
                    .read_to_end(&mut buf)
                    .context("reading stdin")?;
                Ok(StrictSoup::from_bytes(&buf, config)?)
            }
            Some(path) => StrictSoup::from_file(path, config)
                .with_context(|| format!("parsing {path}")),
        }
    }

    fn arg(&self, idx: usize, what: &str) -> anyhow::Result<&str> {
        self.positional
            .get(idx)
            .map(String::as_str)
            .with_context(|| format!("missing <{what}>"))
    }
}

fn main() -> ExitCode {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("strict_soup=info")),
        )
        .init();

    let mut args = env::args().skip(1);
    let Some(command) = args.next() else {
        print_usage();
        return ExitCode::from(1);
    };

    match command.as_str() {
        "--help" | "-h" | "help" => {
            print_usage();
            return ExitCode::SUCCESS;
        }
        "--version" | "-v" | "version" => {
            println!("strict-soup {}", strict_soup::VERSION);
            return ExitCode::SUCCESS;
        }
        _ => {}
    }

    let result = Options::parse(args).and_then(|opts| run(&command, &opts));
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::from(exit_status(&err))
        }
    }
}

/// 1 for a failed strict lookup, 2 for anything else
fn exit_status(err: &anyhow::Error) -> u8 {
    match err.downcast_ref::<strict_soup::Error>() {
        Some(e) if e.is_strict_select() => 1,
        _ => 2,
    }
}

fn run(command: &str, opts: &Options) -> anyhow::Result<()> {
    match command {
        "select" => {
            let selector = opts.arg(0, "selector")?;
            let soup = opts.load(1)?;
            let matches = soup.strict_select(selector)?;
            emit(opts, matches.iter(), StrictTag::outer_html)
        }
        "select-one" => {
            let selector = opts.arg(0, "selector")?;
            let soup = opts.load(1)?;
            let tag = soup.strict_select_one(selector)?;
            emit(opts, std::iter::once(&tag), StrictTag::outer_html)
        }
        "text" => {
            let selector = opts.arg(0, "selector")?;
            let soup = opts.load(1)?;
            let matches = soup.strict_select(selector)?;
            emit(opts, matches.iter(), StrictTag::stripped_text)
        }
        "get" => {
            let selector = opts.arg(0, "selector")?;
            let attr = opts.arg(1, "attr")?;
            let soup = opts.load(2)?;
            let value = soup.strict_select_one(selector)?.strict_get(attr)?;
            if opts.json {
                println!("{}", serde_json::to_string(&value)?);
            } else {
                println!("{value}");
            }
            Ok(())
        }
        cmd => {
            print_usage();
            bail!("unknown command: {cmd}")
        }
    }
}

/// Print tags as JSON lines or with `plain`
fn emit<'a>(
    opts: &Options,
    tags: impl Iterator<Item = &'a StrictTag>,
    plain: fn(&StrictTag) -> String,
) -> anyhow::Result<()> {
    for tag in tags {
        if opts.json {
            println!("{}", serde_json::to_string(&TagRecord::from(tag))?);
        } else {
            println!("{}", plain(tag));
        }
    }
    Ok(())
}

fn print_usage() {
    println!(
        r#"strict-soup - Strict CSS selection over HTML

USAGE:
    strict-soup <COMMAND> [OPTIONS] [FILE]

COMMANDS:
    select <selector> [file]        Print every match (fails if none)
    select-one <selector> [file]    Print the single match (fails unless exactly one)
    text <selector> [file]          Print the text of every match
    get <selector> <attr> [file]    Print an attribute of the single match
    help                            Show this help message
    version                         Show version information

OPTIONS:
    --json              Emit JSON, one record per line
    --fragment          Parse without adding html/head/body
    --base-url <url>    Base URL for relative links

FILE defaults to stdin ("-"). Set RUST_LOG=strict_soup=debug for parser logs.
STRICT_SOUP_MODE and STRICT_SOUP_BASE_URL provide defaults for the options.

EXIT STATUS:
    0 on success, 1 when a strict lookup fails, 2 on any other error
"#
    );
}
