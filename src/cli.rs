// src/cli.rs
use std::{env, path::PathBuf, time::Duration};

use crate::catalog::RemoteCatalog;
use crate::config::consts::DEFAULT_LOG_FILE;
use crate::config::options::{CollateOptions, ExtractOptions, RunOptions};
use crate::core::HttpFetcher;
use crate::error::{CliError, RunError, StoreError};
use crate::ident::is_base_id;
use crate::progress::{console_status, ConsoleProgress, NullProgress, Progress};
use crate::runner;

pub enum Command {
    Update(RunOptions),
    Collate(CollateOptions),
    Help,
}

/// Parse the process arguments and run the selected command.
pub fn run() -> Result<(), RunError> {
    match parse_args(env::args().skip(1))? {
        Command::Help => {
            println!("{}", include_str!("cli_help.txt"));
            Ok(())
        }
        Command::Update(opts) => {
            init_log(opts.log_file.clone())?;
            let mut fetcher = HttpFetcher::new(&opts.catalog)?;
            if opts.verbose {
                fetcher = fetcher.with_status(console_status());
            }
            let catalog = RemoteCatalog::new(opts.catalog.clone(), fetcher);
            let mut progress = progress_for(opts.verbose);
            runner::update(&opts, &catalog, progress.as_mut()).map(|_| ())
        }
        Command::Collate(opts) => {
            init_log(opts.log_file.clone())?;
            let mut progress = progress_for(opts.verbose);
            runner::collate(&opts, progress.as_mut()).map(|_| ())
        }
    }
}

fn init_log(path: Option<PathBuf>) -> Result<(), StoreError> {
    let path = path.unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_FILE));
    crate::log::init(&path).map_err(|source| StoreError::Write { path, source })
}

fn progress_for(verbose: bool) -> Box<dyn Progress> {
    if verbose { Box::new(ConsoleProgress::new()) } else { Box::new(NullProgress) }
}

/// Arguments after the program name.
pub fn parse_args<I: IntoIterator<Item = String>>(args: I) -> Result<Command, CliError> {
    let mut args = args.into_iter().peekable();
    match args.peek().map(String::as_str) {
        Some("collate") => {
            args.next();
            parse_collate(args)
        }
        Some("update") => {
            args.next();
            parse_update(args)
        }
        _ => parse_update(args),
    }
}

fn parse_update<I: Iterator<Item = String>>(mut args: I) -> Result<Command, CliError> {
    let mut opts = RunOptions::default();
    while let Some(a) = args.next() {
        match a.as_str() {
            "-i" | "--infile" => opts.infile = Some(path_value(&mut args, "--infile")?),
            "-o" | "--outfile" => opts.outfile = Some(path_value(&mut args, "--outfile")?),
            "-u" | "--updatefile" => opts.updatefile = Some(path_value(&mut args, "--updatefile")?),
            "-t" | "--table" => opts.table = Some(path_value(&mut args, "--table")?),
            "--ids" => {
                let v = args.next().ok_or(CliError::MissingValue("--ids"))?;
                opts.study_ids = Some(parse_ids_list(&v)?);
            }
            "--names" => opts.extract.substudy_names = true,
            "--consents" => opts.extract.consent_groups = true,
            "--top-level" => opts.extract = ExtractOptions::top_level(),
            "--retries" => opts.catalog.retries = number_value(&mut args, "--retries")?,
            "--timeout" => {
                opts.catalog.timeout = Duration::from_secs(number_value(&mut args, "--timeout")?)
            }
            "--log" => opts.log_file = Some(path_value(&mut args, "--log")?),
            "-v" | "--verbose" => opts.verbose = true,
            "-h" | "--help" => return Ok(Command::Help),
            _ => return Err(CliError::UnknownArg(a)),
        }
    }
    Ok(Command::Update(opts))
}

fn parse_collate<I: Iterator<Item = String>>(mut args: I) -> Result<Command, CliError> {
    let mut table = None;
    let mut requested = None;
    let mut existing = None;
    let mut new = None;
    let mut log_file = None;
    let mut verbose = false;
    while let Some(a) = args.next() {
        match a.as_str() {
            "--table" => table = Some(path_value(&mut args, "--table")?),
            "--requested" => requested = Some(path_value(&mut args, "--requested")?),
            "--existing" => existing = Some(path_value(&mut args, "--existing")?),
            "--new" => new = Some(path_value(&mut args, "--new")?),
            "--log" => log_file = Some(path_value(&mut args, "--log")?),
            "-v" | "--verbose" => verbose = true,
            "-h" | "--help" => return Ok(Command::Help),
            _ => return Err(CliError::UnknownArg(a)),
        }
    }

    let table = table.ok_or(CliError::Required("--table"))?;
    let requested = requested.ok_or(CliError::Required("--requested"))?;
    let mut opts = CollateOptions::new(table, requested);
    if let Some(p) = existing { opts.existing_out = p; }
    if let Some(p) = new { opts.new_out = p; }
    opts.log_file = log_file;
    opts.verbose = verbose;
    Ok(Command::Collate(opts))
}

fn path_value<I: Iterator<Item = String>>(args: &mut I, flag: &'static str) -> Result<PathBuf, CliError> {
    args.next().map(PathBuf::from).ok_or(CliError::MissingValue(flag))
}

fn number_value<T: std::str::FromStr, I: Iterator<Item = String>>(
    args: &mut I,
    flag: &'static str,
) -> Result<T, CliError> {
    let v = args.next().ok_or(CliError::MissingValue(flag))?;
    v.trim().parse().map_err(|_| CliError::InvalidValue { flag, value: v })
}

/// `phs1,phs2, phs3` → base ids in first-seen order, duplicates dropped.
fn parse_ids_list(s: &str) -> Result<Vec<String>, CliError> {
    let mut out: Vec<String> = Vec::new();
    for part in s.split(',') {
        let part = part.trim();
        if part.is_empty() { continue; }
        if !is_base_id(part) {
            return Err(CliError::InvalidValue { flag: "--ids", value: s!(part) });
        }
        if !out.iter().any(|id| id == part) {
            out.push(s!(part));
        }
    }
    Ok(out)
}
