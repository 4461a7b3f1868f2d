//! Extraction of `<`, `>` and `|` from an argument vector.
//!
//! The vector is scanned once, left to right. `<` and `>` take the following
//! token as a path and are removed together with it. The files are opened only
//! once the line is known to hold a command, so a rejected line never creates
//! or truncates anything. The first `|` stops the scan: everything after it becomes the second segment
//! verbatim, so redirections and further pipes there are passed through as
//! plain arguments.

use crate::error::{Result, ShellError};
use std::fs::{File, OpenOptions};
use std::path::PathBuf;

/// Redirections found before the pipe, with their files already open.
///
/// The open handles are owned here until the orchestrator takes them, so any
/// early return closes them.
#[derive(Debug, Default)]
pub struct RedirectionSpec {
    pub input_path: Option<PathBuf>,
    pub output_path: Option<PathBuf>,
    /// Position of the `|` token in the original argument vector.
    pub pipe_split_index: Option<usize>,
    input: Option<File>,
    output: Option<File>,
}

impl RedirectionSpec {
    pub fn take_input(&mut self) -> Option<File> {
        self.input.take()
    }

    pub fn take_output(&mut self) -> Option<File> {
        self.output.take()
    }
}

/// A command line split into at most two segments.
#[derive(Debug)]
pub struct ParsedLine {
    pub first: Vec<String>,
    pub second: Option<Vec<String>>,
    pub redirects: RedirectionSpec,
}

pub fn parse(args: Vec<String>) -> Result<ParsedLine> {
    let mut first = Vec::with_capacity(args.len());
    let mut spec = RedirectionSpec::default();
    let mut second = None;

    let mut iter = args.into_iter().enumerate();
    while let Some((idx, token)) = iter.next() {
        match token.as_str() {
            "<" => {
                spec.input_path = Some(redirect_target(iter.next(), "<")?);
            }
            ">" => {
                spec.output_path = Some(redirect_target(iter.next(), ">")?);
            }
            "|" => {
                spec.pipe_split_index = Some(idx);
                second = Some(iter.map(|(_, t)| t).collect::<Vec<_>>());
                break;
            }
            _ => first.push(token),
        }
    }

    match &second {
        Some(rest) if first.is_empty() || rest.is_empty() => {
            return Err(ShellError::process("|", "missing command on one side of the pipe"));
        }
        None if first.is_empty() => {
            return Err(ShellError::process("redirection", "missing command"));
        }
        _ => {}
    }

    if let Some(path) = &spec.input_path {
        log::debug!("stdin <- {}", path.display());
        spec.input = Some(File::open(path).map_err(|e| ShellError::io(path, e))?);
    }
    if let Some(path) = &spec.output_path {
        log::debug!("stdout -> {}", path.display());
        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(path)
            .map_err(|e| ShellError::io(path, e))?;
        spec.output = Some(file);
    }

    Ok(ParsedLine {
        first,
        second,
        redirects: spec,
    })
}

fn redirect_target(next: Option<(usize, String)>, op: &str) -> Result<PathBuf> {
    match next {
        Some((_, path)) => Ok(PathBuf::from(path)),
        None => Err(ShellError::Path(format!("{op}: expected argument"))),
    }
}
