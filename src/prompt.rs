//! Interactive console prompts for the old and new project names.
//!
//! Generic over the reader/writer so tests can drive them without a terminal.

use std::io::{BufRead, Write};
use anyhow::{Context, Result, bail};

pub const WARNING: &str = "Make sure you did NOT change any of the file/folder names.";
pub const OLD_NAME_PROMPT: &str = "Input Old Project Name: ";
pub const NEW_NAME_PROMPT: &str = "Input New Project Name: ";

/// Asks for whichever of the two names was not given on the command line.
///
/// Returns `(old_name, new_name)`.
pub fn prompt_names<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    old_name: Option<String>,
    new_name: Option<String>,
) -> Result<(String, String)> {
    if let (Some(old), Some(new)) = (&old_name, &new_name) {
        return Ok((old.clone(), new.clone()));
    }

    writeln!(output, "{}", WARNING)?;

    let old = match old_name {
        Some(old) => old,
        None => ask(input, output, OLD_NAME_PROMPT)?,
    };
    writeln!(output, "\nKeyword this script will look for and change is: {}", old)?;

    let new = match new_name {
        Some(new) => new,
        None => ask(input, output, NEW_NAME_PROMPT)?,
    };

    Ok((old, new))
}

fn ask<R: BufRead, W: Write>(input: &mut R, output: &mut W, prompt: &str) -> Result<String> {
    write!(output, "\n{}", prompt)?;
    output.flush()?;

    let mut line = String::new();
    let read = input.read_line(&mut line).context("Failed to read from stdin")?;
    if read == 0 {
        bail!("Input ended before an answer to {:?}", prompt.trim_end());
    }

    // Only the line terminator is stripped; other whitespace is part of the name
    if line.ends_with('\n') {
        line.pop();
        if line.ends_with('\r') {
            line.pop();
        }
    }
    Ok(line)
}
