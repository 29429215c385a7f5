//! Interactive selection of the low-level entry and exit waypoints.

use std::io::{BufRead, Write};

use anyhow::{bail, Result};

/// Parse a 1-based waypoint number within `min..=max`.
pub fn parse_index(input: &str, min: usize, max: usize) -> Result<usize, String> {
    let number: usize = input
        .trim()
        .parse()
        .map_err(|_| "Invalid number. Please enter a valid integer.".to_string())?;
    if number < min || number > max {
        return Err(format!("The number must be between {min} and {max}."));
    }
    Ok(number)
}

/// Parse an `ENTRY:EXIT` pair of 1-based waypoint numbers.
pub fn parse_low_level_pair(input: &str) -> Result<(usize, usize), String> {
    let (entry, exit) = input
        .split_once(':')
        .ok_or_else(|| format!("expected ENTRY:EXIT, got '{input}'"))?;
    let entry = parse_index(entry, 1, usize::MAX)?;
    let exit = parse_index(exit, 1, usize::MAX)?;
    Ok((entry, exit))
}

/// Ask until the answer is a number within `min..=max`.
pub fn prompt_index<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    message: &str,
    min: usize,
    max: usize,
) -> Result<usize> {
    loop {
        write!(output, "{message} ({min}..{max}): ")?;
        output.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            bail!("no waypoint number given");
        }
        match parse_index(&line, min, max) {
            Ok(number) => return Ok(number),
            Err(msg) => writeln!(output, "Error: {msg}")?,
        }
    }
}

/// Ask for one entry/exit pair on a route of `count` waypoints.
pub fn prompt_low_level_pair<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    count: usize,
) -> Result<(usize, usize)> {
    if count < 2 {
        bail!("a low-level segment needs at least two waypoints");
    }
    let entry = prompt_index(input, output, "Low level entry point waypoint index", 1, count - 1)?;
    let exit = prompt_index(
        input,
        output,
        "Low level exit point waypoint index",
        entry + 1,
        count,
    )?;
    Ok((entry, exit))
}
