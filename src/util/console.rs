//! Console prompts, parsing and random-number helpers.
//!
//! Prompt functions take any `BufRead`/`Write` pair so they work on
//! stdin/stdout as well as in-memory buffers.

use rand::Rng;
use std::io::{self, BufRead, Read, Write};

/// Value returned by [`read_int`] when the input is not an integer.
pub const INVALID_INT: i32 = -1024;

const YES: [&str; 5] = ["Y", "Yes", "YES", "yes", "y"];
const NO: [&str; 5] = ["N", "No", "NO", "no", "n"];

fn next_token<R: BufRead>(input: &mut R) -> io::Result<String> {
    let mut line = String::new();
    loop {
        line.clear();
        if input.read_line(&mut line)? == 0 {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "input closed",
            ));
        }
        if let Some(token) = line.split_whitespace().next() {
            return Ok(token.to_string());
        }
    }
}

/// Reads a yes/no answer, asking again until one is given.
pub fn prompt_yes_no<R: BufRead, W: Write>(input: &mut R, output: &mut W) -> io::Result<bool> {
    loop {
        let token = next_token(input)?;
        if YES.contains(&token.as_str()) {
            return Ok(true);
        }
        if NO.contains(&token.as_str()) {
            return Ok(false);
        }
        write!(
            output,
            "ERROR: you can only enter 'Yes', 'No' or a similar variation.\nTry again: "
        )?;
        output.flush()?;
    }
}

/// Reads one line without its line terminator.
pub fn read_line<R: BufRead>(input: &mut R) -> io::Result<String> {
    let mut line = String::new();
    input.read_line(&mut line)?;
    let trimmed = line.trim_end_matches(['\r', '\n']).len();
    line.truncate(trimmed);
    Ok(line)
}

/// Reads an integer token, or [`INVALID_INT`] if it does not parse.
pub fn read_int<R: BufRead>(input: &mut R) -> io::Result<i32> {
    Ok(parse_leading_int(&next_token(input)?).unwrap_or(INVALID_INT))
}

/// Reads an integer in `min..=max`, asking again until one is given.
pub fn read_int_in_range<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    min: i32,
    max: i32,
) -> io::Result<i32> {
    loop {
        let value = read_int(input)?;
        if (min..=max).contains(&value) {
            return Ok(value);
        }
        write!(
            output,
            "ERROR: you can only enter a whole number between {min} and {max}.\nTry again: "
        )?;
        output.flush()?;
    }
}

/// Parses the leading integer of `token` the way a stream extraction does:
/// optional sign, then digits, trailing garbage ignored.
fn parse_leading_int(token: &str) -> Option<i32> {
    let sign_len = usize::from(token.starts_with(['+', '-']));
    let digits = token[sign_len..]
        .bytes()
        .take_while(u8::is_ascii_digit)
        .count();
    if digits == 0 {
        return None;
    }
    token[..sign_len + digits].parse().ok()
}

/// True if `s` is non-empty and made only of ASCII digits.
pub fn is_int(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

/// Percentage change from `a` to `b`, rounded.
pub fn percent_diff(a: f64, b: f64) -> i32 {
    ((b - a) * 100.0 / a).round() as i32
}

/// Clears the terminal.
pub fn clear_screen<W: Write>(output: &mut W) -> io::Result<()> {
    write!(output, "\x1B[2J\x1B[1;1H")?;
    output.flush()
}

/// Prints `msg` and waits for a single byte of input, which is returned.
///
/// Returns `None` at end of input. The rest of the line stays buffered in
/// `input`. A terminal in canonical mode still delivers input only after
/// Enter.
pub fn pause<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    msg: &str,
) -> io::Result<Option<char>> {
    write!(output, "{msg}")?;
    output.flush()?;
    let mut key = [0u8; 1];
    let key = match input.read(&mut key)? {
        0 => None,
        _ => Some(char::from(key[0])),
    };
    writeln!(output)?;
    Ok(key)
}

/// Uniform random integer in `min..=max`.
pub fn rand_int(min: i32, max: i32) -> i32 {
    rand::thread_rng().gen_range(min..=max)
}

/// Uniform random float in `min..max`.
pub fn rand_float(min: f32, max: f32) -> f32 {
    rand::thread_rng().gen_range(min..max)
}
