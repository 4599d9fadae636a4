//! Interactive collection of the search mode and terms
//!
//! Both functions are generic over their input and output streams so they
//! can be driven by in-memory buffers in tests.

use crate::matching::SearchMode;
use crate::{Result, SiftError};
use std::io::{BufRead, Write};

/// Asks for the search mode until a valid choice is entered
///
/// Accepts `1` or `2` (or the mode names). Anything else is rejected and the
/// question is asked again; there is no default. End of input is an error.
pub fn read_mode<R: BufRead, W: Write>(input: &mut R, output: &mut W) -> Result<SearchMode> {
    loop {
        writeln!(output, "Choose the mode:")?;
        writeln!(
            output,
            "1. Search for modules (e.g., specific class patterns)."
        )?;
        writeln!(output, "2. Search for specific words or phrases.")?;
        write!(output, "Enter 1 or 2: ")?;
        output.flush()?;

        let line = read_line(input)?;
        match line.parse::<SearchMode>() {
            Ok(mode) => return Ok(mode),
            Err(_) if line.trim().parse::<i64>().is_ok() => {
                writeln!(output, "Invalid mode. Please enter 1 or 2.")?;
            }
            Err(_) => {
                writeln!(output, "Invalid input. Please enter a number.")?;
            }
        }
    }
}

/// Asks for the comma-separated terms for `mode`
///
/// The raw line is returned untouched; splitting and trimming happen in
/// [`crate::matching::compile_patterns`].
pub fn read_terms<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    mode: SearchMode,
) -> Result<String> {
    let question = match mode {
        SearchMode::Structural => "Enter the class patterns to search for, separated by commas: ",
        SearchMode::Textual => "Enter words or phrases to search for, separated by commas: ",
    };
    write!(output, "{}", question)?;
    output.flush()?;

    let line = read_line(input)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

fn read_line<R: BufRead>(input: &mut R) -> Result<String> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Err(SiftError::Input(
            "input closed before a value was entered".to_string(),
        ));
    }
    Ok(line)
}
