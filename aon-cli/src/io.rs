//! Input and output plumbing shared by the subcommands.

use anyhow::{Context as _, Result};
use std::{
    fs,
    io::{self, Read, Write},
    path::Path,
};

/// Reads the whole input document from a file, or from stdin when no path
/// is given.
pub fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("Error reading {}", path.display())),
        None => {
            let mut input = String::new();
            io::stdin()
                .read_to_string(&mut input)
                .context("Error reading stdin")?;
            Ok(input)
        }
    }
}

/// Writes the output document to a file, or to stdout when no path is given.
pub fn write_output(path: Option<&Path>, text: &str) -> Result<()> {
    match path {
        Some(path) => {
            let mut file = fs::File::create(path)
                .with_context(|| format!("Error creating {}", path.display()))?;
            write_text(&mut file, text)
                .with_context(|| format!("Error writing {}", path.display()))
        }
        None => write_text(&mut io::stdout().lock(), text).context("Error writing stdout"),
    }
}

fn write_text(writer: &mut impl Write, text: &str) -> io::Result<()> {
    writer.write_all(text.as_bytes())?;
    if !text.ends_with('\n') {
        writer.write_all(b"\n")?;
    }
    writer.flush()
}
