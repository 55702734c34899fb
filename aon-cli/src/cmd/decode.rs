//! Subcommand used for converting AON documents to JSON.

use crate::io;
use anyhow::{Context as _, Result};
use serde_json::Value;
use std::path::PathBuf;
use structopt::StructOpt;

#[derive(StructOpt)]
pub struct Options {
    #[structopt(name = "FILE", help = "AON document to convert, stdin if omitted.")]
    input: Option<PathBuf>,

    #[structopt(long, help = "Indent the JSON output.")]
    pretty: bool,

    #[structopt(short, long, help = "File to write the JSON document to.")]
    output: Option<PathBuf>,
}

pub fn run(options: Options) -> Result<()> {
    let aon = io::read_input(options.input.as_deref())?;
    let json = decode(&aon, options.pretty)?;
    io::write_output(options.output.as_deref(), &json)
}

fn decode(aon: &str, pretty: bool) -> Result<String> {
    log::debug!("decoding {} bytes of AON", aon.len());
    let json = aon::aon_to_json(aon).context("Error converting AON to JSON")?;
    if !pretty {
        return Ok(json);
    }

    let value = serde_json::from_str::<Value>(&json).context("Engine returned invalid JSON")?;
    Ok(serde_json::to_string_pretty(&value)?)
}
