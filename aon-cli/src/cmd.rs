//! Module for `aon` subcommands.

use anyhow::Result;
use structopt::StructOpt;

pub mod decode;
pub mod encode;

#[derive(StructOpt)]
#[structopt(name = "aon", about = "Convert between JSON and AON 🦀")]
pub enum Options {
    #[structopt(about = "Convert a JSON document to AON.")]
    Encode(encode::Options),
    #[structopt(about = "Convert an AON document to JSON.")]
    Decode(decode::Options),
}

pub fn run() -> Result<()> {
    match Options::from_args() {
        Options::Encode(options) => encode::run(options),
        Options::Decode(options) => decode::run(options),
    }
}
