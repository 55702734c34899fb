//! Subcommand used for converting JSON documents to AON.

use crate::io;
use anyhow::{Context as _, Result};
use std::path::PathBuf;
use structopt::StructOpt;

#[derive(StructOpt)]
pub struct Options {
    #[structopt(name = "FILE", help = "JSON document to convert, stdin if omitted.")]
    input: Option<PathBuf>,

    #[structopt(long, help = "Name of the root schema.")]
    root: String,

    #[structopt(short, long, help = "File to write the AON document to.")]
    output: Option<PathBuf>,
}

pub fn run(options: Options) -> Result<()> {
    let json = io::read_input(options.input.as_deref())?;
    let aon = encode(&json, &options.root)?;
    io::write_output(options.output.as_deref(), &aon)
}

fn encode(json: &str, root: &str) -> Result<String> {
    log::debug!("encoding {} bytes of JSON with root schema {:?}", json.len(), root);
    aon::json_to_aon(json, root).context("Error converting JSON to AON")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_files() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("person.json");
        let output = dir.path().join("person.aon");
        std::fs::write(&input, r#"{"name":"x"}"#).unwrap();

        run(Options {
            input: Some(input),
            root: "Person".to_owned(),
            output: Some(output.clone()),
        })
        .unwrap();

        let aon = std::fs::read_to_string(&output).unwrap();
        assert!(aon.contains("Person:(name:string)"));
        assert!(aon.ends_with('\n'));
    }

    #[test]
    fn reports_conversion_errors_with_context() {
        let err = encode("not json", "Person").unwrap_err();
        assert_eq!(err.to_string(), "Error converting JSON to AON");
        assert!(!err.root_cause().to_string().is_empty());
    }
}
