//! Command-Line Interface
//!
//! `serve` (the default) runs the HTTP server; `transform` applies one
//! transformation to stdin or a file and writes the result to stdout or a
//! file, without touching the database.

use std::fs::File;
use std::io::{self, Read, Write};
use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};

use crate::transform::TransformKind;

#[derive(Parser, Debug)]
#[command(
    name = "transform_records",
    about = "Text-transformation records service",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the HTTP server (default)
    Serve,
    /// Transform text once and exit
    Transform(TransformArgs),
}

/// Flags of the `transform` subcommand.
///
/// `--base64` wins over `-c`; a missing or zero shift means reverse.
#[derive(Args, Debug, Clone, Default)]
pub struct TransformArgs {
    /// Caesar shift (negative values rotate backwards)
    #[arg(short = 'c', long = "caesar", allow_negative_numbers = true)]
    pub shift: Option<i32>,
    /// Base64-encode the input
    #[arg(long)]
    pub base64: bool,
    /// Read input from this file instead of stdin
    #[arg(short, long)]
    pub input: Option<PathBuf>,
    /// Write output to this file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
    /// Drop one trailing newline from the input first
    #[arg(long)]
    pub trim_newline: bool,
}

impl TransformArgs {
    // == Kind Selection ==
    /// The transformation these flags select.
    pub fn kind(&self) -> TransformKind {
        if self.base64 {
            TransformKind::Base64
        } else if self.shift.unwrap_or(0) != 0 {
            TransformKind::Caesar
        } else {
            TransformKind::Reverse
        }
    }

    // == Apply ==
    /// Reads all of `reader`, transforms it and writes the result to `writer`.
    pub fn apply<R: Read, W: Write>(&self, mut reader: R, mut writer: W) -> anyhow::Result<()> {
        let mut text = String::new();
        reader
            .read_to_string(&mut text)
            .context("reading input as UTF-8")?;

        let input = if self.trim_newline {
            trim_one_newline(&text)
        } else {
            text.as_str()
        };

        let kind = self.kind();
        let result = kind.apply(input, kind.effective_shift(self.shift.unwrap_or(0)));

        writer
            .write_all(result.as_bytes())
            .context("writing output")?;
        writer.flush().context("flushing output")?;
        Ok(())
    }

    // == Run ==
    /// Runs the subcommand against the configured files or stdio.
    pub fn run(&self) -> anyhow::Result<()> {
        let reader: Box<dyn Read> = match &self.input {
            Some(path) => Box::new(
                File::open(path)
                    .with_context(|| format!("opening input file {}", path.display()))?,
            ),
            None => Box::new(io::stdin().lock()),
        };

        let writer: Box<dyn Write> = match &self.output {
            Some(path) => Box::new(
                File::create(path)
                    .with_context(|| format!("creating output file {}", path.display()))?,
            ),
            None => Box::new(io::stdout().lock()),
        };

        self.apply(reader, writer)
    }
}

fn trim_one_newline(text: &str) -> &str {
    text.strip_suffix("\r\n")
        .or_else(|| text.strip_suffix('\n'))
        .unwrap_or(text)
}
