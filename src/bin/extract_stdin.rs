//! Simple CLI that reads HTML from stdin and writes the extraction to stdout.
//!
//! ```text
//! extract_stdin [--url <page url>] [--markdown] < page.html
//! ```
//!
//! Prints the `ExtractionResult` as JSON, or with `--markdown` the Markdown
//! document with its front matter. Logs go to stderr; set `RUST_LOG` to
//! see the pipeline's debug events.

use std::io::{self, Read};
use std::process::ExitCode;

use rs_markclip::{extract_bytes_with_options, Options};
use tracing_subscriber::EnvFilter;

struct Args {
    url: Option<String>,
    markdown: bool,
}

fn parse_args() -> Result<Args, String> {
    let mut args = Args {
        url: None,
        markdown: false,
    };
    let mut iter = std::env::args().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--url" => args.url = Some(iter.next().ok_or("--url needs a value")?),
            "--markdown" => args.markdown = true,
            other => return Err(format!("unknown argument: {other}")),
        }
    }
    Ok(args)
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let args = match parse_args() {
        Ok(args) => args,
        Err(msg) => {
            eprintln!("{msg}");
            eprintln!("usage: extract_stdin [--url <url>] [--markdown] < page.html");
            return ExitCode::from(2);
        }
    };

    let mut html = Vec::new();
    if let Err(e) = io::stdin().read_to_end(&mut html) {
        tracing::error!(error = %e, "failed to read from stdin");
        return ExitCode::FAILURE;
    }

    let options = Options {
        url: args.url,
        ..Options::default()
    };

    let result = match extract_bytes_with_options(&html, &options) {
        Ok(result) => result,
        Err(e) => {
            tracing::warn!(error = %e, "extraction failed");
            eprintln!("{e}");
            return ExitCode::FAILURE;
        }
    };

    if args.markdown {
        print!("{}", result.to_markdown_document());
        return ExitCode::SUCCESS;
    }

    match serde_json::to_string_pretty(&result) {
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = %e, "failed to serialize result");
            ExitCode::FAILURE
        }
    }
}
