// SPDX-FileCopyrightText: 2026 The Netgraph Authors
// SPDX-License-Identifier: LicenseRef-Netgraph-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Netgraph and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Netgraph CLI entrypoint.
//!
//! Replays a JSON-lines session (server messages and recorded gestures) from a file or stdin,
//! printing every outbound notification as one JSON line on stdout.

use std::error::Error;

use tokio::io::{AsyncBufRead, AsyncWriteExt, BufReader};
use tokio::sync::mpsc;

use netgraph::protocol::{inbound_schema, outbound_schema};
use netgraph::render::render_svg;
use netgraph::session::replay_lines;
use netgraph::{NetGraph, NetGraphConfig};

fn print_usage(program: &str) {
    eprintln!(
        "Usage:\n  {program} [--config <file>] [--svg <out>] [<session.jsonl>]\n  {program} --schema <inbound|outbound>\n\nReads the session from stdin when no file is given.\nLog verbosity follows RUST_LOG (default: warn)."
    );
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SchemaKind {
    Inbound,
    Outbound,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
struct CliOptions {
    config: Option<String>,
    svg: Option<String>,
    schema: Option<SchemaKind>,
    input: Option<String>,
}

fn parse_options(mut args: impl Iterator<Item = String>) -> Result<CliOptions, ()> {
    let mut options = CliOptions::default();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" => {
                if options.config.is_some() {
                    return Err(());
                }
                options.config = Some(args.next().ok_or(())?);
            }
            "--svg" => {
                if options.svg.is_some() {
                    return Err(());
                }
                options.svg = Some(args.next().ok_or(())?);
            }
            "--schema" => {
                if options.schema.is_some() {
                    return Err(());
                }
                options.schema = match args.next().ok_or(())?.as_str() {
                    "inbound" => Some(SchemaKind::Inbound),
                    "outbound" => Some(SchemaKind::Outbound),
                    _ => return Err(()),
                };
            }
            _ if arg.starts_with('-') => return Err(()),
            _ => {
                if options.input.is_some() {
                    return Err(());
                }
                options.input = Some(arg);
            }
        }
    }

    if options.schema.is_some()
        && (options.config.is_some() || options.svg.is_some() || options.input.is_some())
    {
        return Err(());
    }

    Ok(options)
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run(options: CliOptions) -> Result<(), Box<dyn Error>> {
    let config = match &options.config {
        Some(path) => NetGraphConfig::load(path)?,
        None => NetGraphConfig::default(),
    };

    let reader: Box<dyn AsyncBufRead + Unpin> = match &options.input {
        Some(path) => Box::new(BufReader::new(tokio::fs::File::open(path).await?)),
        None => Box::new(BufReader::new(tokio::io::stdin())),
    };

    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut graph = NetGraph::new(&config).with_outbound(tx);

    let replay = async {
        let stats = replay_lines(&mut graph, reader).await;
        graph.disconnect();
        stats
    };
    let printer = async {
        let mut stdout = tokio::io::stdout();
        while let Some(message) = rx.recv().await {
            let mut line = message.to_json()?;
            line.push('\n');
            stdout.write_all(line.as_bytes()).await?;
        }
        stdout.flush().await?;
        Ok::<_, Box<dyn Error>>(())
    };
    let (stats, printed) = tokio::join!(replay, printer);
    let stats = stats?;
    printed?;
    tracing::info!(
        lines = stats.lines,
        applied = stats.applied,
        skipped = stats.skipped,
        "replay complete"
    );

    if let Some(path) = &options.svg {
        tokio::fs::write(path, render_svg(&graph)?).await?;
    }
    Ok(())
}

fn main() {
    let result = (|| -> Result<(), Box<dyn Error>> {
        let mut args = std::env::args();
        let program = args.next().unwrap_or_else(|| "netgraph".to_owned());

        let options = match parse_options(args) {
            Ok(options) => options,
            Err(()) => {
                print_usage(&program);
                std::process::exit(2);
            }
        };

        if let Some(kind) = options.schema {
            let schema = match kind {
                SchemaKind::Inbound => inbound_schema(),
                SchemaKind::Outbound => outbound_schema(),
            };
            println!("{}", serde_json::to_string_pretty(&schema)?);
            return Ok(());
        }

        init_tracing();
        let runtime = tokio::runtime::Builder::new_current_thread().enable_all().build()?;
        runtime.block_on(run(options))
    })();

    if let Err(err) = result {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
