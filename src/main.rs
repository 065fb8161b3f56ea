//! out-prometheus CLI
//!
//! Reads events as newline-delimited JSON on stdin, applies them to the
//! metrics declared in the configuration file and serves the result for
//! Prometheus to scrape.

use clap::Parser;
use out_prometheus::{source::SourceError, Event, Exporter, ExporterConfig, JsonLinesSource};
use std::path::PathBuf;
use std::sync::mpsc;
use tracing::{error, info, warn};

#[derive(Debug, Parser)]
#[command(name = "out-prometheus", version, about)]
struct Args {
    /// Path to the TOML configuration file.
    #[arg(short, long, default_value = "out-prometheus.toml")]
    config: PathBuf,

    /// Validate the configuration and exit.
    #[arg(long)]
    check: bool,

    /// Stop once stdin is exhausted instead of serving until interrupted.
    #[arg(long)]
    exit_on_eof: bool,
}

enum Input {
    Event(Event),
    Eof,
    Interrupt,
}

fn main() {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let config = match ExporterConfig::from_file(&args.config) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("{}: {}", args.config.display(), e);
            std::process::exit(1);
        }
    };

    if args.check {
        println!(
            "{}: ok ({} metrics)",
            args.config.display(),
            config.metrics.len()
        );
        return;
    }

    info!("out-prometheus v{}", out_prometheus::VERSION);

    let mut exporter = match Exporter::init(config) {
        Ok(e) => e,
        Err(e) => {
            error!("Failed to initialize exporter: {}", e);
            std::process::exit(1);
        }
    };
    if let Err(e) = exporter.start() {
        error!("Failed to start exporter: {}", e);
        std::process::exit(1);
    }

    let (tx, rx) = mpsc::channel();

    let interrupt = tx.clone();
    if let Err(e) = ctrlc::set_handler(move || {
        let _ = interrupt.send(Input::Interrupt);
    }) {
        warn!("Failed to install Ctrl-C handler: {}", e);
    }

    std::thread::spawn(move || {
        let stdin = std::io::stdin();
        for item in JsonLinesSource::new(stdin.lock()) {
            match item {
                Ok(event) => {
                    if tx.send(Input::Event(event)).is_err() {
                        return;
                    }
                }
                Err(e @ SourceError::Parse { .. }) => warn!("Skipping event: {}", e),
                Err(e) => {
                    error!("Event input failed: {}", e);
                    break;
                }
            }
        }
        let _ = tx.send(Input::Eof);
    });

    let mut events: u64 = 0;
    let mut failures: u64 = 0;
    for input in rx {
        match input {
            Input::Event(event) => {
                let summary = exporter.handle(&event);
                events += 1;
                failures += summary.failed as u64;
            }
            Input::Eof => {
                info!("Input exhausted after {} events ({} failed updates)", events, failures);
                if args.exit_on_eof {
                    break;
                }
            }
            Input::Interrupt => {
                info!("Interrupted, shutting down");
                break;
            }
        }
    }

    exporter.close();
}
