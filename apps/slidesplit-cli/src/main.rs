//! slidesplit binary
//!
//! Entry point: parse arguments, set up logging, run the split.

use clap::Parser;
use slidesplit_cli::Args;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn main() {
    let args = Args::parse();

    // Logs go to stderr; stdout stays free for shell pipelines
    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    tracing::debug!("slidesplit v{}", env!("CARGO_PKG_VERSION"));

    if let Err(e) = slidesplit_cli::run(&args) {
        eprintln!("error: {:#}", e);
        std::process::exit(1);
    }
}
