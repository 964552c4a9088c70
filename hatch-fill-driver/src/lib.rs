pub mod cli;
pub mod client;
pub mod fill;
pub mod logging;
pub mod tracing;

use clap::Parser;
use once_cell::sync::Lazy;

pub use client::{Client, NodeId, NodeSink};
pub use fill::{FillError, FillReport, Filler, Outcome, PROGRESS_INTERVAL, fill};

use crate::cli::Cli;

pub const APPLICATION_NAME: &str = "hatch-fill";

pub static VERSION: Lazy<&str> = Lazy::new(version);

fn version() -> &'static str {
    if cfg!(debug_assertions) {
        "debug"
    } else if let Some(tag) = option_env!("RELEASE_TAG_NAME")
        .filter(|tag| tag.starts_with("nightly"))
    {
        tag
    } else {
        env!("CARGO_PKG_VERSION")
    }
}

pub fn mainloop() {
    let cli = Cli::parse();
    logging::logging();

    println!("URL: {}", cli.url);

    let result = Client::new(&cli.url).and_then(|client| Ok(fill(client)?));

    match result {
        Ok(report) => println!("{report}"),
        Err(error) => {
            eprintln!("Fill failed: {error:#}");
            std::process::exit(1);
        }
    }
}
