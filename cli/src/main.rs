/*!

This is the command line interface for the MTV end-to-end test harness. It records the resources a
test run creates, deletes them afterwards, and inspects the snapshot state of vSphere VMs used by
warm migration tests.

!*/

mod cleanup;
mod list;
mod provider;
mod snapshots;
mod track;

use clap::Parser;
use env_logger::Builder;
use log::LevelFilter;
use model::constants::RESOURCES_FILE;
use model::ResourceTracker;
use std::path::PathBuf;

/// The command line interface for cleaning up after MTV end-to-end tests.
#[derive(Debug, Parser)]
#[clap(author, version, about)]
struct Args {
    /// Set logging verbosity [trace|debug|info|warn|error]. If the environment variable `RUST_LOG`
    /// is present, it overrides the default logging behavior. See https://docs.rs/env_logger/latest
    #[clap(long = "log-level", default_value = "info")]
    log_level: LevelFilter,
    /// The file that tracked resources are saved to and restored from.
    #[clap(long = "state-file", env = "MTV_TESTSYS_STATE_FILE", default_value = RESOURCES_FILE)]
    state_file: PathBuf,
    #[clap(subcommand)]
    command: Command,
}

#[derive(Debug, Parser)]
enum Command {
    /// Record a resource for later cleanup.
    Track(track::Track),
    /// Show the tracked resources.
    List(list::List),
    /// Delete every tracked resource through the console.
    Cleanup(cleanup::Cleanup),
    /// Inspect or wait on VM snapshots in the provider inventory.
    #[clap(subcommand)]
    Snapshots(snapshots::Snapshots),
    /// Show entries of the provider table.
    Provider(provider::Provider),
}

#[tokio::main]
async fn main() {
    let args = Args::parse();
    init_logger(args.log_level);
    if let Err(e) = run(args).await {
        eprintln!("{:#}", e);
        std::process::exit(1);
    }
}

async fn run(args: Args) -> anyhow::Result<()> {
    let tracker = ResourceTracker::with_state_file(args.state_file);
    match args.command {
        Command::Track(track) => track.run(tracker).await,
        Command::List(list) => list.run(tracker).await,
        Command::Cleanup(cleanup) => cleanup.run(tracker).await,
        Command::Snapshots(snapshots) => snapshots.run().await,
        Command::Provider(provider) => provider.run(),
    }
}

/// Initialize the logger with the value passed by `--log-level` (or its default) when the
/// `RUST_LOG` environment variable is not present. If present, the `RUST_LOG` environment variable
/// overrides `--log-level`/`level`.
fn init_logger(level: LevelFilter) {
    match std::env::var(env_logger::DEFAULT_FILTER_ENV).ok() {
        Some(_) => {
            // RUST_LOG exists; env_logger will use it.
            Builder::from_default_env().init();
        }
        None => {
            // RUST_LOG does not exist; use default log level for this crate and the library.
            Builder::new()
                .filter(Some(env!("CARGO_CRATE_NAME")), level)
                .filter(Some("model"), level)
                .init();
        }
    }
}
