mod tui;

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tokio::sync::{mpsc, watch};

use hostelbite::config::Config;
use hostelbite::engine::{Listing, ListingSnapshot, MealFilter};
use hostelbite::source::fixture::FixtureSource;
use hostelbite::source::rest::RestMealSource;
use hostelbite::source::MealSource;
use tui::BrowseCommand;

/// Latency applied to the embedded catalog so offline runs still show the
/// loading states a real connection produces.
const OFFLINE_LATENCY: Duration = Duration::from_millis(250);

#[tokio::main]
async fn main() -> Result<()> {
    let log_file = std::fs::File::create("hostelbite.log")?;
    tracing_subscriber::fmt()
        .with_env_filter("hostelbite=info")
        .with_writer(log_file)
        .init();

    let offline = std::env::args().any(|arg| arg == "--offline");

    let config = Config::load(Path::new("config.toml"))?;

    let source: Arc<dyn MealSource> = if offline {
        tracing::info!("serving meals from the embedded catalog");
        Arc::new(FixtureSource::from_embedded()?.with_latency(OFFLINE_LATENCY))
    } else {
        tracing::info!(base_url = %config.api.base_url, "serving meals from the hosted service");
        Arc::new(RestMealSource::new(&config.api)?)
    };

    let listing = Listing::new(source, MealFilter::default(), config.listing.page_size);

    let (state_tx, state_rx) = watch::channel(listing.snapshot());
    let (cmd_tx, cmd_rx) = mpsc::channel::<BrowseCommand>(16);

    let listing_task = tokio::spawn(run_listing(listing, state_tx, cmd_rx));

    let result = tui::run_tui(state_rx, cmd_tx, config.ui.scroll_prefetch, offline).await;

    // run_tui dropped its sender, so the task sees the channel close and
    // stops on its own.
    let _ = listing_task.await;

    result
}

/// Own the listing: apply browser commands, drive fetches, and publish a
/// fresh snapshot after every change.
async fn run_listing(
    mut listing: Listing,
    state_tx: watch::Sender<ListingSnapshot>,
    mut cmd_rx: mpsc::Receiver<BrowseCommand>,
) {
    loop {
        tokio::select! {
            maybe_cmd = cmd_rx.recv() => {
                match maybe_cmd {
                    Some(BrowseCommand::Filter(filter)) => listing.set_filter(filter),
                    Some(BrowseCommand::NextPage) => listing.request_next_page(),
                    Some(BrowseCommand::Retry) => listing.retry(),
                    Some(BrowseCommand::Refresh) => listing.refresh(),
                    Some(BrowseCommand::Quit) | None => break,
                }
            }
            () = listing.drive(), if listing.has_pending_io() => {}
        }
        let _ = state_tx.send(listing.snapshot());
    }
}
