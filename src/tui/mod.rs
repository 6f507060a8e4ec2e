pub mod render;
pub mod state;

use std::io::stdout;
use std::time::Duration;

use anyhow::Result;
use crossterm::{
    event::{Event, EventStream, KeyCode, KeyEventKind},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use futures_util::StreamExt;
use ratatui::prelude::*;
use tokio::sync::{mpsc, watch};

use hostelbite::engine::{ListingSnapshot, MealFilter};
use state::{BrowseUi, PRICE_STEP};

/// Commands the browser sends back to the listing task.
#[derive(Debug, Clone)]
pub enum BrowseCommand {
    Filter(MealFilter),
    NextPage,
    Retry,
    Refresh,
    Quit,
}

/// Run the browser. Reads listing snapshots from `state_rx`, sends commands
/// on `cmd_tx`.
pub async fn run_tui(
    state_rx: watch::Receiver<ListingSnapshot>,
    cmd_tx: mpsc::Sender<BrowseCommand>,
    scroll_prefetch: usize,
    offline: bool,
) -> Result<()> {
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;

    let result = browse_loop(&mut terminal, state_rx, cmd_tx, scroll_prefetch, offline).await;

    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;

    result
}

async fn browse_loop(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    mut state_rx: watch::Receiver<ListingSnapshot>,
    cmd_tx: mpsc::Sender<BrowseCommand>,
    scroll_prefetch: usize,
    offline: bool,
) -> Result<()> {
    let mut ui = BrowseUi::new(state_rx.borrow().clone(), offline);
    let mut events = EventStream::new();
    let mut spinner_frame: u8 = 0;
    let mut ticker = tokio::time::interval(Duration::from_millis(120));

    loop {
        terminal.draw(|f| render::draw(f, &ui, spinner_frame))?;

        tokio::select! {
            maybe_event = events.next() => {
                match maybe_event {
                    Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => {
                        if handle_key(key.code, &mut ui, &cmd_tx, scroll_prefetch).await {
                            return Ok(());
                        }
                    }
                    // Resize and the rest redraw on the next pass.
                    Some(Ok(_)) => {}
                    Some(Err(e)) => return Err(e.into()),
                    None => return Ok(()),
                }
            }
            changed = state_rx.changed() => {
                // Listing task gone means nothing further to show.
                if changed.is_err() {
                    return Ok(());
                }
                ui.apply_snapshot(state_rx.borrow_and_update().clone());
            }
            _ = ticker.tick() => {
                if ui.snapshot.loading {
                    spinner_frame = spinner_frame.wrapping_add(1);
                }
            }
        }
    }
}

/// Apply one keypress. Returns true when the app should exit.
async fn handle_key(
    code: KeyCode,
    ui: &mut BrowseUi,
    cmd_tx: &mpsc::Sender<BrowseCommand>,
    scroll_prefetch: usize,
) -> bool {
    if ui.show_detail {
        match code {
            KeyCode::Esc | KeyCode::Enter | KeyCode::Backspace => ui.show_detail = false,
            KeyCode::Char('q') => {
                let _ = cmd_tx.send(BrowseCommand::Quit).await;
                return true;
            }
            _ => {}
        }
        return false;
    }

    if ui.search_mode {
        let mut filter_changed = false;
        match code {
            KeyCode::Esc | KeyCode::Enter => ui.search_mode = false,
            KeyCode::Backspace => {
                ui.pop_search();
                filter_changed = true;
            }
            KeyCode::Char(ch) => {
                ui.push_search(ch);
                filter_changed = true;
            }
            _ => {}
        }
        if filter_changed {
            let _ = cmd_tx.send(BrowseCommand::Filter(ui.filter())).await;
        }
        return false;
    }

    let mut filter_changed = false;
    match code {
        KeyCode::Char('q') => {
            let _ = cmd_tx.send(BrowseCommand::Quit).await;
            return true;
        }
        KeyCode::Char('/') => ui.search_mode = true,
        KeyCode::Char('c') => {
            ui.cycle_category();
            filter_changed = true;
        }
        KeyCode::Char('s') => {
            ui.cycle_sort();
            filter_changed = true;
        }
        KeyCode::Char('[') => {
            ui.adjust_min(-PRICE_STEP);
            filter_changed = true;
        }
        KeyCode::Char(']') => {
            ui.adjust_min(PRICE_STEP);
            filter_changed = true;
        }
        KeyCode::Char('{') => {
            ui.adjust_max(-PRICE_STEP);
            filter_changed = true;
        }
        KeyCode::Char('}') => {
            ui.adjust_max(PRICE_STEP);
            filter_changed = true;
        }
        KeyCode::Down | KeyCode::Char('j') => {
            ui.select_next();
            maybe_request_more(ui, cmd_tx, scroll_prefetch).await;
        }
        KeyCode::Up | KeyCode::Char('k') => ui.select_prev(),
        KeyCode::Home => ui.select_top(),
        KeyCode::End => {
            ui.select_bottom();
            maybe_request_more(ui, cmd_tx, scroll_prefetch).await;
        }
        KeyCode::Enter => {
            if ui.selected_meal().is_some() {
                ui.show_detail = true;
            }
        }
        KeyCode::Char('r') => {
            let _ = cmd_tx.send(BrowseCommand::Retry).await;
        }
        KeyCode::Char('g') => {
            let _ = cmd_tx.send(BrowseCommand::Refresh).await;
        }
        _ => {}
    }
    if filter_changed {
        let _ = cmd_tx.send(BrowseCommand::Filter(ui.filter())).await;
    }
    false
}

/// Infinite-scroll trigger: once the selection nears the bottom and the
/// listing says there is more, ask for the next page. The listing task
/// coalesces repeats, so firing this on every scroll step is safe.
async fn maybe_request_more(
    ui: &BrowseUi,
    cmd_tx: &mpsc::Sender<BrowseCommand>,
    scroll_prefetch: usize,
) {
    if ui.near_end(scroll_prefetch) && ui.snapshot.has_more && !ui.snapshot.loading {
        let _ = cmd_tx.send(BrowseCommand::NextPage).await;
    }
}
