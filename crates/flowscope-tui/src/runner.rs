//! Main event loop
//!
//! Terminal events, tick timers, and retrieval completions all fold
//! through the single `update()` function; retrieval actions spawn tasks
//! that post their completions back on one channel. Rendering happens once
//! per loop iteration from the resulting state.

use tokio::sync::mpsc;

use flowscope_app::{handler, process, AppState, Message, NavParams, Settings};
use flowscope_client::ApiClient;
use flowscope_core::prelude::*;

use crate::{event, render, terminal};

/// Run the TUI until the user quits.
pub async fn run(settings: Settings, initial: NavParams) -> Result<()> {
    let tick_config = settings.tick_config()?;
    let client = ApiClient::new(&settings.server.base_url)?;
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut state = AppState::new(tick_config, initial);

    terminal::install_panic_hook();
    let mut term = ratatui::init();
    info!("terminal UI started");

    // Seed the first render cycle: both controllers derive their initial
    // fetches from the injected navigation state.
    dispatch(&mut state, Message::NavChanged, &client, &tx);

    while !state.should_quit() {
        term.draw(|frame| render::view(frame, &mut state))?;

        // Drain retrieval completions that arrived since the last frame.
        while let Ok(message) = rx.try_recv() {
            dispatch(&mut state, message, &client, &tx);
        }

        // One terminal event, or a tick on timeout.
        if let Some(message) = event::poll()? {
            dispatch(&mut state, message, &client, &tx);
        }
    }

    ratatui::restore();
    info!("terminal UI stopped");
    Ok(())
}

/// Feed one message (and its follow-ups) through update, executing the
/// produced retrieval actions.
fn dispatch(
    state: &mut AppState,
    message: Message,
    client: &ApiClient,
    tx: &mpsc::UnboundedSender<Message>,
) {
    let mut next = Some(message);
    while let Some(message) = next.take() {
        let result = handler::update(state, message);
        for action in result.actions {
            process::handle_action(action, client, tx);
        }
        next = result.message;
    }
}
