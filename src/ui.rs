//! Terminal front end
//!
//! One task multiplexes keyboard input, widget events, hero terminal replies
//! and a redraw tick. The widget runtime itself lives on its own task and is
//! only reached through the [`WidgetHandle`].

mod app;
mod render;

use app::{App, UiCommand};

use crate::runtime::{RuntimeError, WidgetHandle};
use crate::terminal::{ReplyAction, ReplyRules, Terminal};
use crossterm::event::{Event as TermEvent, EventStream};
use futures::StreamExt;
use rand::rngs::StdRng;
use ratatui::DefaultTerminal;
use std::io;
use std::time::Duration;
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::mpsc;
use tokio::time::Instant;

const TICK: Duration = Duration::from_millis(100);

/// Run the interface until the user quits, then unmount the widget
pub async fn run(handle: &WidgetHandle, rng: StdRng) -> io::Result<()> {
    // Subscribe before the snapshot so nothing falls in between
    let events = handle.subscribe();
    let snapshot = handle.snapshot().await.map_err(io::Error::other)?;
    let app = App::new(
        Terminal::new(ReplyRules::hero_defaults()),
        handle.questions().to_vec(),
        snapshot,
        rng,
    );

    let mut screen = ratatui::try_init()?;
    let result = event_loop(&mut screen, app, handle, events).await;
    ratatui::restore();

    handle.unmount();
    tracing::info!("Widget unmounted");
    result
}

async fn event_loop(
    screen: &mut DefaultTerminal,
    mut app: App,
    handle: &WidgetHandle,
    mut events: tokio::sync::broadcast::Receiver<crate::runtime::WidgetEvent>,
) -> io::Result<()> {
    let started = Instant::now();
    let mut ticker = tokio::time::interval(TICK);
    let mut keys = EventStream::new();
    let (reply_tx, mut reply_rx) = mpsc::channel::<ReplyAction>(16);

    loop {
        screen.draw(|frame| render::draw(frame, &app))?;

        tokio::select! {
            _ = ticker.tick() => app.tick(started.elapsed()),

            key = keys.next() => match key {
                Some(Ok(TermEvent::Key(key))) => {
                    if let Some(command) = app.handle_key(key) {
                        if !dispatch(handle, &reply_tx, command)
                            .await
                            .map_err(io::Error::other)?
                        {
                            return Ok(());
                        }
                    }
                }
                Some(Ok(_)) => {}
                Some(Err(e)) => return Err(e),
                None => return Ok(()),
            },

            received = events.recv() => match received {
                Ok(event) => app.apply_widget_event(event),
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "Widget events lagged, reloading snapshot");
                    let snapshot = handle.snapshot().await.map_err(io::Error::other)?;
                    app.load_snapshot(snapshot);
                }
                Err(RecvError::Closed) => return Ok(()),
            },

            Some(action) = reply_rx.recv() => app.apply_terminal_reply(action),
        }
    }
}

/// Carry out a key binding; `false` means quit
async fn dispatch(
    handle: &WidgetHandle,
    reply_tx: &mpsc::Sender<ReplyAction>,
    command: UiCommand,
) -> Result<bool, RuntimeError> {
    match command {
        UiCommand::Quit => return Ok(false),
        UiCommand::Edit(edit) => handle.edit_draft(edit).await?,
        UiCommand::ClearDraft => handle.set_draft(String::new()).await?,
        UiCommand::SubmitOrAsk(index) => handle.submit_or_ask(index).await?,
        UiCommand::Reset => handle.reset().await?,
        UiCommand::Minimize => handle.minimize().await?,
        UiCommand::ToggleMaximize => handle.toggle_maximize().await?,
        UiCommand::Close => handle.close().await?,
        UiCommand::ScheduleReply(pending) => {
            let reply_tx = reply_tx.clone();
            tokio::spawn(async move {
                tokio::time::sleep(pending.delay).await;
                let _ = reply_tx.send(pending.action).await;
            });
        }
    }
    Ok(true)
}
