use std::time::Duration;

use crossterm::event::{Event as CrosstermEvent, EventStream, KeyEvent, KeyEventKind};
use futures::StreamExt;
use tokio::sync::mpsc::{self, UnboundedSender};
use tokio::time::MissedTickBehavior;

#[derive(Clone, Debug)]
pub enum Event {
    Key(KeyEvent),
    /// Time to take a new sample.
    Sample,
    Resize,
}

/// Merges key presses and the sampling timer into one stream for the
/// render loop.
pub struct EventHandler {
    rx: mpsc::UnboundedReceiver<Event>,
    _task: tokio::task::JoinHandle<()>,
}

impl EventHandler {
    pub fn new(sample_interval: Duration) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let task = tokio::spawn(pump(tx, sample_interval));
        Self { rx, _task: task }
    }

    pub async fn next(&mut self) -> Option<Event> {
        self.rx.recv().await
    }
}

async fn pump(tx: UnboundedSender<Event>, sample_interval: Duration) {
    let mut input = EventStream::new();
    let mut timer = tokio::time::interval(sample_interval);
    // A stalled loop should take one sample when it resumes, not a burst.
    timer.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        let event = tokio::select! {
            input_event = input.next() => match input_event {
                Some(Ok(raw)) => translate(raw),
                Some(Err(_)) | None => return,
            },
            _ = timer.tick() => Some(Event::Sample),
        };
        if let Some(event) = event
            && tx.send(event).is_err()
        {
            return;
        }
    }
}

/// Key releases and repeats are dropped, as are mouse and focus events.
fn translate(raw: CrosstermEvent) -> Option<Event> {
    match raw {
        CrosstermEvent::Key(key) if key.kind == KeyEventKind::Press => Some(Event::Key(key)),
        CrosstermEvent::Resize(_, _) => Some(Event::Resize),
        _ => None,
    }
}
