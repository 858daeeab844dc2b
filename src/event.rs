use std::pin::Pin;
use std::task::{Context, Poll};

use crossterm::event::{Event as CrosstermEvent, EventStream, KeyEvent, KeyEventKind};
use futures::{Stream, StreamExt};

#[derive(Clone, Debug)]
pub enum Event {
    Key(KeyEvent),
    Resize,
}

/// Terminal input as a stream of the events the scheduler cares about.
///
/// Polled directly from the scheduler's select loop, so key handling shares the
/// render context instead of running on a worker of its own. Key releases and
/// repeats are dropped; the stream ends when the terminal reader fails.
pub struct EventHandler {
    reader: EventStream,
}

impl Default for EventHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl EventHandler {
    pub fn new() -> Self {
        Self {
            reader: EventStream::new(),
        }
    }
}

impl Stream for EventHandler {
    type Item = Event;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Event>> {
        loop {
            match self.reader.poll_next_unpin(cx) {
                Poll::Ready(Some(Ok(evt))) => {
                    if let Some(mapped) = map_event(evt) {
                        return Poll::Ready(Some(mapped));
                    }
                }
                Poll::Ready(Some(Err(_))) | Poll::Ready(None) => return Poll::Ready(None),
                Poll::Pending => return Poll::Pending,
            }
        }
    }
}

fn map_event(evt: CrosstermEvent) -> Option<Event> {
    match evt {
        CrosstermEvent::Key(key) if key.kind == KeyEventKind::Press => Some(Event::Key(key)),
        CrosstermEvent::Resize(_, _) => Some(Event::Resize),
        _ => None,
    }
}
