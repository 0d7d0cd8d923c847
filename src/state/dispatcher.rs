//! Event dispatcher for the pub-sub between a table and its host

use crate::state::events::TableEvent;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use std::sync::mpsc::Sender;
use tracing::{debug, info, trace, warn};

/// Maximum number of events kept for debugging
const MAX_EVENT_HISTORY: usize = 100;

/// Trait for anything that wants to hear about table changes
pub trait TableEventSink {
    /// Handle an event
    fn on_table_event(&mut self, event: &TableEvent);

    /// Get sink name for debugging
    fn name(&self) -> &str;
}

/// Sink that forwards events to a closure
pub struct CallbackSink<F>
where
    F: FnMut(&TableEvent),
{
    name: String,
    callback: F,
}

impl<F> CallbackSink<F>
where
    F: FnMut(&TableEvent),
{
    pub fn new(name: impl Into<String>, callback: F) -> Self {
        Self {
            name: name.into(),
            callback,
        }
    }
}

impl<F> TableEventSink for CallbackSink<F>
where
    F: FnMut(&TableEvent),
{
    fn on_table_event(&mut self, event: &TableEvent) {
        (self.callback)(event);
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Sink that sends a copy of every event down a channel
pub struct ChannelSink {
    sender: Sender<TableEvent>,
}

impl ChannelSink {
    pub fn new(sender: Sender<TableEvent>) -> Self {
        Self { sender }
    }
}

impl TableEventSink for ChannelSink {
    fn on_table_event(&mut self, event: &TableEvent) {
        if self.sender.send(event.clone()).is_err() {
            warn!(target: "events", "ChannelSink: receiver dropped, '{}' not delivered", event.name());
        }
    }

    fn name(&self) -> &str {
        "ChannelSink"
    }
}

/// Sink that records events in memory. Clones share the same log, so a
/// host can keep one handle and give the other to the dispatcher.
#[derive(Clone, Default)]
pub struct RecordingSink {
    events: Rc<RefCell<Vec<TableEvent>>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<TableEvent> {
        self.events.borrow().clone()
    }

    pub fn last(&self) -> Option<TableEvent> {
        self.events.borrow().last().cloned()
    }

    pub fn len(&self) -> usize {
        self.events.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.borrow().is_empty()
    }

    pub fn clear(&self) {
        self.events.borrow_mut().clear();
    }
}

impl TableEventSink for RecordingSink {
    fn on_table_event(&mut self, event: &TableEvent) {
        self.events.borrow_mut().push(event.clone());
    }

    fn name(&self) -> &str {
        "RecordingSink"
    }
}

/// Delivers table events to every subscribed sink
pub struct EventDispatcher {
    /// List of subscribers
    subscribers: Vec<Box<dyn TableEventSink>>,

    /// Event history for debugging
    event_history: Vec<TableEvent>,

    /// Maximum event history size
    max_history: usize,
}

impl EventDispatcher {
    pub fn new() -> Self {
        Self {
            subscribers: Vec::new(),
            event_history: Vec::new(),
            max_history: MAX_EVENT_HISTORY,
        }
    }

    /// Add a subscriber
    pub fn subscribe(&mut self, sink: Box<dyn TableEventSink>) {
        info!(target: "events", "EventDispatcher: Adding subscriber: {}", sink.name());
        self.subscribers.push(sink);
    }

    /// Convenience for closure subscribers
    pub fn subscribe_fn<F>(&mut self, name: impl Into<String>, callback: F)
    where
        F: FnMut(&TableEvent) + 'static,
    {
        self.subscribe(Box::new(CallbackSink::new(name, callback)));
    }

    /// Dispatch an event to all subscribers
    pub fn dispatch(&mut self, event: TableEvent) {
        debug!(target: "events", "EventDispatcher: Dispatching '{}'", event.name());

        for sink in &mut self.subscribers {
            trace!(target: "events", "EventDispatcher: Notifying subscriber: {}", sink.name());
            sink.on_table_event(&event);
        }

        self.event_history.push(event);
        if self.event_history.len() > self.max_history {
            self.event_history.remove(0);
        }
    }

    /// Get event history for debugging
    pub fn get_event_history(&self) -> &[TableEvent] {
        &self.event_history
    }
}

impl Default for EventDispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for EventDispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventDispatcher")
            .field(
                "subscribers",
                &self.subscribers.iter().map(|s| s.name()).collect::<Vec<_>>(),
            )
            .field("event_history", &self.event_history.len())
            .finish()
    }
}
