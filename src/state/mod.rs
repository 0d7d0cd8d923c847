//! Change notifications
//!
//! The table engine reports every state change as a [`events::TableEvent`]
//! and hands it to the [`dispatcher::EventDispatcher`], which fans it out to
//! whatever the host subscribed (a UI binding, a channel, a test recorder).

pub mod dispatcher;
pub mod events;
