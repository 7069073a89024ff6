//! The single, dismissible notification surface.
//!
//! Every user-visible failure (render errors, connection failures, protocol
//! error events) ends up here. Showing a new message replaces the current one.

use std::sync::{Arc, Mutex};

use mermaidai_types::event::SessionEvent;

use crate::event::EventBus;

#[derive(Debug, Clone)]
pub struct NotificationCenter {
    current: Arc<Mutex<Option<String>>>,
    events: EventBus,
}

impl NotificationCenter {
    pub fn new(events: EventBus) -> Self {
        Self {
            current: Arc::new(Mutex::new(None)),
            events,
        }
    }

    pub fn show(&self, message: impl Into<String>) {
        let message = message.into();
        tracing::debug!(%message, "Showing notification");
        *self.current.lock().expect("notification lock poisoned") = Some(message.clone());
        self.events.publish(SessionEvent::Notification { message });
    }

    pub fn dismiss(&self) {
        let previous = self.current.lock().expect("notification lock poisoned").take();
        if previous.is_some() {
            self.events.publish(SessionEvent::NotificationDismissed);
        }
    }

    /// The message currently on display.
    pub fn current(&self) -> Option<String> {
        self.current.lock().expect("notification lock poisoned").clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_show_replaces_and_dismiss_clears() {
        let bus = EventBus::new(8);
        let mut rx = bus.subscribe();
        let center = NotificationCenter::new(bus);

        center.show("first");
        center.show("second");
        assert_eq!(center.current().as_deref(), Some("second"));

        center.dismiss();
        center.dismiss();
        assert_eq!(center.current(), None);

        let mut events = Vec::new();
        while let Ok(event) = rx.try_recv() {
            events.push(event);
        }
        assert_eq!(events.len(), 3);
        assert_eq!(events[2], SessionEvent::NotificationDismissed);
    }
}
