//! One-time toast notification.

use crate::consts::panel_consts::TOAST_DISPLAY_MS;
use crate::events::{Event, EventSink, EventType};
use crate::logging::LogLevel;
use crate::page::ElementHandle;
use crate::seen::SeenTracker;
use std::time::Duration;

pub struct Toast {
    element: Option<ElementHandle>,
    display_for: Duration,
    events: EventSink,
}

impl Toast {
    pub fn new(element: Option<ElementHandle>, events: EventSink) -> Self {
        Self {
            element,
            display_for: Duration::from_millis(TOAST_DISPLAY_MS),
            events,
        }
    }

    /// Shows the message. Returns false when there is no toast element.
    pub async fn show(&self, message: &str) -> bool {
        let Some(element) = &self.element else {
            return false;
        };
        let dismiss_after_ms = self.display_for.as_millis() as u64;
        element
            .update(|e| {
                e.text = message.to_string();
                e.visible = true;
                e.dismiss_after_ms = Some(dismiss_after_ms);
            })
            .await;
        true
    }

    #[allow(unused)]
    pub async fn hide(&self) {
        if let Some(element) = &self.element {
            element.update(|e| e.visible = false).await;
        }
    }

    /// Shows the toast unless `key` was already seen, then marks it seen.
    ///
    /// The key is marked even without a toast element, so a page that lacks
    /// one doesn't queue the notification for later.
    pub async fn notify_once(&self, tracker: &SeenTracker, key: &str, message: &str) -> bool {
        if tracker.has_seen(key) {
            self.events.emit(Event::toast_with_level(
                format!("{} already seen", key),
                EventType::Skipped,
                LogLevel::Debug,
            ));
            return false;
        }

        let shown = self.show(message).await;
        tracker.mark_seen(key);
        if shown {
            self.events.emit(Event::toast_with_level(
                format!("Showing toast for {}", key),
                EventType::Success,
                LogLevel::Info,
            ));
        }
        shown
    }
}
