//! Event System
//!
//! Diagnostic events emitted while loading, rendering and notifying. Events are
//! write-only: they are printed to stderr and never affect the outcome.

use crate::logging::{LogLevel, should_log_with_env};
use chrono::Local;
use std::fmt::Display;
use tokio::sync::mpsc;

#[derive(Debug, Copy, Clone, Eq, PartialEq, strum::Display)]
pub enum Stage {
    /// Feed acquisition across the source chain.
    Loader,
    /// Panel rendering and visibility changes.
    Renderer,
    /// Seen flag and toast display.
    Toast,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, strum::Display)]
pub enum EventType {
    Starting,
    Success,
    Error,
    Skipped,
    StateChange,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    pub stage: Stage,
    pub msg: String,
    pub timestamp: String,
    pub event_type: EventType,
    pub log_level: LogLevel,
}

impl Event {
    pub fn new(stage: Stage, msg: String, event_type: EventType, log_level: LogLevel) -> Self {
        Self {
            stage,
            msg,
            timestamp: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            event_type,
            log_level,
        }
    }

    pub fn loader_with_level(msg: String, event_type: EventType, log_level: LogLevel) -> Self {
        Self::new(Stage::Loader, msg, event_type, log_level)
    }

    pub fn renderer_with_level(msg: String, event_type: EventType, log_level: LogLevel) -> Self {
        Self::new(Stage::Renderer, msg, event_type, log_level)
    }

    pub fn toast_with_level(msg: String, event_type: EventType, log_level: LogLevel) -> Self {
        Self::new(Stage::Toast, msg, event_type, log_level)
    }

    pub fn should_display(&self) -> bool {
        should_log_with_env(self.log_level)
    }
}

impl Display for Event {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} [{}] {}: {}",
            self.event_type, self.timestamp, self.stage, self.msg
        )
    }
}

/// Cloneable sender for diagnostic events.
///
/// Sending never blocks and never fails the caller: a full or closed channel
/// drops the event. Without a channel, events only reach the `log` facade.
#[derive(Debug, Clone, Default)]
pub struct EventSink {
    sender: Option<mpsc::Sender<Event>>,
}

impl EventSink {
    pub fn new(sender: mpsc::Sender<Event>) -> Self {
        Self {
            sender: Some(sender),
        }
    }

    /// A sink that only forwards to the `log` facade.
    pub fn disabled() -> Self {
        Self::default()
    }

    pub fn emit(&self, event: Event) {
        log::log!(
            target: "updates_panel",
            log::Level::from(event.log_level),
            "{}: {}",
            event.stage,
            event.msg
        );
        if let Some(sender) = &self.sender {
            let _ = sender.try_send(event);
        }
    }
}

/// Prints displayable events to stderr until every sender is dropped.
pub async fn print_events(mut receiver: mpsc::Receiver<Event>) {
    while let Some(event) = receiver.recv().await {
        if event.should_display() {
            eprintln!("{}", event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_stage_and_type() {
        let event = Event::loader_with_level(
            "loaded from /api/updates".to_string(),
            EventType::Success,
            LogLevel::Info,
        );
        let line = event.to_string();
        assert!(line.starts_with("Success ["));
        assert!(line.ends_with("Loader: loaded from /api/updates"));
    }

    #[tokio::test]
    async fn test_sink_delivers_events_in_order() {
        let (sender, mut receiver) = mpsc::channel(4);
        let sink = EventSink::new(sender);

        sink.emit(Event::toast_with_level(
            "first".to_string(),
            EventType::Success,
            LogLevel::Info,
        ));
        sink.emit(Event::renderer_with_level(
            "second".to_string(),
            EventType::StateChange,
            LogLevel::Debug,
        ));

        assert_eq!(receiver.recv().await.unwrap().msg, "first");
        let second = receiver.recv().await.unwrap();
        assert_eq!(second.msg, "second");
        assert_eq!(second.stage, Stage::Renderer);
    }

    #[test]
    fn test_full_channel_drops_without_blocking() {
        let (sender, mut receiver) = mpsc::channel(1);
        let sink = EventSink::new(sender);

        for i in 0..3 {
            sink.emit(Event::loader_with_level(
                format!("attempt {}", i),
                EventType::Skipped,
                LogLevel::Debug,
            ));
        }

        assert_eq!(receiver.try_recv().unwrap().msg, "attempt 0");
        assert!(receiver.try_recv().is_err());
    }

    #[test]
    fn test_disabled_sink_is_noop() {
        EventSink::disabled().emit(Event::loader_with_level(
            "nowhere".to_string(),
            EventType::Error,
            LogLevel::Warn,
        ));
    }
}
