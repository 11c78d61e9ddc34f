//! Seen tracking
//!
//! Remembers whether the notification for a given version key was already
//! shown. Storage errors never escape: an unreadable store counts as "not
//! seen" and a failed write is reported and dropped. Marking a key seen over a
//! corrupt state file replaces the file so the toast cannot repeat forever.

use crate::events::{Event, EventSink, EventType};
use crate::logging::LogLevel;
use crate::state::PanelState;
use std::collections::HashMap;
use std::io;
use std::path::PathBuf;
use std::sync::RwLock;

#[cfg(test)]
use mockall::automock;

/// Durable key-value storage for seen flags.
#[cfg_attr(test, automock)]
pub trait SeenStore: Send + Sync {
    fn get(&self, key: &str) -> io::Result<bool>;
    fn set(&self, key: &str, seen: bool) -> io::Result<()>;
}

/// Seen flags kept in the shared state file.
pub struct FileSeenStore {
    path: PathBuf,
    events: EventSink,
}

impl FileSeenStore {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            events: EventSink::disabled(),
        }
    }

    pub fn with_events(mut self, events: EventSink) -> Self {
        self.events = events;
        self
    }

    /// State to mark a key against. An unparseable file is dropped in favour of
    /// the default state; clearing a key never replaces the file.
    fn state_for_write(&self, seen: bool) -> io::Result<PanelState> {
        match PanelState::load_or_default(&self.path) {
            Err(e) if seen && e.kind() == io::ErrorKind::InvalidData => {
                self.events.emit(Event::toast_with_level(
                    format!("Replacing corrupt state {}: {}", self.path.display(), e),
                    EventType::Error,
                    LogLevel::Warn,
                ));
                Ok(PanelState::default())
            }
            other => other,
        }
    }
}

impl SeenStore for FileSeenStore {
    fn get(&self, key: &str) -> io::Result<bool> {
        let state = PanelState::load_or_default(&self.path)?;
        Ok(state.seen.get(key).copied().unwrap_or(false))
    }

    fn set(&self, key: &str, seen: bool) -> io::Result<()> {
        let mut state = self.state_for_write(seen)?;
        if seen {
            state.seen.insert(key.to_string(), true);
        } else {
            state.seen.remove(key);
        }
        state.save(&self.path)
    }
}

/// Process-local store; nothing outlives the invocation.
#[derive(Default)]
pub struct MemorySeenStore {
    flags: RwLock<HashMap<String, bool>>,
}

impl MemorySeenStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SeenStore for MemorySeenStore {
    fn get(&self, key: &str) -> io::Result<bool> {
        let flags = self
            .flags
            .read()
            .map_err(|_| io::Error::other("seen flags lock poisoned"))?;
        Ok(flags.get(key).copied().unwrap_or(false))
    }

    fn set(&self, key: &str, seen: bool) -> io::Result<()> {
        let mut flags = self
            .flags
            .write()
            .map_err(|_| io::Error::other("seen flags lock poisoned"))?;
        flags.insert(key.to_string(), seen);
        Ok(())
    }
}

pub struct SeenTracker {
    store: Box<dyn SeenStore>,
    events: EventSink,
}

impl SeenTracker {
    pub fn new(store: Box<dyn SeenStore>, events: EventSink) -> Self {
        Self { store, events }
    }

    pub fn has_seen(&self, key: &str) -> bool {
        match self.store.get(key) {
            Ok(seen) => seen,
            Err(e) => {
                self.report(format!("Could not read seen flag {}: {}", key, e));
                false
            }
        }
    }

    pub fn mark_seen(&self, key: &str) {
        if let Err(e) = self.store.set(key, true) {
            self.report(format!("Could not persist seen flag {}: {}", key, e));
        }
    }

    /// Clears the flag so the next load shows the toast again.
    ///
    /// Unlike marking, a failed clear is returned to the caller.
    pub fn reset(&self, key: &str) -> io::Result<()> {
        self.store.set(key, false)
    }

    fn report(&self, msg: String) {
        self.events
            .emit(Event::toast_with_level(msg, EventType::Error, LogLevel::Warn));
    }
}
