//! In-memory capture sink
//!
//! Provides a thread-safe ring buffer that records every payload it receives.
//! Used as the stand-in for stderr and syslog in tests, and by embedders who
//! want to inspect recent output without touching the platform logger.

use std::collections::VecDeque;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{DateTime, Utc};

use super::error::SinkError;
use super::level::LogLevel;
use super::sink::Sink;

/// Default number of entries kept by [`MemorySink::new`]
pub const DEFAULT_CAPACITY: usize = 1_000;

/// A single captured payload
#[derive(Debug, Clone)]
pub struct CapturedEntry {
    /// Timestamp when the payload was received
    pub timestamp: DateTime<Utc>,
    /// Level the message was logged at
    pub level: LogLevel,
    /// Payload exactly as the sink received it
    pub payload: String,
}

impl CapturedEntry {
    pub fn new(level: LogLevel, payload: impl Into<String>) -> Self {
        Self {
            timestamp: Utc::now(),
            level,
            payload: payload.into(),
        }
    }
}

/// Thread-safe ring buffer sink
///
/// Clones share the same buffer, so a caller can keep one handle and give
/// another to the logger.
#[derive(Debug, Clone)]
pub struct MemorySink {
    entries: Arc<RwLock<VecDeque<CapturedEntry>>>,
    /// Maximum entries to keep
    capacity: usize,
}

impl MemorySink {
    /// Create a sink keeping the last [`DEFAULT_CAPACITY`] entries
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Create a sink keeping at most `capacity` entries (minimum 1)
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: Arc::new(RwLock::new(VecDeque::with_capacity(capacity))),
            capacity,
        }
    }

    /// Maximum number of entries kept
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    fn read_entries(&self) -> RwLockReadGuard<'_, VecDeque<CapturedEntry>> {
        self.entries.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_entries(&self) -> RwLockWriteGuard<'_, VecDeque<CapturedEntry>> {
        self.entries.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Record an entry, evicting the oldest when full
    pub fn push(&self, entry: CapturedEntry) {
        let mut entries = self.write_entries();
        if entries.len() >= self.capacity {
            entries.pop_front();
        }
        entries.push_back(entry);
    }

    /// All entries, oldest first
    pub fn entries(&self) -> Vec<CapturedEntry> {
        self.read_entries().iter().cloned().collect()
    }

    /// Just the payloads, oldest first
    pub fn payloads(&self) -> Vec<String> {
        self.read_entries()
            .iter()
            .map(|entry| entry.payload.clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.read_entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop everything captured so far
    pub fn clear(&self) {
        self.write_entries().clear();
    }
}

impl Default for MemorySink {
    fn default() -> Self {
        Self::new()
    }
}

impl Sink for MemorySink {
    fn emit(&self, level: LogLevel, payload: &str) -> Result<(), SinkError> {
        self.push(CapturedEntry::new(level, payload));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_sink_push_and_retrieve() {
        let sink = MemorySink::new();

        sink.emit(LogLevel::Info, "I: message 1").unwrap();
        sink.emit(LogLevel::Warning, "W: warning 1").unwrap();
        sink.emit(LogLevel::Error, "E: error 1").unwrap();

        assert_eq!(sink.len(), 3);
        let entries = sink.entries();
        assert_eq!(entries[0].payload, "I: message 1");
        assert_eq!(entries[1].level, LogLevel::Warning);
        assert_eq!(entries[2].payload, "E: error 1");
    }

    #[test]
    fn test_memory_sink_capacity() {
        let sink = MemorySink::with_capacity(3);

        for i in 0..5 {
            sink.emit(LogLevel::Info, &format!("msg {}", i)).unwrap();
        }

        assert_eq!(sink.len(), 3);
        assert_eq!(sink.payloads(), vec!["msg 2", "msg 3", "msg 4"]);
    }

    #[test]
    fn test_memory_sink_zero_capacity_keeps_one() {
        let sink = MemorySink::with_capacity(0);
        sink.emit(LogLevel::Debug, "a").unwrap();
        sink.emit(LogLevel::Debug, "b").unwrap();
        assert_eq!(sink.capacity(), 1);
        assert_eq!(sink.payloads(), vec!["b"]);
    }

    #[test]
    fn test_clones_share_buffer() {
        let sink = MemorySink::new();
        let handle = sink.clone();

        sink.emit(LogLevel::Error, "E: shared").unwrap();
        assert_eq!(handle.payloads(), vec!["E: shared"]);

        handle.clear();
        assert!(sink.is_empty());
    }

    #[test]
    fn test_poisoned_buffer_still_records() {
        let sink = MemorySink::new();
        sink.emit(LogLevel::Info, "I: before").unwrap();

        let entries = Arc::clone(&sink.entries);
        let result = std::thread::spawn(move || {
            let _guard = entries.write().unwrap();
            panic!("poison the buffer lock");
        })
        .join();
        assert!(result.is_err());
        assert!(sink.entries.is_poisoned());

        sink.emit(LogLevel::Error, "E: after").unwrap();
        assert_eq!(sink.len(), 2);
        assert_eq!(sink.payloads(), vec!["I: before", "E: after"]);

        sink.clear();
        assert!(sink.is_empty());
    }
}
