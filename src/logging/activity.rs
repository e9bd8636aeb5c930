//! Activity log: fire-and-forget workflow events and elapsed-time timers
//!
//! The orchestrator reports `started`/`completed`/`failed` events and polling
//! timers through [`ActivityLog`]. Implementations must never fail the
//! workflow; they swallow their own errors.

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

/// Sink for workflow activity events
pub trait ActivityLog: Send + Sync {
    /// Records a single event
    fn log(&self, category: &str, event: &str, detail: Option<&str>);

    /// Starts a timer; the elapsed time is recorded when it is ended
    fn timer(&self, category: &str, event: &str) -> Box<dyn ActivityTimer>;
}

/// Running timer handle
pub trait ActivityTimer: Send {
    /// Stops the timer and records the elapsed duration
    fn end(self: Box<Self>);
}

/// Activity log that emits `tracing` events
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingActivityLog;

impl ActivityLog for TracingActivityLog {
    fn log(&self, category: &str, event: &str, detail: Option<&str>) {
        match detail {
            Some(detail) => tracing::info!(category, event, detail, "Activity"),
            None => tracing::info!(category, event, "Activity"),
        }
    }

    fn timer(&self, category: &str, event: &str) -> Box<dyn ActivityTimer> {
        Box::new(TracingTimer {
            category: category.to_string(),
            event: event.to_string(),
            started: Instant::now(),
        })
    }
}

struct TracingTimer {
    category: String,
    event: String,
    started: Instant,
}

impl ActivityTimer for TracingTimer {
    fn end(self: Box<Self>) {
        tracing::info!(
            category = %self.category,
            event = %self.event,
            duration_ms = self.started.elapsed().as_millis() as u64,
            "Activity timer"
        );
    }
}

/// One entry captured by [`RecordingActivityLog`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActivityRecord {
    Event {
        category: String,
        event: String,
        detail: Option<String>,
    },
    Timer {
        category: String,
        event: String,
        elapsed: Duration,
    },
}

/// Activity log that keeps every record in memory
///
/// Used by tests to assert on the event trail.
#[derive(Debug, Clone, Default)]
pub struct RecordingActivityLog {
    records: Arc<Mutex<Vec<ActivityRecord>>>,
}

impl RecordingActivityLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything recorded so far
    pub fn records(&self) -> Vec<ActivityRecord> {
        self.records
            .lock()
            .map(|records| records.clone())
            .unwrap_or_default()
    }

    /// Names of the recorded events, in order
    pub fn event_names(&self) -> Vec<String> {
        self.records()
            .into_iter()
            .filter_map(|record| match record {
                ActivityRecord::Event { event, .. } => Some(event),
                ActivityRecord::Timer { .. } => None,
            })
            .collect()
    }

    /// Names of the ended timers, in order
    pub fn timer_names(&self) -> Vec<String> {
        self.records()
            .into_iter()
            .filter_map(|record| match record {
                ActivityRecord::Timer { event, .. } => Some(event),
                ActivityRecord::Event { .. } => None,
            })
            .collect()
    }

    fn push(&self, record: ActivityRecord) {
        // A poisoned lock only loses the record
        if let Ok(mut records) = self.records.lock() {
            records.push(record);
        }
    }
}

impl ActivityLog for RecordingActivityLog {
    fn log(&self, category: &str, event: &str, detail: Option<&str>) {
        self.push(ActivityRecord::Event {
            category: category.to_string(),
            event: event.to_string(),
            detail: detail.map(str::to_string),
        });
    }

    fn timer(&self, category: &str, event: &str) -> Box<dyn ActivityTimer> {
        Box::new(RecordingTimer {
            log: self.clone(),
            category: category.to_string(),
            event: event.to_string(),
            started: Instant::now(),
        })
    }
}

struct RecordingTimer {
    log: RecordingActivityLog,
    category: String,
    event: String,
    started: Instant,
}

impl ActivityTimer for RecordingTimer {
    fn end(self: Box<Self>) {
        let elapsed = self.started.elapsed();
        self.log.push(ActivityRecord::Timer {
            category: self.category,
            event: self.event,
            elapsed,
        });
    }
}
