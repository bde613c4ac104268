use std::fmt::Display;
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use crate::Event;

/// The error returned when a sink cannot accept an event.
#[derive(Debug)]
pub struct SinkError {
    destination: String,
    source: io::Error,
}

impl SinkError {
    pub fn new(destination: impl Into<String>, source: io::Error) -> SinkError {
        SinkError {
            destination: destination.into(),
            source,
        }
    }

    /// A description of where the event was going.
    pub fn destination(&self) -> &str {
        &self.destination
    }
}

impl Display for SinkError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "cannot write to {}: {}", self.destination, self.source)
    }
}

impl std::error::Error for SinkError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.source)
    }
}

/// The trait that any progress log has to implement.
///
/// Both resource workers share one sink, so it is called
/// concurrently.
pub trait EventSink: Send + Sync {
    /// Records one event.
    ///
    /// An error stops the whole simulation.
    fn record(&self, event: &Event) -> Result<(), SinkError>;
}

impl<S: EventSink + ?Sized> EventSink for &S {
    fn record(&self, event: &Event) -> Result<(), SinkError> {
        (**self).record(event)
    }
}

/// A sink that keeps every event in memory, in arrival order.
#[derive(Debug, Default)]
pub struct MemorySink {
    events: Mutex<Vec<Event>>,
}

impl MemorySink {
    pub fn new() -> MemorySink {
        MemorySink::default()
    }

    /// Returns the collected events, leaving the sink empty.
    pub fn take(&self) -> Vec<Event> {
        let mut events = self.events.lock().unwrap_or_else(PoisonError::into_inner);
        std::mem::take(&mut *events)
    }
}

impl EventSink for MemorySink {
    fn record(&self, event: &Event) -> Result<(), SinkError> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(*event);
        Ok(())
    }
}

/// A sink that appends events to two text logs.
///
/// Admissions and hand-offs go to the progress log, terminations to
/// the summary log. Each event opens its log in append mode, so a log
/// that becomes unavailable mid-run fails the next event.
#[derive(Debug)]
pub struct FileSink {
    progress: PathBuf,
    summary: PathBuf,
    lock: Mutex<()>,
}

impl FileSink {
    pub fn new(progress: impl Into<PathBuf>, summary: impl Into<PathBuf>) -> FileSink {
        FileSink {
            progress: progress.into(),
            summary: summary.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn progress_path(&self) -> &Path {
        &self.progress
    }

    pub fn summary_path(&self) -> &Path {
        &self.summary
    }

    /// Appends a block of text to the summary log.
    pub fn append_summary(&self, text: &str) -> Result<(), SinkError> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        append(&self.summary, text)
    }
}

impl EventSink for FileSink {
    fn record(&self, event: &Event) -> Result<(), SinkError> {
        let path = if event.is_terminal() {
            &self.summary
        } else {
            &self.progress
        };
        // Blocks from the two workers must not interleave.
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        append(path, &format!("{event}\n\n"))
    }
}

fn append(path: &Path, text: &str) -> Result<(), SinkError> {
    let error = |source| SinkError::new(path.display().to_string(), source);
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(error)?;
    file.write_all(text.as_bytes()).map_err(error)
}
