//! A scheduler simulation library.
//!
//! This library provides the data model shared by the CPU and I/O
//! servers of the `processor` crate: process records, progress events
//! and the sinks that receive them, the final statistics, and the
//! readers for job descriptions.
//!

mod event;
pub mod job;
mod process;
mod report;
mod sink;

pub use crate::event::Event;
pub use crate::job::JobError;
pub use crate::process::{Job, Pid, ProcessRecord, Resource, Ticks};
pub use crate::report::{Report, ResourceStats};
pub use crate::sink::{EventSink, FileSink, MemorySink, SinkError};
