use std::thread;

use log::{debug, trace};
use scheduler::{Event, EventSink, ProcessRecord, Resource};

use crate::clock::ResourceClock;
use crate::queue::{Exit, Shared};
use crate::SimulationError;

/// What a server hands back to the coordinator when it stops.
#[derive(Debug)]
pub(crate) struct WorkerReport {
    pub resource: Resource,
    pub exit: Exit,
    pub clock: ResourceClock,
}

/// The server of one resource.
///
/// The CPU and the I/O servers run the same loop: take the head of
/// their own queue, run its burst on their own clock, then hand the
/// process to the other queue or retire it.
pub(crate) struct Worker<'a, S: EventSink + ?Sized> {
    resource: Resource,
    shared: &'a Shared,
    sink: &'a S,
    clock: ResourceClock,
}

impl<'a, S: EventSink + ?Sized> Worker<'a, S> {
    pub fn new(resource: Resource, shared: &'a Shared, sink: &'a S) -> Worker<'a, S> {
        Worker {
            resource,
            shared,
            sink,
            clock: ResourceClock::new(),
        }
    }

    /// Serves the queue until the simulation drains or fails.
    pub fn run(mut self) -> WorkerReport {
        let _guard = FailOnPanic {
            shared: self.shared,
            resource: self.resource,
        };
        let shared = self.shared;
        let queue = shared.queue(self.resource);

        let exit = loop {
            let record = match queue.pop_blocking() {
                Ok(record) => record,
                Err(exit) => break exit,
            };
            if let Err(error) = self.execute(record) {
                self.shared.fail(error);
                break Exit::Failed;
            }
        };

        debug!(
            "{} server stopped ({exit:?}) at {}",
            self.resource,
            self.clock.busy_until()
        );
        WorkerReport {
            resource: self.resource,
            exit,
            clock: self.clock,
        }
    }

    /// Runs the current burst of `record` and routes it.
    ///
    /// On a sink error the record is dropped and the error returned.
    fn execute(&mut self, mut record: ProcessRecord) -> Result<(), SimulationError> {
        debug_assert!(!record.is_empty());
        debug_assert_eq!(record.resource(), self.resource);
        let pid = record.pid();
        let ready_time = record.ready_time();
        let burst = record.burst();

        let wait = self.clock.admit(ready_time);
        let finished = self.clock.execute(burst);
        trace!(
            "{}: process {pid} ready at {ready_time}, waited {wait}, ran {burst}, done at {finished}",
            self.resource
        );

        match record.advance(finished) {
            Some(destination) => {
                self.log(&Event::Progress {
                    pid,
                    from: self.resource,
                    cursor: record.cursor(),
                    destination,
                    arrival: record.ready_time(),
                    burst: record.burst(),
                })?;
                self.shared.queue(destination).push(record);
            }
            None => {
                self.log(&Event::Terminated {
                    pid,
                    resource: self.resource,
                    cursor: record.cursor(),
                    arrival: record.ready_time(),
                    burst: record.burst(),
                    finished,
                })?;
                drop(record);
                trace!("{}: process {pid} retired", self.resource);
                self.shared.retire(self.resource);
            }
        }
        Ok(())
    }

    fn log(&self, event: &Event) -> Result<(), SimulationError> {
        self.sink
            .record(event)
            .map_err(|source| SimulationError::Sink {
                resource: self.resource,
                pid: event.pid(),
                source,
            })
    }
}

/// Fails the simulation if the server unwinds, so the other server
/// does not wait forever.
struct FailOnPanic<'a> {
    shared: &'a Shared,
    resource: Resource,
}

impl Drop for FailOnPanic<'_> {
    fn drop(&mut self) {
        if thread::panicking() {
            self.shared.fail(SimulationError::Panicked(self.resource));
        }
    }
}
