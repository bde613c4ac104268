//! A CPU and I/O scheduling simulation library
//!
//! The simulation runs one server thread per resource. The servers
//! pass process records to each other through two FIFO queues until
//! every process has retired, keeping a simulated clock per resource.
//! The data model lives in the [`scheduler`] crate.

use std::collections::HashSet;
use std::thread;

use log::{debug, info};
use scheduler::{
    Event, EventSink, Job, Pid, ProcessRecord, Report, Resource, ResourceStats, Ticks,
};

mod clock;
mod error;
mod queue;
mod worker;

pub use clock::ResourceClock;
pub use error::SimulationError;

use queue::{Shared, Termination};
use worker::{Worker, WorkerReport};

/// The scheduler simulator.
pub struct Processor<'a, S: EventSink + ?Sized> {
    shared: Shared,
    sink: &'a S,
    processes: usize,
}

impl<'a, S: EventSink + ?Sized> Processor<'a, S> {
    /// Run a simulation to completion.
    ///
    /// * `jobs` - the processes to simulate. They enter the CPU queue in
    ///            this order, all ready at time 0.
    /// * `sink` - receives one event per admission, hand-off and
    ///            retirement. If it fails, the simulation stops and no
    ///            report is produced.
    ///
    /// ## Example
    ///
    /// ```rust
    /// use processor::Processor;
    /// use scheduler::{Job, MemorySink, Pid, Resource};
    ///
    /// let jobs = vec![
    ///     Job::new(Pid::new(1).unwrap(), vec![5]),
    ///     Job::new(Pid::new(2).unwrap(), vec![2]),
    /// ];
    /// let sink = MemorySink::new();
    /// let report = Processor::run(&jobs, &sink).unwrap();
    ///
    /// assert_eq!(report.average_wait(Resource::Cpu), 2.5);
    /// assert_eq!(report.utilization(Resource::Io), None);
    /// ```
    pub fn run(jobs: &[Job], sink: &'a S) -> Result<Report, SimulationError> {
        let records = admit(jobs, sink)?;
        let processor = Processor {
            processes: records.len(),
            shared: Shared::new(records),
            sink,
        };
        processor.simulate()
    }

    fn simulate(self) -> Result<Report, SimulationError> {
        info!("simulating {} processes", self.processes);

        let (cpu, io) = thread::scope(|s| {
            let cpu = s.spawn(|| Worker::new(Resource::Cpu, &self.shared, self.sink).run());
            let io = s.spawn(|| Worker::new(Resource::Io, &self.shared, self.sink).run());
            (cpu.join(), io.join())
        });

        let queues_empty = [Resource::Cpu, Resource::Io]
            .into_iter()
            .all(|resource| self.shared.queue(resource).is_empty());
        match self.shared.into_termination() {
            Termination::Drained => debug_assert!(queues_empty, "drained with queued records"),
            Termination::Failed(error) => return Err(error),
            Termination::Running => {
                unreachable!("servers stopped while the simulation was running")
            }
        }
        let cpu = cpu.map_err(|_| SimulationError::Panicked(Resource::Cpu))?;
        let io = io.map_err(|_| SimulationError::Panicked(Resource::Io))?;

        let report = Report {
            processes: self.processes,
            cpu: resource_stats(&cpu),
            io: resource_stats(&io),
        };
        info!(
            "simulation finished: CPU busy until {}, I/O busy until {}",
            report.cpu.busy_until, report.io.busy_until
        );
        Ok(report)
    }
}

fn resource_stats(worker: &WorkerReport) -> ResourceStats {
    debug!("{} server exited: {:?}", worker.resource, worker.exit);
    worker.clock.stats()
}

/// Validates the jobs, builds their records and logs their admission.
///
/// No clock can run past the sum of all bursts, and no queue wait is
/// longer than that sum, so the sum times the number of bursts bounds
/// every clock field. Workloads past that bound are rejected.
fn admit<S: EventSink + ?Sized>(
    jobs: &[Job],
    sink: &S,
) -> Result<Vec<ProcessRecord>, SimulationError> {
    let mut pids: HashSet<Pid> = HashSet::new();
    let mut records = Vec::with_capacity(jobs.len());
    let mut total: Ticks = 0;
    let mut dispatches: Ticks = 0;

    for job in jobs {
        if job.bursts.is_empty() {
            return Err(SimulationError::EmptyProcess(job.pid));
        }
        if !pids.insert(job.pid) {
            return Err(SimulationError::DuplicatePid(job.pid));
        }
        total = job
            .bursts
            .iter()
            .try_fold(total, |sum, &burst| sum.checked_add(burst))
            .ok_or(SimulationError::ClockOverflow(job.pid))?;
        dispatches = dispatches.saturating_add(job.bursts.len() as Ticks);
        if total.checked_mul(dispatches).is_none() {
            return Err(SimulationError::ClockOverflow(job.pid));
        }
        let record =
            ProcessRecord::new(job).map_err(|_| SimulationError::OutOfMemory(job.pid))?;
        records.push(record);
    }

    for record in &records {
        let event = Event::Admitted {
            pid: record.pid(),
            burst: record.burst(),
        };
        sink.record(&event)
            .map_err(|source| SimulationError::Admission {
                pid: record.pid(),
                source,
            })?;
    }
    Ok(records)
}

/// Format the events of a simulation to a [`String`], grouped by process.
///
/// The two servers log concurrently, so the raw event order changes
/// from run to run. The events of a single process are always in
/// order, which makes this form stable.
///
/// * `events` - the events collected by a sink.
///
/// ## Example
///
/// ```rust
/// use processor::{format_logs, Processor};
/// use scheduler::{Job, MemorySink, Pid};
///
/// let sink = MemorySink::new();
/// Processor::run(&[Job::new(Pid::new(1).unwrap(), vec![3])], &sink).unwrap();
///
/// println!("{}", format_logs(&sink.take()));
/// ```
pub fn format_logs(events: &[Event]) -> String {
    let mut pids: Vec<Pid> = events.iter().map(Event::pid).collect();
    pids.sort();
    pids.dedup();

    let mut s = String::new();
    for pid in pids {
        s.push_str(&format!("===== Process {pid} =====\n"));
        for event in events.iter().filter(|event| event.pid() == pid) {
            s.push_str(&format!("{event}\n\n"));
        }
    }
    s
}
