use std::collections::TryReserveError;
use std::fmt::{self, Display};
use std::num::NonZeroUsize;

/// Simulated time, in ticks.
pub type Ticks = u64;

/// The PID of a process
///
/// The PID cannot be 0, PIDs start from 1.
#[derive(PartialEq, Eq, Copy, Clone, Hash, Ord, PartialOrd)]
#[repr(transparent)]
pub struct Pid(NonZeroUsize);

impl Pid {
    /// Returns [`None`] for 0.
    pub fn new(pid: usize) -> Option<Pid> {
        NonZeroUsize::new(pid).map(Pid)
    }

    pub fn get(self) -> usize {
        self.0.get()
    }
}

impl PartialEq<usize> for Pid {
    fn eq(&self, other: &usize) -> bool {
        self.0.get() == *other
    }
}

impl Display for Pid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for Pid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The two resources a process alternates between.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Resource {
    Cpu,
    Io,
}

impl Resource {
    /// The resource used by the activity at `index` (0-based).
    ///
    /// Even activities run on the CPU, odd ones on the I/O device.
    pub fn for_activity(index: usize) -> Resource {
        if index % 2 == 0 {
            Resource::Cpu
        } else {
            Resource::Io
        }
    }

    /// The resource a process moves to after finishing on this one.
    pub fn other(self) -> Resource {
        match self {
            Resource::Cpu => Resource::Io,
            Resource::Io => Resource::Cpu,
        }
    }

    /// A dense index, usable for per-resource arrays.
    pub fn index(self) -> usize {
        match self {
            Resource::Cpu => 0,
            Resource::Io => 1,
        }
    }
}

impl Display for Resource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Resource::Cpu => write!(f, "CPU"),
            Resource::Io => write!(f, "I/O"),
        }
    }
}

/// A parsed process description: a PID and its bursts, CPU first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
    pub pid: Pid,
    pub bursts: Vec<Ticks>,
}

impl Job {
    pub fn new(pid: Pid, bursts: Vec<Ticks>) -> Job {
        Job { pid, bursts }
    }
}

/// The unit of work moved between the resource queues.
///
/// A record is owned either by a queue or by the worker executing it.
/// It is never cloned.
#[derive(Debug, PartialEq, Eq)]
pub struct ProcessRecord {
    pid: Pid,
    bursts: Vec<Ticks>,
    cursor: usize,
    ready_time: Ticks,
}

impl ProcessRecord {
    /// Builds a record ready for its first CPU burst at time 0.
    ///
    /// The burst storage is reserved up front, so an allocation failure
    /// surfaces here instead of aborting the process.
    pub fn new(job: &Job) -> Result<ProcessRecord, TryReserveError> {
        let mut bursts = Vec::new();
        bursts.try_reserve_exact(job.bursts.len())?;
        bursts.extend_from_slice(&job.bursts);
        Ok(ProcessRecord {
            pid: job.pid,
            bursts,
            cursor: 0,
            ready_time: 0,
        })
    }

    pub fn pid(&self) -> Pid {
        self.pid
    }

    /// Index of the next burst to execute.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.bursts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bursts.is_empty()
    }

    pub fn ready_time(&self) -> Ticks {
        self.ready_time
    }

    pub fn is_terminal(&self) -> bool {
        self.cursor >= self.len()
    }

    /// The resource the current burst needs.
    pub fn resource(&self) -> Resource {
        Resource::for_activity(self.cursor)
    }

    /// Length of the current burst. A terminal record reports the last
    /// burst it executed.
    pub fn burst(&self) -> Ticks {
        let index = self.cursor.min(self.len().saturating_sub(1));
        self.bursts.get(index).copied().unwrap_or(0)
    }

    /// Marks the current burst as finished at `finished_at`.
    ///
    /// Returns the resource of the next burst, or [`None`] if the
    /// process has no bursts left. The ready time only moves when there
    /// is a next burst to become ready for.
    pub fn advance(&mut self, finished_at: Ticks) -> Option<Resource> {
        if self.is_terminal() {
            return None;
        }
        self.cursor += 1;
        if self.is_terminal() {
            None
        } else {
            self.ready_time = finished_at;
            Some(self.resource())
        }
    }
}
