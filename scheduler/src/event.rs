use std::fmt::Display;

use crate::{Pid, Resource, Ticks};

/// A progress notification sent to an [`EventSink`](crate::EventSink).
///
/// Activity numbers in the textual form are 1-based, the `cursor`
/// fields are the 0-based burst indexes.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Event {
    /// The process was created and placed in the CPU queue.
    Admitted {
        pid: Pid,
        /// The length of the first CPU burst.
        burst: Ticks,
    },

    /// A burst finished and the process moved to the other queue.
    Progress {
        pid: Pid,
        /// The resource that executed the burst.
        from: Resource,
        /// Index of the next burst.
        cursor: usize,
        /// The queue the process was moved to.
        destination: Resource,
        /// The time the process entered `destination`'s queue.
        arrival: Ticks,
        /// The length of the next burst.
        burst: Ticks,
    },

    /// The last burst finished and the process retired.
    Terminated {
        pid: Pid,
        /// The resource that executed the last burst.
        resource: Resource,
        /// The final cursor, equal to the number of bursts.
        cursor: usize,
        /// The time the process became ready for its last burst.
        arrival: Ticks,
        /// The length of the last burst.
        burst: Ticks,
        /// The simulated time of the retirement.
        finished: Ticks,
    },
}

impl Event {
    pub fn pid(&self) -> Pid {
        match self {
            Event::Admitted { pid, .. }
            | Event::Progress { pid, .. }
            | Event::Terminated { pid, .. } => *pid,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Event::Terminated { .. })
    }
}

impl Display for Event {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Event::Admitted { pid, burst } => {
                writeln!(f, "New process:")?;
                writeln!(f, "PID={pid}")?;
                writeln!(f, "AC=1")?;
                writeln!(f, "State={}", Resource::Cpu)?;
                writeln!(f, "Arrive=0")?;
                write!(f, "Time={burst}")
            }
            Event::Progress {
                pid,
                from,
                cursor,
                destination,
                arrival,
                burst,
            } => {
                writeln!(f, "Finishing {from} activity:")?;
                writeln!(f, "PID={pid}")?;
                writeln!(f, "AC={}", cursor + 1)?;
                writeln!(f, "State={destination}")?;
                writeln!(f, "Arrive={arrival}")?;
                write!(f, "Time={burst}")
            }
            Event::Terminated {
                pid,
                resource,
                cursor,
                arrival,
                burst,
                ..
            } => {
                writeln!(f, "Process PID-{pid} is terminated.")?;
                writeln!(f, "PID={pid}")?;
                writeln!(f, "AC={cursor}")?;
                writeln!(f, "State={resource}")?;
                writeln!(f, "Arrive={arrival}")?;
                write!(f, "Time={burst}")
            }
        }
    }
}
