use std::fmt::Display;

use scheduler::{Pid, Resource, SinkError};

/// The reason a simulation did not produce a report.
#[derive(Debug)]
pub enum SimulationError {
    /// A process has no bursts.
    EmptyProcess(Pid),

    /// Two processes share a PID.
    DuplicatePid(Pid),

    /// The record of a process could not be allocated.
    OutOfMemory(Pid),

    /// Admitting the process would let a simulated clock overflow.
    ClockOverflow(Pid),

    /// The sink rejected the admission of a process, before any server
    /// started.
    Admission { pid: Pid, source: SinkError },

    /// The sink rejected an event while a server was running. The
    /// process in flight was dropped.
    Sink {
        resource: Resource,
        pid: Pid,
        source: SinkError,
    },

    /// A server thread panicked.
    Panicked(Resource),
}

impl SimulationError {
    /// The server that stopped the simulation, if any was running.
    pub fn resource(&self) -> Option<Resource> {
        match self {
            SimulationError::Sink { resource, .. } | SimulationError::Panicked(resource) => {
                Some(*resource)
            }
            _ => None,
        }
    }

    /// The process involved in the failure, if any.
    pub fn pid(&self) -> Option<Pid> {
        match self {
            SimulationError::EmptyProcess(pid)
            | SimulationError::DuplicatePid(pid)
            | SimulationError::OutOfMemory(pid)
            | SimulationError::ClockOverflow(pid)
            | SimulationError::Admission { pid, .. }
            | SimulationError::Sink { pid, .. } => Some(*pid),
            SimulationError::Panicked(_) => None,
        }
    }
}

impl Display for SimulationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SimulationError::EmptyProcess(pid) => write!(f, "process {pid} has no activities"),
            SimulationError::DuplicatePid(pid) => {
                write!(f, "process {pid} is listed more than once")
            }
            SimulationError::OutOfMemory(pid) => {
                write!(f, "could not allocate memory for process {pid}")
            }
            SimulationError::ClockOverflow(pid) => {
                write!(f, "bursts of process {pid} overflow the simulated clock")
            }
            SimulationError::Admission { pid, .. } => {
                write!(f, "could not log the admission of process {pid}")
            }
            SimulationError::Sink { resource, pid, .. } => {
                write!(f, "{resource} server could not log process {pid}")
            }
            SimulationError::Panicked(resource) => write!(f, "{resource} server panicked"),
        }
    }
}

impl std::error::Error for SimulationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SimulationError::Admission { source, .. } | SimulationError::Sink { source, .. } => {
                Some(source)
            }
            _ => None,
        }
    }
}
