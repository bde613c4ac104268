//! The resource queues and the termination state.
//!
//! Both queues, the number of outstanding records and the termination
//! state live behind a single mutex. Each queue has its own condition
//! variable, and every change that can end a wait on a queue notifies
//! that queue's condition variable before the lock is released.

use std::collections::VecDeque;
use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};

use log::{debug, warn};
use scheduler::{ProcessRecord, Resource};

use crate::SimulationError;

/// The shared termination state.
///
/// Leaves [`Termination::Running`] at most once.
#[derive(Debug)]
pub(crate) enum Termination {
    Running,
    /// Every process retired.
    Drained,
    /// A server hit an unrecoverable error.
    Failed(SimulationError),
}

/// Why a server stopped.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) enum Exit {
    Drained,
    Failed,
}

#[derive(Debug)]
struct Board {
    queues: [VecDeque<ProcessRecord>; 2],
    /// Records created and not yet retired, queued or executing.
    outstanding: usize,
    termination: Termination,
}

impl Board {
    fn exit(&self) -> Option<Exit> {
        match self.termination {
            Termination::Running => None,
            Termination::Drained => Some(Exit::Drained),
            Termination::Failed(_) => Some(Exit::Failed),
        }
    }
}

/// State shared by the two servers.
#[derive(Debug)]
pub(crate) struct Shared {
    board: Mutex<Board>,
    ready: [Condvar; 2],
}

impl Shared {
    /// Seeds the CPU queue with `records`, in order.
    ///
    /// With no records there is nothing to drain, so the simulation
    /// starts out finished.
    pub fn new(records: Vec<ProcessRecord>) -> Shared {
        let outstanding = records.len();
        let termination = if outstanding == 0 {
            Termination::Drained
        } else {
            Termination::Running
        };
        Shared {
            board: Mutex::new(Board {
                queues: [VecDeque::from(records), VecDeque::new()],
                outstanding,
                termination,
            }),
            ready: [Condvar::new(), Condvar::new()],
        }
    }

    fn lock(&self) -> MutexGuard<'_, Board> {
        self.board.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns the queue of `resource`.
    pub fn queue(&self, resource: Resource) -> ResourceQueue<'_> {
        ResourceQueue {
            shared: self,
            resource,
        }
    }

    /// Retires a record that finished on `resource`.
    ///
    /// Retiring the last outstanding record drains the simulation and
    /// wakes the other server. Returns `true` in that case.
    pub fn retire(&self, resource: Resource) -> bool {
        let mut board = self.lock();
        debug_assert!(board.outstanding > 0, "retired more records than admitted");
        board.outstanding = board.outstanding.saturating_sub(1);

        if board.outstanding == 0 && matches!(board.termination, Termination::Running) {
            debug_assert!(board.queues.iter().all(VecDeque::is_empty));
            board.termination = Termination::Drained;
            self.ready[resource.other().index()].notify_all();
            debug!("{resource} server retired the last process");
            return true;
        }
        false
    }

    /// Stops the simulation with `error`, waking both servers.
    ///
    /// Only the first failure is kept, and a drained simulation stays
    /// drained. Returns `true` if this call changed the state.
    pub fn fail(&self, error: SimulationError) -> bool {
        let mut board = self.lock();
        if !matches!(board.termination, Termination::Running) {
            debug!("ignoring failure after termination: {error}");
            return false;
        }
        warn!("stopping simulation: {error}");
        board.termination = Termination::Failed(error);
        for ready in &self.ready {
            ready.notify_all();
        }
        true
    }

    /// Returns the final termination state.
    pub fn into_termination(self) -> Termination {
        self.board
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
            .termination
    }
}

/// A handle on the FIFO queue of one resource.
pub(crate) struct ResourceQueue<'a> {
    shared: &'a Shared,
    resource: Resource,
}

impl ResourceQueue<'_> {
    /// Appends a record and wakes the server of this queue.
    pub fn push(&self, record: ProcessRecord) {
        debug_assert_eq!(record.resource(), self.resource);
        let mut board = self.shared.lock();
        board.queues[self.resource.index()].push_back(record);
        self.shared.ready[self.resource.index()].notify_all();
    }

    /// Removes the head of the queue, waiting while the queue is empty
    /// and the simulation is running.
    ///
    /// Once the simulation has stopped, returns why instead, even if
    /// records are still queued.
    pub fn pop_blocking(&self) -> Result<ProcessRecord, Exit> {
        let index = self.resource.index();
        let mut board = self.shared.lock();
        loop {
            if let Some(exit) = board.exit() {
                return Err(exit);
            }
            if let Some(record) = board.queues[index].pop_front() {
                return Ok(record);
            }
            board = self.shared.ready[index]
                .wait(board)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.shared.lock().queues[self.resource.index()].is_empty()
    }
}
