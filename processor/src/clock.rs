use scheduler::{ResourceStats, Ticks};

/// The simulated clock of one resource.
///
/// Only the worker serving the resource touches its clock, so it needs
/// no synchronization. `idle + executed == busy_until` always holds.
///
/// The arithmetic is unchecked: the coordinator only admits workloads
/// whose total burst time, multiplied by the number of bursts, fits in
/// [`Ticks`]. That bounds every field, the summed waits included.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ResourceClock {
    busy_until: Ticks,
    idle: Ticks,
    waiting: Ticks,
    executed: Ticks,
    dispatched: usize,
}

impl ResourceClock {
    pub fn new() -> ResourceClock {
        ResourceClock::default()
    }

    pub fn busy_until(&self) -> Ticks {
        self.busy_until
    }

    /// Accounts for a process that became ready at `ready_time`.
    ///
    /// If the resource ran dry before the process arrived, the gap is
    /// idle time. Returns how long the process waited in the queue.
    pub fn admit(&mut self, ready_time: Ticks) -> Ticks {
        if self.busy_until < ready_time {
            self.idle += ready_time - self.busy_until;
            self.busy_until = ready_time;
        }
        let wait = self.busy_until - ready_time;
        self.waiting += wait;
        wait
    }

    /// Runs a burst and returns the time it finished.
    pub fn execute(&mut self, burst: Ticks) -> Ticks {
        self.busy_until += burst;
        self.executed += burst;
        self.dispatched += 1;
        self.busy_until
    }

    pub fn stats(&self) -> ResourceStats {
        ResourceStats {
            busy_until: self.busy_until,
            idle: self.idle,
            waiting: self.waiting,
            executed: self.executed,
            dispatched: self.dispatched,
        }
    }
}
