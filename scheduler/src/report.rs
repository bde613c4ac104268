use std::fmt::Display;

use crate::{Resource, Ticks};

/// Final accounting of one resource.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct ResourceStats {
    /// The time up to which the resource was modeled as occupied.
    pub busy_until: Ticks,
    /// Time spent with nothing to run.
    pub idle: Ticks,
    /// Sum of the time processes spent waiting in this resource's queue.
    pub waiting: Ticks,
    /// Sum of the burst lengths executed.
    pub executed: Ticks,
    /// Number of bursts executed.
    pub dispatched: usize,
}

impl ResourceStats {
    /// Busy percentage, [`None`] if the resource never advanced its clock.
    pub fn utilization(&self) -> Option<f64> {
        if self.busy_until == 0 {
            None
        } else {
            let busy = self.busy_until - self.idle;
            Some(100.0 * busy as f64 / self.busy_until as f64)
        }
    }
}

/// The statistics of a finished simulation.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Report {
    /// The number of simulated processes.
    pub processes: usize,
    pub cpu: ResourceStats,
    pub io: ResourceStats,
}

impl Report {
    pub fn stats(&self, resource: Resource) -> &ResourceStats {
        match resource {
            Resource::Cpu => &self.cpu,
            Resource::Io => &self.io,
        }
    }

    /// Average time a process spent waiting in the resource's queue.
    pub fn average_wait(&self, resource: Resource) -> f64 {
        if self.processes == 0 {
            return 0.0;
        }
        self.stats(resource).waiting as f64 / self.processes as f64
    }

    pub fn utilization(&self, resource: Resource) -> Option<f64> {
        self.stats(resource).utilization()
    }
}

impl Display for Report {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for resource in [Resource::Cpu, Resource::Io] {
            writeln!(
                f,
                "Average waiting time in {resource} queue: {:.2}",
                self.average_wait(resource)
            )?;
        }
        let utilization = |resource| match self.utilization(resource) {
            Some(percent) => format!("{percent:.2}%"),
            None => String::from("n/a"),
        };
        writeln!(f, "CPU utilization: {}", utilization(Resource::Cpu))?;
        write!(f, "I/O utilization: {}", utilization(Resource::Io))
    }
}
