//! Reading process descriptions from disk.
//!
//! A job file lists one process descriptor per line. A descriptor is
//! named `PID-<n>` and holds one activity per line:
//!
//! ```text
//! 1 CPU 5
//! 2 I/O 3
//! 3 CPU 2
//! ```
//!
//! Activities are numbered from 1 and alternate between `CPU` (odd)
//! and `I/O` (even).

use std::fmt::Display;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::debug;

use crate::{Job, Pid, Resource, Ticks};

const PID_PREFIX: &str = "PID-";

/// An error found while reading process descriptions.
#[derive(Debug)]
pub enum JobError {
    /// A file could not be read.
    Io { path: PathBuf, source: io::Error },

    /// A descriptor file name is not `PID-<n>` with `n >= 1`.
    FileName { path: PathBuf },

    /// A descriptor has no activities.
    Empty { path: PathBuf },

    /// A line is not `<activity> <CPU|I/O> <burst>`.
    Format {
        path: PathBuf,
        line: usize,
        text: String,
    },

    /// An activity is out of sequence.
    Activity {
        path: PathBuf,
        line: usize,
        expected: usize,
        found: String,
    },

    /// An activity names the wrong resource for its position.
    Parity {
        path: PathBuf,
        line: usize,
        expected: Resource,
        found: String,
    },

    /// A burst length is not a non-negative integer.
    Burst {
        path: PathBuf,
        line: usize,
        found: String,
    },

    /// The job file lists no processes.
    NoProcesses { path: PathBuf },
}

impl Display for JobError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JobError::Io { path, source } => {
                write!(f, "cannot read {}: {}", path.display(), source)
            }
            JobError::FileName { path } => {
                write!(
                    f,
                    "{}: descriptor name should be {PID_PREFIX}<n>",
                    path.display()
                )
            }
            JobError::Empty { path } => write!(f, "{}: no activities", path.display()),
            JobError::Format { path, line, text } => write!(
                f,
                "{}:{line}: wrong format for activity line {text:?}, should be <activity> <CPU|I/O> <burst>",
                path.display()
            ),
            JobError::Activity {
                path,
                line,
                expected,
                found,
            } => write!(
                f,
                "{}:{line}: expected activity {expected}, found {found:?}",
                path.display()
            ),
            JobError::Parity {
                path,
                line,
                expected,
                found,
            } => write!(
                f,
                "{}:{line}: expected {expected} activity, found {found:?}",
                path.display()
            ),
            JobError::Burst { path, line, found } => write!(
                f,
                "{}:{line}: invalid burst length {found:?}",
                path.display()
            ),
            JobError::NoProcesses { path } => write!(f, "{}: no processes", path.display()),
        }
    }
}

impl std::error::Error for JobError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            JobError::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

fn read(path: &Path) -> Result<String, JobError> {
    fs::read_to_string(path).map_err(|source| JobError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Extracts the PID from a `PID-<n>` file name.
pub fn pid_from_path(path: &Path) -> Result<Pid, JobError> {
    path.file_name()
        .and_then(|name| name.to_str())
        .and_then(|name| name.strip_prefix(PID_PREFIX))
        .and_then(|number| number.parse::<usize>().ok())
        .and_then(Pid::new)
        .ok_or_else(|| JobError::FileName {
            path: path.to_path_buf(),
        })
}

/// Parses the activity lines of a descriptor into burst lengths.
///
/// * `path` - only used for error messages.
/// * `text` - the descriptor contents.
pub fn parse_activities(path: &Path, text: &str) -> Result<Vec<Ticks>, JobError> {
    let mut bursts = Vec::new();

    for (index, line) in text.lines().enumerate() {
        let line_number = index + 1;
        if line.trim().is_empty() {
            continue;
        }

        let fields: Vec<&str> = line.split_whitespace().collect();
        let [activity, kind, burst] = fields[..] else {
            return Err(JobError::Format {
                path: path.to_path_buf(),
                line: line_number,
                text: line.to_string(),
            });
        };

        let expected = bursts.len() + 1;
        if activity.parse::<usize>().ok() != Some(expected) {
            return Err(JobError::Activity {
                path: path.to_path_buf(),
                line: line_number,
                expected,
                found: activity.to_string(),
            });
        }

        let resource = Resource::for_activity(bursts.len());
        if kind != resource.to_string() {
            return Err(JobError::Parity {
                path: path.to_path_buf(),
                line: line_number,
                expected: resource,
                found: kind.to_string(),
            });
        }

        let burst = burst.parse::<Ticks>().map_err(|_| JobError::Burst {
            path: path.to_path_buf(),
            line: line_number,
            found: burst.to_string(),
        })?;
        bursts.push(burst);
    }

    if bursts.is_empty() {
        return Err(JobError::Empty {
            path: path.to_path_buf(),
        });
    }
    Ok(bursts)
}

/// Reads one `PID-<n>` descriptor file.
pub fn load_descriptor(path: &Path) -> Result<Job, JobError> {
    let pid = pid_from_path(path)?;
    let bursts = parse_activities(path, &read(path)?)?;
    debug!("loaded process {pid} with {} activities", bursts.len());
    Ok(Job::new(pid, bursts))
}

/// Reads a job file and every descriptor it lists, in order.
///
/// Relative descriptor paths are resolved against the job file's
/// directory.
pub fn load_job_file(path: &Path) -> Result<Vec<Job>, JobError> {
    let base = path.parent().unwrap_or_else(|| Path::new(""));
    let jobs = read(path)?
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| load_descriptor(&base.join(line)))
        .collect::<Result<Vec<_>, _>>()?;

    if jobs.is_empty() {
        return Err(JobError::NoProcesses {
            path: path.to_path_buf(),
        });
    }
    Ok(jobs)
}

/// Reads every `PID-<n>` descriptor in a directory, ordered by PID.
///
/// Files with other names are ignored.
pub fn load_directory(dir: &Path) -> Result<Vec<Job>, JobError> {
    let io_error = |source| JobError::Io {
        path: dir.to_path_buf(),
        source,
    };

    let mut descriptors = Vec::new();
    for entry in fs::read_dir(dir).map_err(io_error)? {
        let path = entry.map_err(io_error)?.path();
        if path.is_file() {
            if let Ok(pid) = pid_from_path(&path) {
                descriptors.push((pid, path));
            }
        }
    }
    descriptors.sort();

    let jobs = descriptors
        .iter()
        .map(|(_, path)| load_descriptor(path))
        .collect::<Result<Vec<_>, _>>()?;

    if jobs.is_empty() {
        return Err(JobError::NoProcesses {
            path: dir.to_path_buf(),
        });
    }
    Ok(jobs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn pid(pid: usize) -> Pid {
        Pid::new(pid).unwrap()
    }

    #[test]
    fn parses_alternating_activities() {
        let bursts = parse_activities(Path::new("PID-1"), "1 CPU 5\n2 I/O 3\n3 CPU 0\n").unwrap();
        assert_eq!(bursts, vec![5, 3, 0]);
    }

    #[test]
    fn rejects_wrong_parity() {
        let error = parse_activities(Path::new("PID-1"), "1 CPU 5\n2 CPU 3\n").unwrap_err();
        assert!(matches!(
            error,
            JobError::Parity {
                line: 2,
                expected: Resource::Io,
                ..
            }
        ));
    }

    #[test]
    fn rejects_out_of_order_activity() {
        let error = parse_activities(Path::new("PID-1"), "1 CPU 5\n3 I/O 3\n").unwrap_err();
        assert!(matches!(
            error,
            JobError::Activity {
                line: 2,
                expected: 2,
                ..
            }
        ));
    }

    #[test]
    fn rejects_bad_lines() {
        let path = Path::new("PID-1");
        assert!(matches!(
            parse_activities(path, "1 CPU\n"),
            Err(JobError::Format { line: 1, .. })
        ));
        assert!(matches!(
            parse_activities(path, "1 CPU -4\n"),
            Err(JobError::Burst { line: 1, .. })
        ));
        assert!(matches!(
            parse_activities(path, "\n\n"),
            Err(JobError::Empty { .. })
        ));
    }

    #[test]
    fn pid_comes_from_file_name() {
        assert_eq!(pid_from_path(Path::new("jobs/PID-12")).unwrap(), pid(12));
        assert!(pid_from_path(Path::new("PID-0")).is_err());
        assert!(pid_from_path(Path::new("process-1")).is_err());
    }

    #[test]
    fn loads_job_file_relative_to_its_directory() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("PID-2"), "1 CPU 4\n2 I/O 1\n3 CPU 1\n").unwrap();
        fs::write(dir.path().join("PID-1"), "1 CPU 3\n").unwrap();
        fs::write(dir.path().join("job"), "PID-2\nPID-1\n\n").unwrap();

        let jobs = load_job_file(&dir.path().join("job")).unwrap();
        assert_eq!(
            jobs,
            vec![Job::new(pid(2), vec![4, 1, 1]), Job::new(pid(1), vec![3])]
        );
    }

    #[test]
    fn missing_descriptor_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("job"), "PID-9\n").unwrap();

        let error = load_job_file(&dir.path().join("job")).unwrap_err();
        assert!(matches!(error, JobError::Io { .. }));
    }

    #[test]
    fn loads_directory_in_pid_order() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("PID-10"), "1 CPU 1\n").unwrap();
        fs::write(dir.path().join("PID-2"), "1 CPU 2\n").unwrap();
        fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let jobs = load_directory(dir.path()).unwrap();
        let pids: Vec<_> = jobs.iter().map(|job| job.pid).collect();
        assert_eq!(pids, vec![pid(2), pid(10)]);
    }

    #[test]
    fn empty_directory_has_no_processes() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            load_directory(dir.path()),
            Err(JobError::NoProcesses { .. })
        ));
    }
}
