use std::fs;
use std::path::Path;

use clap::Parser;
use pretty_assertions::assert_eq;
use processor::SimulationError;
use scheduler::FileSink;

use crate::{load, simulate, Opts};

fn write_job(dir: &Path) {
    fs::write(dir.join("PID-1"), "1 CPU 2\n2 I/O 3\n3 CPU 1\n").unwrap();
    fs::write(dir.join("job"), "PID-1\n").unwrap();
}

#[test]
pub fn job_file_to_logs() {
    let dir = tempfile::tempdir().unwrap();
    write_job(dir.path());

    let job = dir.path().join("job");
    let opts = Opts::parse_from([Path::new("runner"), job.as_path()]);
    let jobs = load(&opts).unwrap();

    let sink = FileSink::new(dir.path().join("log-A"), dir.path().join("log-B"));
    simulate(&jobs, &sink).unwrap();

    assert_eq!(
        fs::read_to_string(dir.path().join("log-A")).unwrap(),
        "New process:\nPID=1\nAC=1\nState=CPU\nArrive=0\nTime=2\n\n\
         Finishing CPU activity:\nPID=1\nAC=2\nState=I/O\nArrive=2\nTime=3\n\n\
         Finishing I/O activity:\nPID=1\nAC=3\nState=CPU\nArrive=5\nTime=1\n\n"
    );
    assert_eq!(
        fs::read_to_string(dir.path().join("log-B")).unwrap(),
        "Process PID-1 is terminated.\nPID=1\nAC=3\nState=CPU\nArrive=5\nTime=1\n\n\
         Average waiting time in CPU queue: 0.00\n\
         Average waiting time in I/O queue: 0.00\n\
         CPU utilization: 50.00%\n\
         I/O utilization: 60.00%\n\n"
    );
}

#[test]
pub fn directory_input() {
    let dir = tempfile::tempdir().unwrap();
    write_job(dir.path());
    fs::write(dir.path().join("PID-2"), "1 CPU 4\n").unwrap();

    let opts = Opts::parse_from([Path::new("runner"), Path::new("--dir"), dir.path()]);
    let pids: Vec<_> = load(&opts).unwrap().iter().map(|job| job.pid.get()).collect();
    assert_eq!(pids, vec![1, 2]);
}

#[test]
pub fn missing_log_directory_fails_before_start() {
    let dir = tempfile::tempdir().unwrap();
    write_job(dir.path());
    let jobs = load(&Opts::parse_from([
        Path::new("runner"),
        dir.path().join("job").as_path(),
    ]))
    .unwrap();

    let missing = dir.path().join("missing");
    let sink = FileSink::new(missing.join("log-A"), missing.join("log-B"));
    let error = simulate(&jobs, &sink).unwrap_err();

    assert!(matches!(
        error.downcast_ref::<SimulationError>(),
        Some(SimulationError::Admission { .. })
    ));
    assert!(!dir.path().join("log-B").exists());
}

#[test]
pub fn bad_descriptor_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("PID-1"), "1 CPU 2\n2 CPU 3\n").unwrap();
    fs::write(dir.path().join("job"), "PID-1\n").unwrap();

    let opts = Opts::parse_from([Path::new("runner"), dir.path().join("job").as_path()]);
    let error = load(&opts).unwrap_err();
    assert!(error.to_string().starts_with("Could not load processes from"));
    assert!(error.root_cause().to_string().contains("expected I/O activity"));
}
