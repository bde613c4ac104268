use std::env;
use std::fs;

use processor::{format_logs, Processor};
use scheduler::{Job, MemorySink, Pid, Report, Ticks};

mod files;
mod simple;

fn write_logs(folder: &str, name: &str, logs: &str) {
    fs::create_dir_all(format!("../outputs/{folder}")).unwrap();
    fs::write(format!("../outputs/{folder}/{name}.log"), logs).unwrap();
}

fn read_logs(folder: &str, name: &str) -> String {
    fs::read_to_string(format!("../outputs/{folder}/{name}.log")).unwrap()
}

/// Simulates `jobs` and compares the per-process log and the report with
/// the reference output. Set `WRITE_OUTPUT` to regenerate it.
fn run(folder: &str, name: &str, jobs: &[Job]) -> Report {
    let sink = MemorySink::new();
    let report = Processor::run(jobs, &sink).unwrap();
    let output = format!("{}{report}\n", format_logs(&sink.take()));

    if env::var("WRITE_OUTPUT").is_ok() {
        write_logs(folder, name, &output);
    } else {
        let reference = read_logs(folder, name);

        println!("\nleft = Correct Output\nright = Your Output\n");
        use pretty_assertions::assert_eq;
        assert_eq!(reference, output);
    }
    report
}

/// Builds jobs with PIDs 1, 2, ... in order.
fn jobs(bursts: &[&[Ticks]]) -> Vec<Job> {
    bursts
        .iter()
        .enumerate()
        .map(|(index, bursts)| Job::new(Pid::new(index + 1).unwrap(), bursts.to_vec()))
        .collect()
}
