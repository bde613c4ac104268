use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;

use processor::Processor;
use scheduler::{job, FileSink, Job, Report};

/// Simulates CPU and I/O scheduling of a set of processes.
///
/// Every process alternates between CPU and I/O bursts, starting on the
/// CPU. Both resources are served first come, first served. Progress is
/// appended to the progress log, terminations and the final statistics
/// to the summary log.
#[derive(Debug, Parser)]
struct Opts {
    /// Job file listing one PID-<n> descriptor per line.
    input: PathBuf,

    /// Treat the input as a directory of PID-<n> descriptors.
    #[clap(short = 'd', long, action = clap::ArgAction::SetTrue)]
    dir: bool,

    /// Log receiving admissions and hand-offs between resources.
    #[clap(long, env = "SCHED_PROGRESS_LOG", default_value = "log-A")]
    progress_log: PathBuf,

    /// Log receiving terminations and the final statistics.
    #[clap(long, env = "SCHED_SUMMARY_LOG", default_value = "log-B")]
    summary_log: PathBuf,

    /// Enable verbose output. Specify multiple times to increase
    /// verbosity.
    #[clap(short = 'v', long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn load(opts: &Opts) -> Result<Vec<Job>> {
    let jobs = if opts.dir {
        job::load_directory(&opts.input)
    } else {
        job::load_job_file(&opts.input)
    };
    jobs.with_context(|| format!("Could not load processes from {}", opts.input.display()))
}

/// Runs the simulation described by `jobs`, logging through `sink`.
fn simulate(jobs: &[Job], sink: &FileSink) -> Result<Report> {
    let report = Processor::run(jobs, sink).context("Scheduler failed")?;
    sink.append_summary(&format!("{report}\n\n"))
        .with_context(|| {
            format!(
                "Could not write statistics to {}",
                sink.summary_path().display()
            )
        })?;
    Ok(report)
}

fn main() -> Result<()> {
    let opts = Opts::parse();

    let llv = match opts.verbose {
        0 => simplelog::LevelFilter::Info,
        1 => simplelog::LevelFilter::Debug,
        _ => simplelog::LevelFilter::Trace,
    };
    let mut lcfg = simplelog::ConfigBuilder::new();
    lcfg.set_time_level(simplelog::LevelFilter::Error)
        .set_location_level(simplelog::LevelFilter::Off)
        .set_target_level(simplelog::LevelFilter::Off)
        .set_thread_level(simplelog::LevelFilter::Off);
    simplelog::TermLogger::init(
        llv,
        lcfg.build(),
        simplelog::TerminalMode::Stderr,
        simplelog::ColorChoice::Auto,
    )?;

    let jobs = load(&opts)?;
    info!("loaded {} processes from {}", jobs.len(), opts.input.display());

    let sink = FileSink::new(&opts.progress_log, &opts.summary_log);
    let report = simulate(&jobs, &sink)?;
    println!("{report}");
    Ok(())
}

#[cfg(test)]
mod tests;
