use core::module_path;
use function_name::named;
use scheduler::Resource;

use super::{jobs, run};

#[test]
#[named]
pub fn single_process() {
    let report = run(
        module_path!().split("::").last().unwrap(),
        function_name!(),
        &jobs(&[&[3]]),
    );

    assert_eq!(report.utilization(Resource::Cpu), Some(100.0));
    assert_eq!(report.utilization(Resource::Io), None);
}

#[test]
#[named]
pub fn alternating() {
    let report = run(
        module_path!().split("::").last().unwrap(),
        function_name!(),
        &jobs(&[&[2, 3, 1]]),
    );

    assert_eq!(report.cpu.busy_until, 6);
    assert_eq!(report.cpu.idle, 3);
    assert_eq!(report.io.busy_until, 5);
    assert_eq!(report.io.idle, 2);
    assert_eq!(report.average_wait(Resource::Cpu), 0.0);
    assert_eq!(report.average_wait(Resource::Io), 0.0);
}

#[test]
#[named]
pub fn zero_burst() {
    let report = run(
        module_path!().split("::").last().unwrap(),
        function_name!(),
        &jobs(&[&[0]]),
    );

    assert_eq!(report.cpu.busy_until, 0);
    assert_eq!(report.cpu.waiting, 0);
    assert_eq!(report.cpu.dispatched, 1);
    assert_eq!(report.utilization(Resource::Cpu), None);
}

#[test]
#[named]
pub fn ends_on_io() {
    let report = run(
        module_path!().split("::").last().unwrap(),
        function_name!(),
        &jobs(&[&[1, 4]]),
    );

    assert_eq!(report.utilization(Resource::Io), Some(80.0));
}
