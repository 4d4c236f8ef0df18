// ── Workload loader ──────────────────────────────────────────
//
// Grammar: whitespace-separated integer quintuples, one per line,
//
//     <arrival_time> <pid> <cpu_time> <io_time> <repeats>
//
// Consecutive lines sharing a pid describe successive behaviours
// of one process; the first line's arrival time wins, the rest
// are ignored. A change in pid closes the previous process. The
// workload is either loadable or rejected here; the simulation
// itself never fails.

use std::collections::HashSet;
use std::collections::VecDeque;
use std::io::{self, BufRead};

use thiserror::Error;

use crate::process::{Behaviour, Process, NULL_PID};

#[derive(Debug, Error)]
pub enum WorkloadError {
    #[error("failed to read workload: {0}")]
    Io(#[from] io::Error),
    #[error("line {line}: expected 5 fields, got {got}")]
    FieldCount { line: usize, got: usize },
    #[error("line {line}: {token:?} is not an integer")]
    BadInteger { line: usize, token: String },
    #[error("line {line}: {field} must not be negative, got {value}")]
    Negative { line: usize, field: &'static str, value: i64 },
    #[error("line {line}: process id must be positive, got {pid}")]
    NonPositivePid { line: usize, pid: i64 },
    #[error("line {line}: process {pid} was already closed by an earlier line")]
    DuplicatePid { line: usize, pid: u32 },
}

/// Parse a workload description into processes in input order.
/// Blank lines are skipped; everything else must be a quintuple.
pub fn parse_workload<R: BufRead>(input: R) -> Result<Vec<Process>, WorkloadError> {
    let mut processes: Vec<Process> = Vec::new();
    let mut closed: HashSet<u32> = HashSet::new();

    for (index, line) in input.lines().enumerate() {
        let line = line?;
        let number = index + 1;
        if line.trim().is_empty() {
            continue;
        }

        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() != 5 {
            return Err(WorkloadError::FieldCount { line: number, got: fields.len() });
        }

        let arrival_time = parse_field(fields[0], "arrival_time", number)?;
        let pid = parse_pid(fields[1], number)?;
        let behaviour = Behaviour {
            cpu_time: parse_field(fields[2], "cpu_time", number)?,
            io_time: parse_field(fields[3], "io_time", number)?,
            repeats: parse_field(fields[4], "repeats", number)?,
        };

        let continues_current = processes.last().map_or(false, |p| p.pid == pid);
        if continues_current {
            if let Some(current) = processes.last_mut() {
                // Continuation line: arrival_time is ignored.
                current.behaviours.push_back(behaviour);
            }
        } else {
            if let Some(done) = processes.last() {
                closed.insert(done.pid);
            }
            if closed.contains(&pid) {
                return Err(WorkloadError::DuplicatePid { line: number, pid });
            }
            let mut process = Process::new(pid, arrival_time);
            process.behaviours = VecDeque::from([behaviour]);
            processes.push(process);
        }
    }

    Ok(processes)
}

fn parse_field(token: &str, field: &'static str, line: usize) -> Result<u64, WorkloadError> {
    let value: i64 = token
        .parse()
        .map_err(|_| WorkloadError::BadInteger { line, token: token.to_string() })?;
    if value < 0 {
        return Err(WorkloadError::Negative { line, field, value });
    }
    Ok(value as u64)
}

fn parse_pid(token: &str, line: usize) -> Result<u32, WorkloadError> {
    let value: i64 = token
        .parse()
        .map_err(|_| WorkloadError::BadInteger { line, token: token.to_string() })?;
    if value <= i64::from(NULL_PID) {
        return Err(WorkloadError::NonPositivePid { line, pid: value });
    }
    u32::try_from(value).map_err(|_| WorkloadError::NonPositivePid { line, pid: value })
}
