// ============================================================
//  Multi-level feedback queue (MLFQ) scheduling simulator.
//
//  MLFQ approximates optimal scheduling without knowing future
//  behaviour: CPU-bound processes that burn whole quanta sink
//  to lower-priority levels with longer quanta, I/O-bound
//  processes that yield early float back up. The same idea is
//  behind Solaris's TS class and Linux's O(1) scheduler.
//
//  This crate emulates a workload of processes tick-by-tick on
//  one virtual CPU under a three-level discipline, and emits a
//  deterministic trace of every scheduling decision plus a
//  final CPU-usage report. Processes live in four stable
//  min-priority queues (see the priority-queue crate): arrival
//  keyed by arrival tick, ready keyed by level, I/O keyed by
//  wake tick, report keyed by total usage.
// ============================================================

pub mod event;
pub mod process;
pub mod scheduler;
pub mod workload;

pub use event::{Event, EventSink, WriteSink};
pub use process::{
    Behaviour, Process, DEMOTION, MAX_PRIORITY, MIN_PRIORITY, NUM_LEVELS, PROMOTION, QUANTA,
};
pub use scheduler::Scheduler;
pub use workload::{parse_workload, WorkloadError};
