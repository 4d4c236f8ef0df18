use std::collections::VecDeque;

pub const NUM_LEVELS: usize = 3;

/// Highest-priority level. Levels count downwards in urgency: 0 preempts 1 preempts 2.
pub const MAX_PRIORITY: usize = 0;
/// Lowest-priority level.
pub const MIN_PRIORITY: usize = NUM_LEVELS - 1;

/// Ticks per quantum at each level. Lower level = longer quantum.
pub const QUANTA: [u64; NUM_LEVELS] = [10, 30, 100];

/// Consecutive full-quantum preemptions at a level before demotion.
/// The bottom level cannot demote; its entry is disregarded.
pub const DEMOTION: [u32; NUM_LEVELS] = [1, 2, 0];

/// Consecutive voluntary I/O yields at a level before promotion.
/// The top level cannot promote; its entry is disregarded.
pub const PROMOTION: [u32; NUM_LEVELS] = [0, 2, 1];

/// Pid of the implicit idle process that soaks up ticks when the
/// ready queue is empty.
pub const NULL_PID: u32 = 0;

/// One phase of a process's life: `repeats` cycles of a CPU burst
/// of `cpu_time` ticks followed by `io_time` ticks blocked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Behaviour {
    pub cpu_time: u64,
    pub io_time: u64,
    pub repeats: u64,
}

/// A simulated job. Counters are public in the PCB style: the
/// scheduler mutates them through the queue's update-head operation.
#[derive(Debug, Clone)]
pub struct Process {
    pub pid: u32,
    /// Tick at which the process first becomes eligible.
    pub arrival_time: u64,
    /// Remaining phases, consumed front-to-back.
    pub behaviours: VecDeque<Behaviour>,
    /// Level to restore when returning from I/O.
    pub priority_cache: usize,
    /// CPU ticks consumed within the current burst.
    pub units: u64,
    /// CPU ticks consumed within the current quantum slice.
    pub quanta: u64,
    /// Completed bursts within the current behaviour's repeat cycle.
    pub progress: u64,
    /// Consecutive voluntary I/O yields at the current level.
    pub promotion: u32,
    /// Consecutive full-quantum preemptions at the current level.
    pub demotion: u32,
    /// Total ticks this process has held the CPU.
    pub total_cpu_usage: u64,
}

impl Process {
    /// A fresh process with zeroed counters and no behaviours yet.
    pub fn new(pid: u32, arrival_time: u64) -> Self {
        Self {
            pid,
            arrival_time,
            behaviours: VecDeque::new(),
            priority_cache: MAX_PRIORITY,
            units: 0,
            quanta: 0,
            progress: 0,
            promotion: 0,
            demotion: 0,
            total_cpu_usage: 0,
        }
    }

    /// The idle accumulator, pid 0.
    pub fn null() -> Self {
        Self::new(NULL_PID, 0)
    }

    /// The behaviour currently being executed.
    pub fn current_behaviour(&self) -> Option<&Behaviour> {
        self.behaviours.front()
    }
}
