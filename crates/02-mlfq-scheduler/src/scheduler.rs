// ── Scheduler core ───────────────────────────────────────────
//
// One virtual CPU, three priority levels, four queues. Each tick
// runs a fixed pipeline:
//
//   1. quantum check: charge the incumbent for the previous tick
//      and preempt it if the quantum is spent
//   2. admission: move due arrivals and finished I/O into ready
//   3. schedule: normalise the head of ready until it is a
//      process that can actually receive this tick
//   4. run: grant one tick, or charge the null process
//
// Correctness lives in this ordering: counters are charged at
// the top of the next tick, preemption happens before newcomers
// are admitted, and every transition is narrated to the sink in
// issue order.

use std::collections::VecDeque;
use std::io;

use priority_queue::PriorityQueue;

use crate::event::{Event, EventSink};
use crate::process::{
    Behaviour, Process, DEMOTION, MAX_PRIORITY, MIN_PRIORITY, PROMOTION, QUANTA,
};

/// What the schedule step should do with the head of the ready
/// queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    /// Last behaviour fully repeated: retire the process.
    Terminate,
    /// Current behaviour fully repeated, more remain: advance.
    AdvanceBehaviour,
    /// Burst complete: block for I/O.
    DispatchIo,
    /// Eligible for the CPU. `announce` is true at the start of a
    /// fresh quantum slice, when a RUN event is due.
    Run { announce: bool, remaining: u64 },
}

/// Classify the head of the ready queue. Pure so the policy can
/// be tested without building a whole simulation.
fn decide(process: &Process, behaviour: &Behaviour) -> Action {
    let last_behaviour = process.behaviours.len() == 1;
    if process.progress >= behaviour.repeats {
        if last_behaviour {
            Action::Terminate
        } else {
            Action::AdvanceBehaviour
        }
    } else if process.units >= behaviour.cpu_time {
        Action::DispatchIo
    } else {
        Action::Run {
            announce: process.quanta == 0,
            remaining: behaviour.cpu_time - process.units,
        }
    }
}

/// The simulation: owns the queues, the clock, the idle
/// accumulator and the event sink.
pub struct Scheduler<S: EventSink> {
    arrival: PriorityQueue<Process>,
    ready: PriorityQueue<Process>,
    io: PriorityQueue<Process>,
    report: PriorityQueue<Process>,
    null: Process,
    clock: u64,
    sink: S,
}

impl<S: EventSink> Scheduler<S> {
    /// Seed the arrival queue with the loader's process set, in
    /// input order among equal arrival times.
    pub fn new(workload: Vec<Process>, sink: S) -> Self {
        let mut arrival = PriorityQueue::new();
        for process in workload {
            let key = process.arrival_time;
            arrival.push(process, key);
        }
        Self {
            arrival,
            ready: PriorityQueue::new(),
            io: PriorityQueue::new(),
            report: PriorityQueue::new(),
            null: Process::null(),
            clock: 0,
            sink,
        }
    }

    /// Drive ticks until no live process remains, then emit the
    /// shutdown line and the usage report.
    pub fn run_to_completion(&mut self) -> io::Result<()> {
        while self.is_active() {
            self.tick()?;
        }
        // The loop's final increment overshoots by one tick.
        self.clock = self.clock.saturating_sub(1);
        self.sink.emit(Event::Shutdown { time: self.clock })?;
        self.emit_report()
    }

    /// Recover the sink, e.g. to inspect a recorded trace.
    pub fn into_sink(self) -> S {
        self.sink
    }

    fn is_active(&self) -> bool {
        !(self.arrival.is_empty() && self.ready.is_empty() && self.io.is_empty())
    }

    /// One virtual tick, steps 1-4 plus the clock advance.
    fn tick(&mut self) -> io::Result<()> {
        self.expire_quantum()?;
        self.admit()?;
        self.schedule()?;
        self.grant_tick();
        self.clock += 1;
        Ok(())
    }

    /// Step 1: charge the incumbent's quantum counter for the tick
    /// it just received and preempt it if the quantum is now spent.
    /// Runs before admission so a newcomer never races a process
    /// that should already have been halted.
    fn expire_quantum(&mut self) -> io::Result<()> {
        let Some(level) = self.ready.head_priority() else {
            return Ok(());
        };
        let Some(mut head) = self.ready.peek().cloned() else {
            return Ok(());
        };
        head.quanta += 1;
        let expired = head.quanta >= QUANTA[level as usize];
        self.ready.update_head(head);
        if expired {
            self.halt()?;
        }
        Ok(())
    }

    /// Step 2: admit due arrivals (at the top level) and due I/O
    /// returns (at their cached level), then narrate a displaced
    /// incumbent.
    fn admit(&mut self) -> io::Result<()> {
        let incumbent = self
            .ready
            .peek()
            .map(|p| p.pid)
            .zip(self.ready.head_priority());

        while self.arrival.head_priority().map_or(false, |due| due <= self.clock) {
            let Some(process) = self.arrival.pop() else {
                break;
            };
            let pid = process.pid;
            debug_assert!(!self.ready.contains_where(|p| p.pid == pid));
            self.ready.push(process, MAX_PRIORITY as u64);
            self.sink.emit(Event::Create { pid, time: self.clock })?;
        }

        while self.io.head_priority().map_or(false, |wake| wake <= self.clock) {
            let Some(process) = self.io.pop() else {
                break;
            };
            let pid = process.pid;
            let level = process.priority_cache;
            debug_assert!(!self.ready.contains_where(|p| p.pid == pid));
            self.ready.push(process, level as u64);
            self.sink.emit(Event::Queued { pid, level, time: self.clock })?;
        }

        // A strictly higher-priority admission takes the head slot;
        // FIFO keeps same-level newcomers behind the incumbent.
        if let Some((pid, level)) = incumbent {
            if self.ready.peek().map(|p| p.pid) != Some(pid) {
                self.sink.emit(Event::Queued { pid, level: level as usize, time: self.clock })?;
            }
        }
        Ok(())
    }

    /// Quantum expiry: back of the queue, one demotion counter up,
    /// down a level once the threshold is met.
    fn halt(&mut self) -> io::Result<()> {
        let Some(level) = self.ready.head_priority() else {
            return Ok(());
        };
        let mut level = level as usize;
        let Some(mut process) = self.ready.pop() else {
            return Ok(());
        };
        process.demotion += 1;
        process.promotion = 0;
        process.quanta = 0;
        if process.demotion >= DEMOTION[level] && level != MIN_PRIORITY {
            level += 1;
            process.demotion = 0;
        }
        let pid = process.pid;
        self.ready.push(process, level as u64);
        self.sink.emit(Event::Queued { pid, level, time: self.clock })
    }

    /// Step 3: act on the head of ready until it is a process that
    /// can receive the upcoming tick, or the queue drains.
    fn schedule(&mut self) -> io::Result<()> {
        loop {
            let Some(level) = self.ready.head_priority() else {
                return Ok(());
            };
            let Some(process) = self.ready.peek().cloned() else {
                return Ok(());
            };
            let behaviour = process
                .current_behaviour()
                .cloned()
                .expect("ready process has no current behaviour");

            match decide(&process, &behaviour) {
                Action::Terminate => self.terminate()?,
                Action::AdvanceBehaviour => {
                    let mut advanced = process;
                    advanced.behaviours.pop_front();
                    advanced.progress = 0;
                    self.ready.update_head(advanced);
                }
                Action::DispatchIo => self.dispatch_io(&behaviour)?,
                Action::Run { announce, remaining } => {
                    if announce {
                        self.sink.emit(Event::Run {
                            pid: process.pid,
                            level: level as usize,
                            time: self.clock,
                            remaining,
                        })?;
                    }
                    return Ok(());
                }
            }
        }
    }

    /// Retire the head of ready into the report queue.
    fn terminate(&mut self) -> io::Result<()> {
        let Some(mut process) = self.ready.pop() else {
            return Ok(());
        };
        // Release the behaviour list; the record only carries its
        // usage total from here on.
        process.behaviours = VecDeque::new();
        let pid = process.pid;
        let usage = process.total_cpu_usage;
        self.report.push(process, usage);
        self.sink.emit(Event::Finished { pid, time: self.clock })
    }

    /// Burst complete: block the head of ready until its wake tick,
    /// promoting it first if it has yielded often enough.
    fn dispatch_io(&mut self, behaviour: &Behaviour) -> io::Result<()> {
        let Some(level) = self.ready.head_priority() else {
            return Ok(());
        };
        let mut level = level as usize;
        let Some(mut process) = self.ready.pop() else {
            return Ok(());
        };
        process.promotion += 1;
        process.demotion = 0;
        if process.promotion >= PROMOTION[level] && level != MAX_PRIORITY {
            level -= 1;
            process.promotion = 0;
        }
        process.priority_cache = level;
        process.progress += 1;
        process.units = 0;
        process.quanta = 0;
        let pid = process.pid;
        debug_assert!(!self.io.contains_where(|p| p.pid == pid));
        self.io.push(process, self.clock + behaviour.io_time);
        self.sink.emit(Event::Io { pid, time: self.clock })
    }

    /// Step 4: one tick of CPU for the head of ready, or one tick
    /// of idleness for the null process. The quantum counter is
    /// charged by step 1 of the next tick, not here.
    fn grant_tick(&mut self) {
        match self.ready.peek().cloned() {
            Some(mut process) => {
                process.units += 1;
                process.total_cpu_usage += 1;
                self.ready.update_head(process);
            }
            None => self.null.total_cpu_usage += 1,
        }
    }

    /// Drain the report queue in usage order, null process included
    /// if it ever soaked up a tick.
    fn emit_report(&mut self) -> io::Result<()> {
        if self.null.total_cpu_usage > 0 {
            let usage = self.null.total_cpu_usage;
            self.report.push(self.null.clone(), usage);
        }
        self.sink.emit(Event::ReportHeader)?;
        while let Some(process) = self.report.pop() {
            self.sink.emit(Event::Report {
                pid: process.pid,
                total_cpu_usage: process.total_cpu_usage,
            })?;
        }
        Ok(())
    }
}
