// ── Scheduling events ────────────────────────────────────────
//
// The core narrates every state transition as a structured event
// rather than printing. The trace a sink receives, in emission
// order, is the authoritative record of a run: tests parse it
// back, the CLI renders it line-by-line.

use std::fmt;
use std::io::{self, Write};

use crate::process::NULL_PID;

/// One scheduling event. Levels are stored 0-based and displayed
/// 1-based.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// A process entered the ready queue for the first time.
    Create { pid: u32, time: u64 },
    /// A process begins a fresh quantum slice on the CPU.
    Run { pid: u32, level: usize, time: u64, remaining: u64 },
    /// A process was re-queued: quantum expiry, I/O return, or
    /// displacement by a higher-priority admission.
    Queued { pid: u32, level: usize, time: u64 },
    /// A process completed a burst and blocked for I/O.
    Io { pid: u32, time: u64 },
    /// A process consumed its last behaviour.
    Finished { pid: u32, time: u64 },
    /// The clock stopped; no live process remains.
    Shutdown { time: u64 },
    /// Header separating the trace from the usage report.
    ReportHeader,
    /// One row of the usage report.
    Report { pid: u32, total_cpu_usage: u64 },
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Event::Create { pid, time } => {
                write!(f, "CREATE:\tProcess {pid} entered the ready queue at time {time}.")
            }
            Event::Run { pid, level, time, remaining } => write!(
                f,
                "RUN:\tProcess {pid} started execution from level {} at time {time}; \
                 wants to execute for {remaining} ticks.",
                level + 1
            ),
            Event::Queued { pid, level, time } => {
                write!(f, "QUEUED:\tProcess {pid} queued at level {} at time {time}.", level + 1)
            }
            Event::Io { pid, time } => {
                write!(f, "I/O:\tProcess {pid} blocked for I/O at time {time}.")
            }
            Event::Finished { pid, time } => {
                write!(f, "FINISHED:\tProcess {pid} finished at time {time}.")
            }
            Event::Shutdown { time } => write!(f, "Scheduler shutdown at time {time}."),
            Event::ReportHeader => write!(f, "\nTotal CPU usage for all processes scheduled:\n"),
            Event::Report { pid, total_cpu_usage } => {
                if pid == NULL_PID {
                    write!(f, "Process <<null>> :\t{total_cpu_usage} time units.")
                } else {
                    write!(f, "Process {pid} :\t{total_cpu_usage} time units.")
                }
            }
        }
    }
}

/// Where the core sends its trace.
pub trait EventSink {
    fn emit(&mut self, event: Event) -> io::Result<()>;
}

/// Test sink: collect events for inspection.
impl EventSink for Vec<Event> {
    fn emit(&mut self, event: Event) -> io::Result<()> {
        self.push(event);
        Ok(())
    }
}

/// Production sink: render each event as one line of plain text.
pub struct WriteSink<W: Write> {
    out: W,
}

impl<W: Write> WriteSink<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Hand back the writer, e.g. to flush a buffered file.
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> EventSink for WriteSink<W> {
    fn emit(&mut self, event: Event) -> io::Result<()> {
        writeln!(self.out, "{event}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod formatting {
        use super::*;

        #[test]
        fn create_renders_with_tab_separator() {
            let event = Event::Create { pid: 3, time: 14 };
            assert_eq!(event.to_string(), "CREATE:\tProcess 3 entered the ready queue at time 14.");
        }

        #[test]
        fn run_displays_one_based_level_and_remaining_ticks() {
            let event = Event::Run { pid: 1, level: 0, time: 0, remaining: 5 };
            assert_eq!(
                event.to_string(),
                "RUN:\tProcess 1 started execution from level 1 at time 0; \
                 wants to execute for 5 ticks."
            );
        }

        #[test]
        fn queued_displays_one_based_level() {
            let event = Event::Queued { pid: 2, level: 1, time: 40 };
            assert_eq!(event.to_string(), "QUEUED:\tProcess 2 queued at level 2 at time 40.");
        }

        #[test]
        fn io_and_finished_render_pid_and_time() {
            assert_eq!(
                Event::Io { pid: 9, time: 50 }.to_string(),
                "I/O:\tProcess 9 blocked for I/O at time 50."
            );
            assert_eq!(
                Event::Finished { pid: 9, time: 61 }.to_string(),
                "FINISHED:\tProcess 9 finished at time 61."
            );
        }

        #[test]
        fn report_row_substitutes_null_marker_for_pid_zero() {
            let row = Event::Report { pid: 0, total_cpu_usage: 12 };
            assert_eq!(row.to_string(), "Process <<null>> :\t12 time units.");
            let row = Event::Report { pid: 4, total_cpu_usage: 7 };
            assert_eq!(row.to_string(), "Process 4 :\t7 time units.");
        }

        #[test]
        fn report_header_is_framed_by_blank_lines_when_written() {
            let mut sink = WriteSink::new(Vec::new());
            sink.emit(Event::Shutdown { time: 9 }).unwrap();
            sink.emit(Event::ReportHeader).unwrap();
            sink.emit(Event::Report { pid: 1, total_cpu_usage: 5 }).unwrap();
            let text = String::from_utf8(sink.into_inner()).unwrap();
            assert_eq!(
                text,
                "Scheduler shutdown at time 9.\n\
                 \nTotal CPU usage for all processes scheduled:\n\n\
                 Process 1 :\t5 time units.\n"
            );
        }
    }

    mod sinks {
        use super::*;

        #[test]
        fn vec_sink_records_events_in_emission_order() {
            let mut sink: Vec<Event> = Vec::new();
            sink.emit(Event::Create { pid: 1, time: 0 }).unwrap();
            sink.emit(Event::Finished { pid: 1, time: 8 }).unwrap();
            assert_eq!(
                sink,
                vec![Event::Create { pid: 1, time: 0 }, Event::Finished { pid: 1, time: 8 }]
            );
        }

        #[test]
        fn write_sink_emits_one_line_per_event() {
            let mut sink = WriteSink::new(Vec::new());
            sink.emit(Event::Create { pid: 1, time: 0 }).unwrap();
            sink.emit(Event::Io { pid: 1, time: 5 }).unwrap();
            let text = String::from_utf8(sink.into_inner()).unwrap();
            assert_eq!(text.lines().count(), 2);
        }
    }
}
