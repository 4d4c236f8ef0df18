use std::error::Error;
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use mlfq_scheduler::{parse_workload, Process, Scheduler, WriteSink};

#[derive(Parser)]
#[command(name = "mlfq-scheduler", about = "Simulate a workload under a three-level feedback queue scheduler")]
struct Args {
    /// Workload description file; read from stdin when omitted.
    input: Option<PathBuf>,

    /// Trace and report destination; written to stdout when omitted.
    output: Option<PathBuf>,
}

fn main() -> ExitCode {
    let args = Args::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("mlfq-scheduler: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<(), Box<dyn Error>> {
    let workload = match &args.input {
        Some(path) => {
            let file = File::open(path)
                .map_err(|err| format!("cannot open {}: {err}", path.display()))?;
            parse_workload(BufReader::new(file))?
        }
        None => parse_workload(io::stdin().lock())?,
    };

    match &args.output {
        Some(path) => {
            let file = File::create(path)
                .map_err(|err| format!("cannot create {}: {err}", path.display()))?;
            let mut out = BufWriter::new(file);
            simulate(workload, &mut out)?;
            out.flush()?;
        }
        None => {
            let stdout = io::stdout();
            simulate(workload, &mut stdout.lock())?;
        }
    }
    Ok(())
}

fn simulate(workload: Vec<Process>, out: &mut dyn Write) -> io::Result<()> {
    let mut scheduler = Scheduler::new(workload, WriteSink::new(out));
    scheduler.run_to_completion()
}
