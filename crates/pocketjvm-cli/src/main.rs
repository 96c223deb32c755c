//! `pocketjvm <class-file>`: loads a single compiled class, locates
//! `main`, and runs it.

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use pocketjvm_classfile::ClassFile;
use pocketjvm_vm::{engine, Heap, VmError};

#[derive(Parser)]
#[command(name = "pocketjvm", about = "Runs the main method of a single compiled class")]
struct Cli {
    /// Path to the class file to run.
    class_file: PathBuf,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    // `try_parse` rather than `parse` so a usage error can be reported
    // through this program's own exit-code contract (always 1) instead of
    // clap's default (2).
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            eprintln!("{err}");
            return ExitCode::from(1);
        }
    };

    match run(&cli.class_file) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("pocketjvm: {err}");
            // 101 is Rust's own abort code for an unrecoverable condition,
            // used here for every fatal path — I/O, malformed class, or a
            // runtime invariant violation — so the contract is one code,
            // not one per failure source.
            ExitCode::from(101)
        }
    }
}

fn run(path: &PathBuf) -> Result<(), VmError> {
    let class = ClassFile::load(path)?;
    let mut heap = Heap::new();
    let mut stdout = io::stdout();
    engine::run_main(&class, &mut heap, &mut stdout)
}
