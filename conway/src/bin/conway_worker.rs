//! Worker process for the isolated execution strategy.
//!
//! Reads JSON requests from stdin, one per line, and answers each on stdout.
//! Spawned by `IsolatedWorkerPool`; not meant to be run by hand.

use std::io;
use std::process;

fn main() {
    let stdin = io::stdin().lock();
    let stdout = io::stdout().lock();
    if let Err(e) = conway::worker::serve(stdin, stdout) {
        eprintln!("conway-worker: {e}");
        process::exit(1);
    }
}
