//! Worker side of the isolated-process strategy.
//!
//! The protocol is line-delimited JSON. The coordinator writes one
//! [`WorkerRequest`] per line to the worker's stdin; the worker answers each
//! with exactly one [`WorkerResponse`] line on stdout and exits at EOF.
//!
//! ```text
//! -> {"type":"Evaluate","snapshot":{"width":3,"height":3,"cells":[...]},"coordinates":[[0,0],[1,0]]}
//! <- {"type":"Evaluated","outcomes":[[0,0,false],[1,0,true]]}
//! ```

use std::borrow::Cow;
use std::io::{BufRead, Write};

use serde::{Deserialize, Serialize};

use crate::error::WorkerError;
use crate::grid::{Coord, Grid};
use crate::rules::next_state;

/// `(x, y, alive)` for one evaluated cell.
pub type CellOutcome = (usize, usize, bool);

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum WorkerRequest<'a> {
    /// Evaluate `coordinates` against `snapshot`, answering in the same order.
    Evaluate {
        snapshot: Cow<'a, Grid>,
        coordinates: Cow<'a, [Coord]>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum WorkerResponse {
    Evaluated { outcomes: Vec<CellOutcome> },
    Error { message: String },
}

/// Evaluates one request.
pub fn handle(request: &WorkerRequest<'_>) -> WorkerResponse {
    match request {
        WorkerRequest::Evaluate { snapshot, coordinates } => {
            let mut outcomes = Vec::with_capacity(coordinates.len());
            for &(x, y) in coordinates.iter() {
                if !snapshot.contains((x, y)) {
                    return WorkerResponse::Error {
                        message: format!(
                            "cell ({x}, {y}) is outside the {}x{} grid",
                            snapshot.width(),
                            snapshot.height()
                        ),
                    };
                }
                outcomes.push((x, y, next_state(snapshot, (x, y))));
            }
            WorkerResponse::Evaluated { outcomes }
        }
    }
}

/// Serves requests from `input` until EOF. Returns how many were answered.
///
/// A line that does not parse gets an `Error` response; only I/O failures
/// stop the loop.
pub fn serve<R: BufRead, W: Write>(input: R, mut output: W) -> Result<usize, WorkerError> {
    let mut served = 0;
    for line in input.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let response = match serde_json::from_str::<WorkerRequest<'static>>(&line) {
            Ok(request) => handle(&request),
            Err(e) => WorkerResponse::Error {
                message: format!("malformed request: {e}"),
            },
        };
        serde_json::to_writer(&mut output, &response)?;
        output.write_all(b"\n")?;
        output.flush()?;
        served += 1;
    }
    Ok(served)
}
