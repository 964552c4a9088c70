use std::{
    fmt,
    io::{self, Write},
};

use reqwest::StatusCode;
use thiserror::Error;

use crate::{
    client::{NodeId, NodeSink},
    tracing::*,
};

/// Every this many node ids a progress line is printed.
pub const PROGRESS_INTERVAL: NodeId = 10_000;

#[derive(Debug, Error)]
pub enum FillError {
    #[error("unexpected status {} for node {id}", .status.as_u16())]
    UnexpectedStatus { id: NodeId, status: StatusCode },
    #[error("request for node {id} failed")]
    Transport {
        id: NodeId,
        #[source]
        source: reqwest::Error,
    },
    #[error("writing progress for node {id} failed")]
    Progress {
        id: NodeId,
        #[source]
        source: io::Error,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Accepted,
    Exhausted,
    Unexpected(StatusCode),
}

impl From<StatusCode> for Outcome {
    fn from(status: StatusCode) -> Self {
        match status {
            StatusCode::OK => Outcome::Accepted,
            StatusCode::INSUFFICIENT_STORAGE => Outcome::Exhausted,
            other => Outcome::Unexpected(other),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FillReport {
    /// Number of accepted nodes, which is also the id that got the 507.
    pub accepted: u64,
}

impl FillReport {
    pub fn last_accepted(&self) -> Option<NodeId> {
        self.accepted.checked_sub(1)
    }
}

impl fmt::Display for FillReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // -1 when the very first node was rejected.
        let last = i128::from(self.accepted) - 1;
        write!(f, "Server log fill up to {last}")
    }
}

pub struct Filler<S, W = io::Stdout> {
    sink: S,
    interval: NodeId,
    progress: W,
}

impl<S: NodeSink> Filler<S> {
    pub fn new(sink: S) -> Self {
        Filler {
            sink,
            interval: PROGRESS_INTERVAL,
            progress: io::stdout(),
        }
    }
}

impl<S: NodeSink, W: Write> Filler<S, W> {
    pub fn with_progress<P: Write>(self, interval: NodeId, progress: P) -> Filler<S, P> {
        Filler {
            sink: self.sink,
            interval: interval.max(1),
            progress,
        }
    }

    /// Adds nodes 0, 1, 2, ... until the server answers 507.
    pub fn run(&mut self) -> Result<FillReport, FillError> {
        let mut id: NodeId = 0;
        loop {
            if id % self.interval == 0 {
                self.report_progress(id)
                    .map_err(|source| FillError::Progress { id, source })?;
            }

            let status = self
                .sink
                .add_node(id)
                .map_err(|source| FillError::Transport { id, source })?;

            match Outcome::from(status) {
                Outcome::Accepted => id += 1,
                Outcome::Exhausted => {
                    trace!(TraceLevel::INFO, node_id = id, "server out of space");
                    return Ok(FillReport { accepted: id });
                }
                Outcome::Unexpected(status) => {
                    trace!(
                        TraceLevel::ERROR,
                        node_id = id,
                        status = status.as_u16(),
                        "unexpected status"
                    );
                    return Err(FillError::UnexpectedStatus { id, status });
                }
            }
        }
    }

    pub fn into_inner(self) -> (S, W) {
        (self.sink, self.progress)
    }

    fn report_progress(&mut self, id: NodeId) -> io::Result<()> {
        let target = self.sink.target();
        trace!(TraceLevel::INFO, node_id = id, endpoint = %target, "progress");
        writeln!(self.progress, "add_node {target} {id}")?;
        self.progress.flush()
    }
}

pub fn fill<S: NodeSink>(sink: S) -> Result<FillReport, FillError> {
    Filler::new(sink).run()
}
