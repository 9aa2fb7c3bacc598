use std::fmt;

use donation::DivisionRequest;

/// Declarative instruction emitted by the reducer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Schedule background work.
    Async(TaskKind),
    /// Record a line in the log (info level).
    Log(String),
}

impl Effect {
    pub fn log<T: Into<String>>(msg: T) -> Self {
        Effect::Log(msg.into())
    }

    pub fn async_task(kind: TaskKind) -> Self {
        Effect::Async(kind)
    }
}

/// Background work the executor knows how to run. Each variant carries all
/// of its input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskKind {
    FetchRegions,
    FetchDivisions(DivisionRequest),
}

impl fmt::Display for TaskKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskKind::FetchRegions => write!(f, "FetchRegions"),
            TaskKind::FetchDivisions(req) => {
                write!(f, "FetchDivisions(uf={}, gen={})", req.region, req.generation)
            }
        }
    }
}
