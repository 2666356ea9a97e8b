//! Caller-facing strategy selector.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::SimulationError;

/// Execution strategy for the trial loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Strategy {
    /// Single-threaded baseline on the calling thread.
    Sequential,
    /// Fixed-size worker pool pulling chunks from a shared queue.
    DataParallel,
    /// Grain-sized tasks on a work-stealing scheduler.
    TaskParallel,
}

impl Strategy {
    /// All strategies, baseline first.
    pub const ALL: [Self; 3] = [Self::Sequential, Self::DataParallel, Self::TaskParallel];

    /// Human-readable name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Sequential => "Sequential",
            Self::DataParallel => "DataParallel",
            Self::TaskParallel => "TaskParallel",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Strategy {
    type Err = SimulationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace(['-', ' '], "_").as_str() {
            "sequential" => Ok(Self::Sequential),
            "data_parallel" | "dataparallel" | "openmp" => Ok(Self::DataParallel),
            "task_parallel" | "taskparallel" | "tbb" => Ok(Self::TaskParallel),
            other => Err(SimulationError::config(format!("unknown strategy '{other}'"))),
        }
    }
}
