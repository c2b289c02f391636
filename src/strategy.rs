use std::fmt;
use std::io::{Read, Seek};

use crate::csv::Csv;
use crate::error::RowDiffError;

pub const DEFAULT_SEQUENTIAL_THRESHOLD: usize = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngestStrategy {
    /// Read, parse and insert each source in turn on the calling thread.
    Sequential,
    /// Reader lanes feeding a shared worker pool through bounded queues.
    Concurrent,
}

impl fmt::Display for IngestStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IngestStrategy::Sequential => f.write_str("sequential"),
            IngestStrategy::Concurrent => f.write_str("concurrent"),
        }
    }
}

/// Result of the line-count pre-pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IngestPlan {
    pub strategy: IngestStrategy,
    pub left_lines: u64,
    pub right_lines: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StrategySelector {
    threshold: usize,
}

impl Default for StrategySelector {
    fn default() -> Self {
        Self::new(DEFAULT_SEQUENTIAL_THRESHOLD)
    }
}

impl StrategySelector {
    pub fn new(threshold: usize) -> Self {
        Self { threshold }
    }

    /// Sequential only if *both* sources stay below the threshold.
    pub fn select(&self, left_lines: u64, right_lines: u64) -> IngestStrategy {
        let threshold = self.threshold as u64;
        if left_lines < threshold && right_lines < threshold {
            IngestStrategy::Sequential
        } else {
            IngestStrategy::Concurrent
        }
    }

    /// Counts the non-empty lines of both sources and picks a strategy. Both sources are
    /// read once here and rewound by the next pass.
    pub fn plan<R: Read + Seek>(
        &self,
        left: &mut Csv<R>,
        right: &mut Csv<R>,
    ) -> Result<IngestPlan, RowDiffError> {
        let left_lines = left.count_rows()?;
        let right_lines = right.count_rows()?;
        let strategy = self.select(left_lines, right_lines);
        tracing::debug!(left_lines, right_lines, %strategy, threshold = self.threshold, "selected ingest strategy");
        Ok(IngestPlan {
            strategy,
            left_lines,
            right_lines,
        })
    }
}
