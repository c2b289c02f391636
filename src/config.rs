use std::time::Duration;

use crate::csv_row_codec::{CsvRowCodec, DEFAULT_DELIMITER, DEFAULT_QUOTE};
use crate::error::RowDiffError;
use crate::strategy::DEFAULT_SEQUENTIAL_THRESHOLD;
use crate::value_equivalence::{ValueEquivalence, DEFAULT_DECIMAL_DIGITS, MAX_DECIMAL_DIGITS};

pub const DEFAULT_QUEUE_CAPACITY: usize = 10_000;
pub const DEFAULT_BACKOFF: Duration = Duration::from_micros(100);
pub const MIN_WORKER_THREADS: usize = 2;

/// Everything the comparison core can be tuned with.
#[derive(Debug, Clone, PartialEq)]
pub struct DiffConfig {
    pub delimiter: char,
    pub quote: char,
    pub decimal_digits: u32,
    pub sequential_threshold: usize,
    pub queue_capacity: usize,
    pub worker_threads: usize,
    pub backoff: Duration,
}

impl Default for DiffConfig {
    fn default() -> Self {
        Self {
            delimiter: DEFAULT_DELIMITER,
            quote: DEFAULT_QUOTE,
            decimal_digits: DEFAULT_DECIMAL_DIGITS,
            sequential_threshold: DEFAULT_SEQUENTIAL_THRESHOLD,
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            worker_threads: default_worker_threads(),
            backoff: DEFAULT_BACKOFF,
        }
    }
}

impl DiffConfig {
    pub fn validate(&self) -> Result<(), RowDiffError> {
        if !self.delimiter.is_ascii() || !self.quote.is_ascii() {
            return Err(RowDiffError::InvalidConfig(
                "delimiter and quote must be ASCII characters".to_string(),
            ));
        }
        if self.delimiter == self.quote {
            return Err(RowDiffError::InvalidConfig(format!(
                "delimiter and quote are both `{}`",
                self.delimiter
            )));
        }
        if self.decimal_digits > MAX_DECIMAL_DIGITS {
            return Err(RowDiffError::InvalidConfig(format!(
                "at most {} decimal digits are supported, got {}",
                MAX_DECIMAL_DIGITS, self.decimal_digits
            )));
        }
        if self.queue_capacity == 0 {
            return Err(RowDiffError::InvalidConfig(
                "queue capacity must be at least 1".to_string(),
            ));
        }
        if self.worker_threads < MIN_WORKER_THREADS {
            return Err(RowDiffError::InvalidConfig(format!(
                "at least {} worker threads are required, got {}",
                MIN_WORKER_THREADS, self.worker_threads
            )));
        }
        Ok(())
    }

    pub fn codec(&self) -> CsvRowCodec {
        CsvRowCodec::new(self.delimiter, self.quote)
    }

    pub fn equivalence(&self) -> ValueEquivalence {
        ValueEquivalence::with_decimal_digits(self.decimal_digits)
    }
}

/// Available parallelism minus two (one per reader lane), but never less than two.
pub fn default_worker_threads() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
        .saturating_sub(2)
        .max(MIN_WORKER_THREADS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn defaults_are_valid() {
        let config = DiffConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.queue_capacity, 10_000);
        assert_eq!(config.sequential_threshold, 1000);
        assert_eq!(config.decimal_digits, 4);
        assert!(config.worker_threads >= 2);
    }

    #[test]
    fn rejects_bad_values() {
        let bad = [
            DiffConfig {
                quote: ',',
                ..DiffConfig::default()
            },
            DiffConfig {
                delimiter: '§',
                ..DiffConfig::default()
            },
            DiffConfig {
                decimal_digits: 16,
                ..DiffConfig::default()
            },
            DiffConfig {
                queue_capacity: 0,
                ..DiffConfig::default()
            },
            DiffConfig {
                worker_threads: 1,
                ..DiffConfig::default()
            },
        ];
        for config in bad.iter() {
            assert!(
                matches!(config.validate(), Err(RowDiffError::InvalidConfig(_))),
                "{:?} should be rejected",
                config
            );
        }
    }
}
