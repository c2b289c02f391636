use std::path::PathBuf;

use clap::Parser;

use csv_tolerant_diff::config::{default_worker_threads, DiffConfig, DEFAULT_QUEUE_CAPACITY};
use csv_tolerant_diff::strategy::DEFAULT_SEQUENTIAL_THRESHOLD;

/// Compare two delimited files as sets of rows.
///
/// Row order does not matter and numeric fields are equal when they agree to the
/// configured number of decimal places.
#[derive(Parser, Debug)]
#[command(name = "csv-tolerant-diff", version)]
pub struct Args {
    /// First file
    pub file1: PathBuf,

    /// Second file
    pub file2: PathBuf,

    /// Field delimiter
    #[arg(short, long, default_value_t = ',', env = "CSV_TOLERANT_DIFF_DELIMITER")]
    pub delimiter: char,

    /// Quote character
    #[arg(long, default_value_t = '"', env = "CSV_TOLERANT_DIFF_QUOTE")]
    pub quote: char,

    /// Decimal places numeric fields have to agree on
    #[arg(long, default_value_t = 4, env = "CSV_TOLERANT_DIFF_DECIMAL_DIGITS")]
    pub decimal_digits: u32,

    /// Files with fewer non-empty lines than this are compared on a single thread
    #[arg(long, default_value_t = DEFAULT_SEQUENTIAL_THRESHOLD, env = "CSV_TOLERANT_DIFF_THRESHOLD")]
    pub threshold: usize,

    /// Capacity of each reader queue in the concurrent path
    #[arg(long, default_value_t = DEFAULT_QUEUE_CAPACITY, env = "CSV_TOLERANT_DIFF_QUEUE_CAPACITY")]
    pub queue_capacity: usize,

    /// Number of worker threads in the concurrent path (default: cores - 2, at least 2)
    #[arg(long, env = "CSV_TOLERANT_DIFF_WORKERS")]
    pub workers: Option<usize>,

    /// Directory receiving only_in_file1.csv and only_in_file2.csv
    #[arg(short, long, default_value = ".", env = "CSV_TOLERANT_DIFF_OUTPUT_DIR")]
    pub output_dir: PathBuf,

    /// Only print the summary, never touch the output files
    #[arg(long)]
    pub no_write: bool,

    /// More logging (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Errors only
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

impl Args {
    pub fn diff_config(&self) -> DiffConfig {
        DiffConfig {
            delimiter: self.delimiter,
            quote: self.quote,
            decimal_digits: self.decimal_digits,
            sequential_threshold: self.threshold,
            queue_capacity: self.queue_capacity,
            worker_threads: self.workers.unwrap_or_else(default_worker_threads),
            backoff: DiffConfig::default().backoff,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Args;
    use clap::{CommandFactory, Parser};
    use pretty_assertions::assert_eq;

    #[test]
    fn command_is_well_formed() {
        Args::command().debug_assert();
    }

    #[test]
    fn flags_map_onto_config() {
        let args = Args::parse_from([
            "csv-tolerant-diff",
            "a.csv",
            "b.csv",
            "--delimiter",
            ";",
            "--decimal-digits",
            "2",
            "--threshold",
            "0",
            "--workers",
            "3",
        ]);
        let config = args.diff_config();
        assert_eq!(config.delimiter, ';');
        assert_eq!(config.quote, '"');
        assert_eq!(config.decimal_digits, 2);
        assert_eq!(config.sequential_threshold, 0);
        assert_eq!(config.worker_threads, 3);
        assert_eq!(config.queue_capacity, 10_000);
    }
}
