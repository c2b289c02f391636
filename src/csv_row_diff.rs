use std::io::{Read, Seek};
use std::time::Duration;

use crate::config::DiffConfig;
use crate::csv::Csv;
use crate::csv_ingest_pipeline::{ingest_concurrent, load_sequential, READER_LANES};
use crate::diff_result::{difference, ComparisonResult};
use crate::error::RowDiffError;
use crate::row::Row;
use crate::row_set::RowSet;
use crate::strategy::{IngestStrategy, StrategySelector};
#[cfg(any(feature = "rayon-threads", feature = "crossbeam-utils"))]
use crate::thread_scope_strategy::DefaultScope;
use crate::thread_scope_strategy::ThreadScoper;

/// Compare two [CSVs](https://en.wikipedia.org/wiki/Comma-separated_values) as sets of rows.
///
/// Rows are matched as a whole, with numeric fields compared up to a fixed number of
/// decimal places (four by default). Duplicate rows within one source collapse into
/// one. Small inputs are loaded sequentially, larger ones through a pool of worker
/// threads; both paths produce the same result.
///
/// # Example: compare two CSVs that differ only beyond the fourth decimal place
#[cfg_attr(
    feature = "rayon-threads",
    doc = r##"
```
use csv_tolerant_diff::{csv::Csv, csv_row_diff::CsvRowDiff};
# fn main() -> Result<(), Box<dyn std::error::Error>> {
let csv_data_left = "id,price\n\
                     1,9.99999\n\
                     2,3.14159265";
let csv_data_right = "id,price\n\
                      2,3.14159999\n\
                      1,10.0";

let csv_row_diff = CsvRowDiff::new()?;

let result = csv_row_diff.diff(
    Csv::with_reader_seek(csv_data_left.as_bytes()),
    Csv::with_reader_seek(csv_data_right.as_bytes()),
)?;

assert!(result.is_match());
assert_eq!(result.left_row_count(), 3);
Ok(())
# }
```
"##
)]
#[derive(Debug)]
pub struct CsvRowDiff<T: ThreadScoper> {
    config: DiffConfig,
    thread_scoper: T,
}

/// Create a [`CsvRowDiff`](CsvRowDiff) with configuration options.
///
/// # Example: semicolon separated data compared to two decimal places
#[cfg_attr(
    feature = "rayon-threads",
    doc = r##"
```
use csv_tolerant_diff::{csv::Csv, csv_row_diff::CsvRowDiffBuilder, row::Row};
# fn main() -> Result<(), Box<dyn std::error::Error>> {
let csv_row_diff = CsvRowDiffBuilder::new()
    .delimiter(';')
    .decimal_digits(2)
    .build()?;

let mut result = csv_row_diff.diff(
    Csv::with_reader_seek("a;1.001\nb;2.5"),
    Csv::with_reader_seek("a;1.004\nb;2.6"),
)?;
result.sort();

assert!(!result.is_match());
assert_eq!(result.only_in_left(), &[Row::from(vec!["b", "2.5"])]);
assert_eq!(result.only_in_right(), &[Row::from(vec!["b", "2.6"])]);
Ok(())
# }
```
"##
)]
#[derive(Debug, Clone, Default)]
pub struct CsvRowDiffBuilder {
    config: DiffConfig,
}

impl CsvRowDiffBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: DiffConfig) -> Self {
        Self { config }
    }

    pub fn delimiter(mut self, delimiter: char) -> Self {
        self.config.delimiter = delimiter;
        self
    }

    pub fn quote(mut self, quote: char) -> Self {
        self.config.quote = quote;
        self
    }

    pub fn decimal_digits(mut self, decimal_digits: u32) -> Self {
        self.config.decimal_digits = decimal_digits;
        self
    }

    /// Sources with at least this many non-empty lines are loaded concurrently.
    /// `0` always selects the concurrent path, `usize::MAX` never does.
    pub fn sequential_threshold(mut self, rows: usize) -> Self {
        self.config.sequential_threshold = rows;
        self
    }

    pub fn queue_capacity(mut self, capacity: usize) -> Self {
        self.config.queue_capacity = capacity;
        self
    }

    pub fn worker_threads(mut self, workers: usize) -> Self {
        self.config.worker_threads = workers;
        self
    }

    pub fn backoff(mut self, backoff: Duration) -> Self {
        self.config.backoff = backoff;
        self
    }

    pub fn config(&self) -> &DiffConfig {
        &self.config
    }

    /// Builds with a caller supplied [`ThreadScoper`]. It must be able to run
    /// `worker_threads + 2` tasks at once.
    pub fn build_with_scoper<T: ThreadScoper>(
        self,
        thread_scoper: T,
    ) -> Result<CsvRowDiff<T>, RowDiffError> {
        self.config.validate()?;
        Ok(CsvRowDiff {
            config: self.config,
            thread_scoper,
        })
    }

    #[cfg(any(feature = "rayon-threads", feature = "crossbeam-utils"))]
    pub fn build(self) -> Result<CsvRowDiff<DefaultScope>, RowDiffError> {
        self.config.validate()?;
        let thread_scoper = DefaultScope::for_threads(self.config.worker_threads + READER_LANES)?;
        self.build_with_scoper(thread_scoper)
    }
}

#[cfg(any(feature = "rayon-threads", feature = "crossbeam-utils"))]
impl CsvRowDiff<DefaultScope> {
    /// Constructs a new `CsvRowDiff` with the default configuration: comma separated,
    /// double-quoted, four decimal places, concurrent from 1000 lines on.
    ///
    /// If you need more control, consider using a [`CsvRowDiffBuilder`](CsvRowDiffBuilder)
    /// instead.
    pub fn new() -> Result<Self, RowDiffError> {
        CsvRowDiffBuilder::new().build()
    }
}

impl<T> CsvRowDiff<T>
where
    T: ThreadScoper,
{
    pub fn config(&self) -> &DiffConfig {
        &self.config
    }

    /// Compares `csv_left` with `csv_right`.
    ///
    /// Both sources are read once to count their lines and once more to load them. Any
    /// read failure aborts the comparison; no partial result is ever returned.
    pub fn diff<R: Read + Seek + Send>(
        &self,
        mut csv_left: Csv<R>,
        mut csv_right: Csv<R>,
    ) -> Result<ComparisonResult, RowDiffError> {
        let _span = tracing::info_span!("diff", left = %csv_left.name(), right = %csv_right.name())
            .entered();

        let plan = StrategySelector::new(self.config.sequential_threshold)
            .plan(&mut csv_left, &mut csv_right)?;

        let (rows_left, rows_right) = match plan.strategy {
            IngestStrategy::Sequential => {
                let codec = self.config.codec();
                let equivalence = self.config.equivalence();
                (
                    load_sequential(&mut csv_left, &codec, equivalence)?,
                    load_sequential(&mut csv_right, &codec, equivalence)?,
                )
            }
            IngestStrategy::Concurrent => ingest_concurrent(
                &self.thread_scoper,
                &self.config,
                &mut csv_left,
                &mut csv_right,
            )?,
        };

        let result = difference(&rows_left, &rows_right).with_ingest_info(
            plan.strategy,
            plan.left_lines,
            plan.right_lines,
        );
        tracing::info!(
            is_match = result.is_match(),
            left_rows = result.left_row_count(),
            right_rows = result.right_row_count(),
            only_in_left = result.only_in_left().len(),
            only_in_right = result.only_in_right().len(),
            "comparison finished"
        );
        Ok(result)
    }

    /// Compares rows that were produced elsewhere, e.g. from spreadsheet cells.
    pub fn diff_rows<IL, IR>(&self, rows_left: IL, rows_right: IR) -> ComparisonResult
    where
        IL: IntoIterator<Item = Row>,
        IR: IntoIterator<Item = Row>,
    {
        let equivalence = self.config.equivalence();
        let mut left = RowSet::new(equivalence);
        let mut physical_left = 0;
        for row in rows_left {
            physical_left += 1;
            left.insert(row);
        }
        let mut right = RowSet::new(equivalence);
        let mut physical_right = 0;
        for row in rows_right {
            physical_right += 1;
            right.insert(row);
        }
        difference(&left, &right).with_ingest_info(
            IngestStrategy::Sequential,
            physical_left,
            physical_right,
        )
    }
}

#[cfg(all(test, feature = "rayon-threads"))]
mod tests {

    use super::*;
    use pretty_assertions::assert_eq;
    use std::error::Error;

    fn diff_both_paths(
        csv_left: &str,
        csv_right: &str,
    ) -> Result<(ComparisonResult, ComparisonResult), Box<dyn Error>> {
        let mut sequential = CsvRowDiffBuilder::new()
            .sequential_threshold(usize::MAX)
            .build()?
            .diff(
                Csv::with_reader_seek(csv_left.as_bytes()),
                Csv::with_reader_seek(csv_right.as_bytes()),
            )?;
        let mut concurrent = CsvRowDiffBuilder::new()
            .sequential_threshold(0)
            .worker_threads(2)
            .build()?
            .diff(
                Csv::with_reader_seek(csv_left.as_bytes()),
                Csv::with_reader_seek(csv_right.as_bytes()),
            )?;
        assert_eq!(sequential.strategy(), IngestStrategy::Sequential);
        assert_eq!(concurrent.strategy(), IngestStrategy::Concurrent);
        sequential.sort();
        concurrent.sort();
        Ok((sequential, concurrent))
    }

    #[test]
    fn diff_empty_no_diff() -> Result<(), Box<dyn Error>> {
        let (sequential, concurrent) = diff_both_paths("", "")?;
        for result in [sequential, concurrent].iter() {
            assert!(result.is_match());
            assert_eq!(result.left_row_count(), 0);
            assert_eq!(result.right_row_count(), 0);
        }
        Ok(())
    }

    #[test]
    fn diff_tolerant_numbers_match() -> Result<(), Box<dyn Error>> {
        let (sequential, concurrent) = diff_both_paths("A,1.00001", "A,1.00009")?;
        assert!(sequential.is_match());
        assert!(concurrent.is_match());
        Ok(())
    }

    #[test]
    fn diff_numbers_beyond_tolerance_differ() -> Result<(), Box<dyn Error>> {
        let (sequential, concurrent) = diff_both_paths("A,1.00001", "A,1.01")?;
        assert!(!sequential.is_match());
        assert_eq!(sequential.only_in_left(), &[Row::from(vec!["A", "1.00001"])]);
        assert_eq!(sequential.only_in_right(), &[Row::from(vec!["A", "1.01"])]);
        assert_eq!(
            (sequential.only_in_left(), sequential.only_in_right()),
            (concurrent.only_in_left(), concurrent.only_in_right())
        );
        Ok(())
    }

    #[test]
    fn diff_duplicates_collapse() -> Result<(), Box<dyn Error>> {
        let (sequential, concurrent) = diff_both_paths("x,1\nx,1\n", "x,1")?;
        for result in [sequential, concurrent].iter() {
            assert!(result.is_match());
            assert_eq!(result.left_row_count(), 1);
            assert_eq!(result.left_line_count(), 2);
        }
        Ok(())
    }

    #[test]
    fn diff_order_independent() -> Result<(), Box<dyn Error>> {
        let (sequential, concurrent) =
            diff_both_paths("h1,h2\na,1\nb,2\nc,3", "h1,h2\nc,3\na,1\nb,2")?;
        assert!(sequential.is_match());
        assert!(concurrent.is_match());
        Ok(())
    }

    #[test]
    fn diff_arity_mismatch_differs() -> Result<(), Box<dyn Error>> {
        let (sequential, _) = diff_both_paths("a,b", "a,b,")?;
        assert!(!sequential.is_match());
        assert_eq!(sequential.only_in_right(), &[Row::from(vec!["a", "b", ""])]);
        Ok(())
    }

    #[test]
    fn diff_rows_from_cells() -> Result<(), Box<dyn Error>> {
        let csv_row_diff = CsvRowDiff::new()?;
        let result = csv_row_diff.diff_rows(
            vec![Row::from(vec!["a", "1.5"]), Row::from(vec!["a", "1.5"])],
            vec![Row::from(vec!["a", "1.50001"])],
        );
        assert!(result.is_match());
        assert_eq!(result.left_line_count(), 2);
        assert_eq!(result.left_row_count(), 1);
        Ok(())
    }

    #[test]
    fn build_rejects_invalid_config() {
        assert!(matches!(
            CsvRowDiffBuilder::new().quote(',').build(),
            Err(RowDiffError::InvalidConfig(_))
        ));
        assert!(matches!(
            CsvRowDiffBuilder::new().worker_threads(0).build(),
            Err(RowDiffError::InvalidConfig(_))
        ));
    }

    #[test]
    fn unreadable_source_fails_before_ingestion() {
        let csv_row_diff = CsvRowDiff::new().unwrap();
        let result = csv_row_diff.diff(
            Csv::with_reader_seek(vec![0xffu8, 0xfe, b'\n']),
            Csv::with_reader_seek(b"a\n".to_vec()),
        );
        assert!(matches!(
            result,
            Err(RowDiffError::SourceUnavailable { .. })
        ));
    }
}
