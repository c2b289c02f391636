use crate::row::Row;
use crate::row_set::RowSet;
use crate::strategy::IngestStrategy;

/// Outcome of comparing two row sources.
///
/// Row counts are the number of *unique* rows (after tolerant deduplication); the
/// physical non-empty line counts seen during strategy selection are kept alongside.
/// The order of the two difference lists is unspecified; call [`sort`](Self::sort)
/// before presenting them.
#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonResult {
    pub(crate) is_match: bool,
    pub(crate) left_row_count: usize,
    pub(crate) right_row_count: usize,
    pub(crate) left_line_count: u64,
    pub(crate) right_line_count: u64,
    pub(crate) strategy: IngestStrategy,
    pub(crate) only_in_left: Vec<Row>,
    pub(crate) only_in_right: Vec<Row>,
}

impl ComparisonResult {
    pub fn is_match(&self) -> bool {
        self.is_match
    }

    pub fn left_row_count(&self) -> usize {
        self.left_row_count
    }

    pub fn right_row_count(&self) -> usize {
        self.right_row_count
    }

    pub fn left_line_count(&self) -> u64 {
        self.left_line_count
    }

    pub fn right_line_count(&self) -> u64 {
        self.right_line_count
    }

    pub fn strategy(&self) -> IngestStrategy {
        self.strategy
    }

    pub fn only_in_left(&self) -> &[Row] {
        self.only_in_left.as_slice()
    }

    pub fn only_in_right(&self) -> &[Row] {
        self.only_in_right.as_slice()
    }

    /// Orders both difference lists by their fields.
    pub fn sort(&mut self) {
        self.only_in_left.sort_unstable();
        self.only_in_right.sort_unstable();
    }

    pub(crate) fn with_ingest_info(
        mut self,
        strategy: IngestStrategy,
        left_line_count: u64,
        right_line_count: u64,
    ) -> Self {
        self.strategy = strategy;
        self.left_line_count = left_line_count;
        self.right_line_count = right_line_count;
        self
    }
}

/// Computes the rows of `left` without an equal row in `right`, and vice versa.
pub fn difference(left: &RowSet, right: &RowSet) -> ComparisonResult {
    let only_in_left: Vec<Row> = left
        .iter()
        .filter(|row| !right.contains(row))
        .cloned()
        .collect();
    let only_in_right: Vec<Row> = right
        .iter()
        .filter(|row| !left.contains(row))
        .cloned()
        .collect();

    ComparisonResult {
        is_match: only_in_left.is_empty() && only_in_right.is_empty(),
        left_row_count: left.len(),
        right_row_count: right.len(),
        left_line_count: left.len() as u64,
        right_line_count: right.len() as u64,
        strategy: IngestStrategy::Sequential,
        only_in_left,
        only_in_right,
    }
}

#[cfg(test)]
mod tests {
    use super::difference;
    use crate::row::Row;
    use crate::row_set::RowSet;
    use pretty_assertions::assert_eq;

    fn set_of(rows: Vec<Vec<&str>>) -> RowSet {
        let mut set = RowSet::default();
        set.extend(rows.into_iter().map(Row::from));
        set
    }

    #[test]
    fn equal_sets_match() {
        let left = set_of(vec![vec!["A", "1.00001"], vec!["B", "2"]]);
        let right = set_of(vec![vec!["B", "2.00000"], vec!["A", "1.00009"]]);
        let result = difference(&left, &right);
        assert!(result.is_match());
        assert_eq!(result.left_row_count(), 2);
        assert_eq!(result.right_row_count(), 2);
        assert!(result.only_in_left().is_empty());
        assert!(result.only_in_right().is_empty());
    }

    #[test]
    fn one_sided_rows_are_reported() {
        let left = set_of(vec![vec!["A", "1.00001"], vec!["same"]]);
        let right = set_of(vec![vec!["A", "1.01"], vec!["same"], vec!["extra"]]);
        let mut result = difference(&left, &right);
        result.sort();
        assert!(!result.is_match());
        assert_eq!(result.only_in_left(), &[Row::from(vec!["A", "1.00001"])]);
        assert_eq!(
            result.only_in_right(),
            &[Row::from(vec!["A", "1.01"]), Row::from(vec!["extra"])]
        );
    }

    #[test]
    fn empty_sets_match() {
        let result = difference(&RowSet::default(), &RowSet::default());
        assert!(result.is_match());
        assert_eq!(result.left_row_count(), 0);
    }
}
