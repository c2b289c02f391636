use ahash::AHashMap as HashMap;

use crate::row::Row;
use crate::value_equivalence::ValueEquivalence;

type Bucket = smallvec::SmallVec<[Row; 1]>;

/// A set of rows under tolerant row equality.
///
/// Rows are bucketed by [`ValueEquivalence::row_hash`] and resolved inside a bucket
/// with [`ValueEquivalence::rows_equal`], so a hash collision can neither merge two
/// different rows nor split two equal ones.
#[derive(Debug, Clone)]
pub struct RowSet {
    buckets: HashMap<u64, Bucket>,
    len: usize,
    equivalence: ValueEquivalence,
}

impl Default for RowSet {
    fn default() -> Self {
        Self::new(ValueEquivalence::default())
    }
}

impl RowSet {
    pub fn new(equivalence: ValueEquivalence) -> Self {
        Self::with_capacity(equivalence, 0)
    }

    pub fn with_capacity(equivalence: ValueEquivalence, capacity: usize) -> Self {
        Self {
            buckets: HashMap::with_capacity(capacity),
            len: 0,
            equivalence,
        }
    }

    /// Inserts `row` unless an equal row is already present. Returns `true` if the
    /// row was new.
    pub fn insert(&mut self, row: Row) -> bool {
        let hash = self.equivalence.row_hash(&row);
        let equivalence = self.equivalence;
        let bucket = self.buckets.entry(hash).or_default();
        if bucket
            .iter()
            .any(|present| equivalence.rows_equal(present, &row))
        {
            return false;
        }
        bucket.push(row);
        self.len += 1;
        true
    }

    pub fn contains(&self, row: &Row) -> bool {
        self.get(row).is_some()
    }

    /// Returns the stored row equal to `row`, if any.
    pub fn get(&self, row: &Row) -> Option<&Row> {
        self.buckets
            .get(&self.equivalence.row_hash(row))
            .and_then(|bucket| {
                bucket
                    .iter()
                    .find(|present| self.equivalence.rows_equal(present, row))
            })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = &Row> + '_ {
        self.buckets.values().flat_map(|bucket| bucket.iter())
    }
}

impl Extend<Row> for RowSet {
    fn extend<I: IntoIterator<Item = Row>>(&mut self, iter: I) {
        for row in iter {
            self.insert(row);
        }
    }
}
