use std::fmt;

pub(crate) const STACK_SIZE_FIELDS: usize = 8;
pub(crate) type StackVec<T> = smallvec::SmallVec<[T; STACK_SIZE_FIELDS]>;

/// One physical record, split into its positional fields.
///
/// Equality, hashing and ordering on `Row` itself are exact (byte-wise); tolerant
/// comparison of numeric fields is done through
/// [`ValueEquivalence`](crate::value_equivalence::ValueEquivalence).
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Row {
    fields: StackVec<String>,
}

impl Row {
    pub fn new<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            fields: fields.into_iter().map(Into::into).collect(),
        }
    }

    pub(crate) fn from_stack_vec(fields: StackVec<String>) -> Self {
        Self { fields }
    }

    #[inline]
    pub fn fields(&self) -> &[String] {
        self.fields.as_slice()
    }

    #[inline]
    pub fn get(&self, idx: usize) -> Option<&str> {
        self.fields.get(idx).map(String::as_str)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> core::slice::Iter<'_, String> {
        self.fields.iter()
    }

    pub fn into_fields(self) -> Vec<String> {
        self.fields.into_vec()
    }
}

impl<S: Into<String>> FromIterator<S> for Row {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::new(iter)
    }
}

impl From<Vec<&str>> for Row {
    fn from(fields: Vec<&str>) -> Self {
        Self::new(fields)
    }
}

impl From<Vec<String>> for Row {
    fn from(fields: Vec<String>) -> Self {
        Self::new(fields)
    }
}

impl<'a> IntoIterator for &'a Row {
    type Item = &'a String;
    type IntoIter = core::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Renders as `["a", "b"]`.
impl fmt::Display for Row {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (idx, field) in self.fields.iter().enumerate() {
            if idx > 0 {
                f.write_str(", ")?;
            }
            write!(f, "\"{}\"", field)?;
        }
        f.write_str("]")
    }
}
