use xxhash_rust::xxh3::xxh3_64_with_seed;

const ROW_SEED: u64 = 0x9e37_79b9_7f4a_7c15;
const FIELD_SEPARATOR: &[u8] = b"\x1f";

/// Folds already normalized fields into one row hash.
///
/// Every field hash is seeded with the hash so far and a separator hash is mixed in
/// between two fields, so both the order and the boundaries of fields matter.
#[inline]
pub(crate) fn hash_normalized_fields<I, S>(fields: I) -> u64
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut hash = ROW_SEED;
    for (idx, field) in fields.into_iter().enumerate() {
        if idx > 0 {
            hash = xxh3_64_with_seed(FIELD_SEPARATOR, hash);
        }
        hash = xxh3_64_with_seed(field.as_ref().as_bytes(), hash);
    }
    hash
}

#[cfg(test)]
mod tests {
    use super::hash_normalized_fields;

    #[test]
    fn same_fields_same_hash() {
        assert_eq!(
            hash_normalized_fields(["a", "1.0000"]),
            hash_normalized_fields(vec!["a".to_string(), "1.0000".to_string()])
        );
    }

    #[test]
    fn concatenation_does_not_collide() {
        assert_ne!(
            hash_normalized_fields(["ab", "cd"]),
            hash_normalized_fields(["abc", "d"])
        );
        assert_ne!(
            hash_normalized_fields(["a\x1fb"]),
            hash_normalized_fields(["a", "b"])
        );
    }
}
