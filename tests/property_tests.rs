use csv_tolerant_diff::{
    csv_row_codec::CsvRowCodec, diff_result::difference, row::Row, row_set::RowSet,
    value_equivalence::ValueEquivalence,
};
use proptest::prelude::*;

fn field() -> impl Strategy<Value = String> {
    prop_oneof![
        (-1e9f64..1e9f64).prop_map(|value| format!("{:.8}", value)),
        (-1000i64..1000).prop_map(|value| value.to_string()),
        "[a-zA-Z][a-zA-Z0-9 _-]{0,12}[a-zA-Z0-9]",
    ]
}

/// `units * 10^-digits` written out in decimal, followed by one extra digit below the
/// tolerance.
fn tolerant_number(units: i64, digits: u32, extra_digit: u32) -> String {
    let sign = if units < 0 { "-" } else { "" };
    let magnitude = units.unsigned_abs().to_string();
    let digits = digits as usize;
    let padded = format!("{:0>width$}", magnitude, width = digits + 1);
    let (int_part, frac_part) = padded.split_at(padded.len() - digits);
    format!("{}{}.{}{}", sign, int_part, frac_part, extra_digit)
}

fn row() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(field(), 1..6)
}

proptest! {
    #[test]
    fn normalize_is_idempotent(value in -1e6f64..1e6f64, digits in 0u32..=6) {
        let eq = ValueEquivalence::with_decimal_digits(digits);
        let field = value.to_string();
        let once = eq.normalize(&field).into_owned();
        let twice = eq.normalize(&once).into_owned();
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn text_is_left_alone(text in "[a-zA-Z ]{0,16}") {
        let eq = ValueEquivalence::default();
        let normalized = eq.normalize(&text);
        prop_assert_eq!(normalized.as_ref(), text.as_str());
    }

    #[test]
    fn equal_rows_hash_equally(
        label in "[a-z]{1,6}",
        units in -1_000_000_000i64..1_000_000_000,
        digits in 0u32..=15,
        jitter_left in 0u32..9,
        jitter_right in 0u32..9,
    ) {
        // same digits up to the tolerance, different digits right after it
        let eq = ValueEquivalence::with_decimal_digits(digits);
        let left = Row::from(vec![label.clone(), tolerant_number(units, digits, jitter_left)]);
        let right = Row::from(vec![label, tolerant_number(units, digits, jitter_right)]);
        prop_assert!(eq.rows_equal(&left, &right), "{} vs {}", left, right);
        prop_assert_eq!(eq.row_hash(&left), eq.row_hash(&right));
    }

    #[test]
    fn equal_fields_normalize_identically(a in field(), b in field(), digits in 0u32..=15) {
        let eq = ValueEquivalence::with_decimal_digits(digits);
        if eq.fields_equal(&a, &b) {
            let (left, right) = (eq.normalize(&a), eq.normalize(&b));
            prop_assert_eq!(left, right);
        }
    }

    #[test]
    fn fields_differing_at_the_last_digit_are_unequal(
        units in -1_000_000i64..1_000_000,
        digits in 0u32..=8,
    ) {
        let eq = ValueEquivalence::with_decimal_digits(digits);
        let a = tolerant_number(units, digits, 0);
        let b = tolerant_number(units + 1, digits, 0);
        prop_assert!(!eq.fields_equal(&a, &b), "{} vs {}", a, b);
    }

    #[test]
    fn equality_is_symmetric(a in field(), b in field()) {
        let eq = ValueEquivalence::default();
        prop_assert_eq!(eq.fields_equal(&a, &b), eq.fields_equal(&b, &a));
    }

    #[test]
    fn row_order_does_not_matter(rows in prop::collection::vec(row(), 0..40)) {
        let eq = ValueEquivalence::default();
        let mut left = RowSet::new(eq);
        left.extend(rows.iter().cloned().map(Row::from));
        let mut right = RowSet::new(eq);
        right.extend(rows.into_iter().rev().map(Row::from));

        let result = difference(&left, &right);
        prop_assert!(result.is_match());
        prop_assert_eq!(result.left_row_count(), result.right_row_count());
    }

    #[test]
    fn plain_fields_split_on_the_delimiter(rows in row()) {
        let line = rows.join(",");
        prop_assert_eq!(CsvRowCodec::default().parse_line(&line), Row::from(rows));
    }
}
