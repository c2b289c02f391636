//! Human-readable summary of a [`ComparisonResult`].

use std::fmt;

use crate::diff_result::ComparisonResult;
use crate::row::Row;

pub fn render_summary(
    result: &ComparisonResult,
    left_name: &str,
    right_name: &str,
    decimal_digits: u32,
) -> String {
    Summary {
        result,
        left_name,
        right_name,
        decimal_digits,
    }
    .to_string()
}

#[derive(Debug, Clone, Copy)]
pub struct Summary<'a> {
    pub result: &'a ComparisonResult,
    pub left_name: &'a str,
    pub right_name: &'a str,
    pub decimal_digits: u32,
}

impl fmt::Display for Summary<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let result = self.result;
        if result.is_match() {
            writeln!(f, "FILES MATCH")?;
            writeln!(
                f,
                "Both files contain the same {} unique rows ({} and {} lines, ignoring order).",
                result.left_row_count(),
                result.left_line_count(),
                result.right_line_count()
            )?;
            return writeln!(
                f,
                "Decimal comparison: first {} decimal places only.",
                self.decimal_digits
            );
        }

        writeln!(f, "FILES DIFFER")?;
        writeln!(f)?;
        writeln!(f, "Summary:")?;
        writeln!(
            f,
            "  File 1 rows: {} ({} lines)",
            result.left_row_count(),
            result.left_line_count()
        )?;
        writeln!(
            f,
            "  File 2 rows: {} ({} lines)",
            result.right_row_count(),
            result.right_line_count()
        )?;
        writeln!(f, "  Rows only in File 1: {}", result.only_in_left().len())?;
        writeln!(f, "  Rows only in File 2: {}", result.only_in_right().len())?;
        write_rows(f, "File 1", self.left_name, result.only_in_left())?;
        write_rows(f, "File 2", self.right_name, result.only_in_right())
    }
}

fn write_rows(f: &mut fmt::Formatter<'_>, label: &str, name: &str, rows: &[Row]) -> fmt::Result {
    if rows.is_empty() {
        return Ok(());
    }
    writeln!(f)?;
    writeln!(f, "Rows only in {} ({}):", label, name)?;
    for row in rows {
        writeln!(f, "  {}", row)?;
    }
    Ok(())
}
