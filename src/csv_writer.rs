use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use crate::error::RowDiffError;
use crate::row::Row;

/// Writes `rows` as delimited text, one row per line.
///
/// A field is quoted only when it has to be (it contains the delimiter, the quote
/// character or a line break); embedded quotes are doubled. Rows may differ in arity.
/// Delimiter and quote must be ASCII.
pub fn write_rows<W: Write>(
    writer: W,
    rows: &[Row],
    delimiter: char,
    quote: char,
) -> csv::Result<()> {
    let mut csv_writer = csv::WriterBuilder::new()
        .delimiter(ascii_byte(delimiter, "delimiter")?)
        .quote(ascii_byte(quote, "quote")?)
        .quote_style(csv::QuoteStyle::Necessary)
        .double_quote(true)
        .flexible(true)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(writer);
    for row in rows {
        csv_writer.write_record(row.fields())?;
    }
    csv_writer.flush()?;
    Ok(())
}

pub fn write_rows_to_path<P: AsRef<Path>>(
    path: P,
    rows: &[Row],
    delimiter: char,
    quote: char,
) -> Result<(), RowDiffError> {
    let path = path.as_ref();
    let output_error = |error| RowDiffError::Output {
        path: path.to_path_buf(),
        error,
    };
    let file = File::create(path).map_err(|e| output_error(csv::Error::from(e)))?;
    write_rows(file, rows, delimiter, quote).map_err(output_error)
}

fn ascii_byte(c: char, what: &str) -> csv::Result<u8> {
    if c.is_ascii() {
        Ok(c as u8)
    } else {
        Err(csv::Error::from(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("{} `{}` is not an ASCII character", what, c),
        )))
    }
}
