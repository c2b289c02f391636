use crate::row::{Row, StackVec};

pub const DEFAULT_DELIMITER: char = ',';
pub const DEFAULT_QUOTE: char = '"';

const TRIMMED: &[char] = &[' ', '\t', '\r', '\n'];

/// Splits one physical line into the fields of a [`Row`](crate::row::Row).
///
/// The codec is permissive: an unterminated quote is closed at the end of the line
/// and malformed quoting never produces an error. Whitespace around unquoted text is
/// trimmed, whitespace inside a quoted span is kept verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CsvRowCodec {
    delimiter: char,
    quote: char,
}

impl Default for CsvRowCodec {
    fn default() -> Self {
        Self {
            delimiter: DEFAULT_DELIMITER,
            quote: DEFAULT_QUOTE,
        }
    }
}

impl CsvRowCodec {
    pub fn new(delimiter: char, quote: char) -> Self {
        Self { delimiter, quote }
    }

    /// Parses `line`, which must not be empty and must not carry its line terminator.
    pub fn parse_line(&self, line: &str) -> Row {
        let mut fields: StackVec<String> = StackVec::new();
        let mut field = FieldBuf::default();
        let mut in_quotes = false;
        let mut chars = line.chars().peekable();

        while let Some(c) = chars.next() {
            if c == self.quote {
                if in_quotes && chars.peek() == Some(&self.quote) {
                    field.push(c);
                    chars.next();
                } else {
                    in_quotes = !in_quotes;
                    field.toggle_quoted(in_quotes);
                }
            } else if c == self.delimiter && !in_quotes {
                fields.push(std::mem::take(&mut field).finish());
            } else {
                field.push(c);
            }
        }
        if in_quotes {
            field.toggle_quoted(false);
        }
        fields.push(field.finish());

        Row::from_stack_vec(fields)
    }
}

/// Field text plus the byte range that came from quoted spans.
#[derive(Default)]
struct FieldBuf {
    text: String,
    quoted: Option<(usize, usize)>,
}

impl FieldBuf {
    #[inline]
    fn push(&mut self, c: char) {
        self.text.push(c);
    }

    fn toggle_quoted(&mut self, opening: bool) {
        let pos = self.text.len();
        match (&mut self.quoted, opening) {
            (None, true) => self.quoted = Some((pos, pos)),
            (Some(_), true) => {}
            (Some((_, end)), false) => *end = pos,
            (None, false) => {}
        }
    }

    fn finish(self) -> String {
        match self.quoted {
            None => self.text.trim_matches(TRIMMED).to_string(),
            Some((start, end)) => {
                let head = self.text[..start].trim_start_matches(TRIMMED);
                let tail = self.text[end..].trim_end_matches(TRIMMED);
                let mut out = String::with_capacity(head.len() + (end - start) + tail.len());
                out.push_str(head);
                out.push_str(&self.text[start..end]);
                out.push_str(tail);
                out
            }
        }
    }
}
