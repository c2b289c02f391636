use std::fs::File;
use std::io::{self, BufRead, BufReader, Cursor, Read, Seek, SeekFrom};
use std::path::Path;

use crate::error::RowDiffError;

const UNNAMED_SOURCE: &str = "<memory>";

/// A row source: a seekable reader of delimited text plus a name for logs and errors.
///
/// The source is read several times (once for the line-count pre-pass and once for
/// ingestion), which is why it must be [`Seek`]. Every pass starts from the beginning.
#[derive(Debug)]
pub struct Csv<R: Read> {
    reader: R,
    name: String,
}

impl<R: Read + Seek + Send> Csv<R> {
    pub fn with_reader_seek<RSeek: CsvReadSeek<R>>(reader: RSeek) -> Self {
        Self {
            reader: reader.into_read_seek(),
            name: UNNAMED_SOURCE.to_string(),
        }
    }
}

impl Csv<File> {
    /// Opens the file at `path`; the path becomes the source name.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, RowDiffError> {
        let path = path.as_ref();
        let name = path.display().to_string();
        let file = File::open(path).map_err(|error| RowDiffError::SourceUnavailable {
            source_name: name.clone(),
            error,
        })?;
        Ok(Self { reader: file, name })
    }
}

impl<R: Read + Seek> Csv<R> {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Rewinds the source and returns its name together with its lines, without line
    /// terminators.
    pub(crate) fn named_lines(&mut self) -> (&str, io::Result<io::Lines<BufReader<&mut R>>>) {
        (&self.name, rewound_lines(&mut self.reader))
    }

    /// Counts the non-empty physical lines.
    pub fn count_rows(&mut self) -> Result<u64, RowDiffError> {
        let (name, lines) = self.named_lines();
        let _span = tracing::debug_span!("count_rows", source = %name).entered();
        let unavailable = |error| RowDiffError::SourceUnavailable {
            source_name: name.to_string(),
            error,
        };
        let mut count = 0;
        for line in lines.map_err(unavailable)? {
            if !line.map_err(unavailable)?.is_empty() {
                count += 1;
            }
        }
        Ok(count)
    }
}

fn rewound_lines<R: Read + Seek>(reader: &mut R) -> io::Result<io::Lines<BufReader<&mut R>>> {
    reader.seek(SeekFrom::Start(0))?;
    Ok(BufReader::new(reader).lines())
}

pub struct CsvBuilder<R: Read> {
    reader: R,
    name: String,
}

impl<R: Read + Seek + Send> CsvBuilder<R> {
    pub fn with_reader_seek<RSeek: CsvReadSeek<R>>(reader: RSeek) -> Self {
        Self {
            reader: reader.into_read_seek(),
            name: UNNAMED_SOURCE.to_string(),
        }
    }

    pub fn name(self, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..self
        }
    }

    pub fn build(self) -> Csv<R> {
        Csv {
            reader: self.reader,
            name: self.name,
        }
    }
}

/// Produces a value that implements [`Read`](std::io::Read) + [`Seek`](std::io::Seek) + [`Send`](core::marker::Send).
pub trait CsvReadSeek<R>
where
    R: Read + Seek + Send,
{
    /// Converts this value into `R`.
    fn into_read_seek(self) -> R;
}

impl<T> CsvReadSeek<Cursor<T>> for T
where
    T: AsRef<[u8]> + Send,
{
    fn into_read_seek(self) -> Cursor<T> {
        Cursor::new(self)
    }
}

impl<R> CsvReadSeek<R> for R
where
    R: Read + Seek + Send,
{
    fn into_read_seek(self) -> R {
        self
    }
}
