use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::Path;

const ZIP_MAGIC: [u8; 4] = [0x50, 0x4b, 0x03, 0x04];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    DelimitedText,
    /// An XLSX workbook. Its cells need an external reader, see [`crate::cell`].
    Spreadsheet,
}

impl SourceKind {
    /// Detects by extension first (case-insensitive), then by the ZIP magic bytes every
    /// XLSX file starts with. Anything else, including unreadable files, is treated as
    /// delimited text; opening it later reports the real error.
    pub fn detect<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        match path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .as_deref()
        {
            Some("csv") => SourceKind::DelimitedText,
            Some("xlsx") => SourceKind::Spreadsheet,
            _ => Self::detect_by_magic_bytes(path),
        }
    }

    fn detect_by_magic_bytes(path: &Path) -> Self {
        let mut magic = [0u8; 4];
        match File::open(path).and_then(|mut file| file.read_exact(&mut magic)) {
            Ok(()) if magic == ZIP_MAGIC => SourceKind::Spreadsheet,
            _ => SourceKind::DelimitedText,
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceKind::DelimitedText => f.write_str("CSV"),
            SourceKind::Spreadsheet => f.write_str("XLSX"),
        }
    }
}
