use std::fmt;

#[derive(Debug)]
pub enum DecodeError {
    /// Malformed or unreadable workbook bytes.
    Workbook(String),
    /// Malformed or unreadable document bytes.
    Document(String),
    /// A required package part is absent (e.g. `word/document.xml`).
    MissingPart(String),
    /// Re-encoding a staged artifact failed.
    Encode(String),
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Workbook(msg) => write!(f, "workbook decode error: {msg}"),
            Self::Document(msg) => write!(f, "document decode error: {msg}"),
            Self::MissingPart(part) => write!(f, "missing package part: {part}"),
            Self::Encode(msg) => write!(f, "encode error: {msg}"),
        }
    }
}

impl std::error::Error for DecodeError {}
