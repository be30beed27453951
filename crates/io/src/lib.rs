//! `sheetcheck-io` — byte-level decode and encode.
//!
//! Workbooks travel as XLSX (calamine in, rust_xlsxwriter out), the
//! instruction document as DOCX (ZIP package, `word/document.xml`).
//! Decoding builds the in-memory models; encoding produces fresh byte
//! buffers — the caller's originals are never touched.

pub mod docx;
pub mod error;
pub mod xlsx;

pub use error::DecodeError;
