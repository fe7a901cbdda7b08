use std::fs::File;
use std::io::{BufRead, BufReader, Write};
use std::path::Path;

use anyhow::Context;
use thiserror::Error;

use crate::record::Read;
use crate::store::RecordStore;

#[derive(Error, Debug)]
pub enum FastqError {
    #[error("could not read FASTQ input")]
    Io(#[from] std::io::Error),

    #[error("line {line}: not plain text, the input may be compressed or binary")]
    NotText { line: usize },

    #[error("line {line}: record header is empty")]
    EmptyHeader { line: usize },

    #[error("line {line}: record `{id}` ends early, a FASTQ record has 4 lines")]
    Truncated { line: usize, id: String },

    #[error(
        "line {line}: expected a `+` separator for record `{id}`, got
    `{got}`
suggestion: check that the input is in FASTQ format"
    )]
    MissingSeparator { line: usize, id: String, got: String },

    #[error(
        "line {line}: record `{id}` has {qual_len} quality characters for {seq_len} bases"
    )]
    LengthMismatch {
        line: usize,
        id: String,
        seq_len: usize,
        qual_len: usize,
    },
}

impl FastqError {
    /// True if the input was readable but is not well-formed FASTQ.
    pub fn is_format_error(&self) -> bool {
        !matches!(self, FastqError::Io(_))
    }
}

/// Iterates over the 4-line records of a FASTQ stream.
///
/// The header may start with `@` or be bare; the identifier is its first whitespace-delimited
/// token. Blank lines between records are skipped. Lines are read as bytes and must be ASCII,
/// so every quality character is exactly one byte.
pub struct FastqReadIterator<R: BufRead> {
    reader: R,
    buf: Vec<u8>,
    line_no: usize,
    eof: bool,
}

impl<R: BufRead> FastqReadIterator<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buf: Vec::new(),
            line_no: 0,
            eof: false,
        }
    }

    /// Returns the next line, without its `\n` or `\r\n` ending, along with its 1-based line
    /// number.
    fn next_line(&mut self) -> Option<Result<(usize, String), FastqError>> {
        self.buf.clear();
        match self.reader.read_until(b'\n', &mut self.buf) {
            Ok(0) => return None,
            Ok(_) => {}
            Err(e) => return Some(Err(FastqError::Io(e))),
        }
        self.line_no += 1;

        let mut bytes = self.buf.as_slice();
        if let Some(rest) = bytes.strip_suffix(b"\n") {
            bytes = rest.strip_suffix(b"\r").unwrap_or(rest);
        }

        if !bytes.is_ascii() {
            return Some(Err(FastqError::NotText { line: self.line_no }));
        }
        let line = String::from_utf8(bytes.to_vec())
            .map_err(|_| FastqError::NotText { line: self.line_no });

        Some(line.map(|l| (self.line_no, l)))
    }

    fn next_record_line(
        &mut self,
        header_line: usize,
        id: &str,
    ) -> Result<(usize, String), FastqError> {
        match self.next_line() {
            Some(line) => line,
            None => Err(FastqError::Truncated {
                line: header_line,
                id: id.to_string(),
            }),
        }
    }

    fn read_record(&mut self, line: usize, header: &str) -> Result<Read, FastqError> {
        let header = header.strip_prefix('@').unwrap_or(header);
        let Some(id) = header.split_whitespace().next() else {
            return Err(FastqError::EmptyHeader { line });
        };

        let (_, seq) = self.next_record_line(line, id)?;

        let (sep_line, sep) = self.next_record_line(line, id)?;
        if !sep.starts_with('+') {
            return Err(FastqError::MissingSeparator {
                line: sep_line,
                id: id.to_string(),
                got: sep,
            });
        }

        let (qual_line, qual) = self.next_record_line(line, id)?;

        if seq.len() != qual.len() {
            return Err(FastqError::LengthMismatch {
                line: qual_line,
                id: id.to_string(),
                seq_len: seq.len(),
                qual_len: qual.len(),
            });
        }

        Ok(Read::new(id, seq, qual))
    }
}

impl<R: BufRead> Iterator for FastqReadIterator<R> {
    type Item = Result<Read, FastqError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.eof {
            return None;
        }

        // skip blank lines before the header
        let (line, header) = loop {
            match self.next_line() {
                None => {
                    self.eof = true;
                    return None;
                }
                Some(Err(e)) => {
                    self.eof = true;
                    return Some(Err(e));
                }
                Some(Ok((_, l))) if l.trim().is_empty() => continue,
                Some(Ok(v)) => break v,
            }
        };

        let rec = self.read_record(line, &header);
        if rec.is_err() {
            // framing is lost after an error, so nothing further can be trusted
            self.eof = true;
        }
        Some(rec)
    }
}

/// Reads an entire FASTQ stream into a `RecordStore`. Fails on the first malformed record, so
/// nothing is returned for a partially valid input.
pub fn read_store(reader: impl BufRead) -> Result<RecordStore, FastqError> {
    let mut store = RecordStore::new();

    for rec in FastqReadIterator::new(reader) {
        let rec = rec?;
        let id = rec.id.clone();
        if store.insert(rec) {
            warn!("Duplicate read identifier {id}: keeping the latest record at the first position");
        }
    }

    Ok(store)
}

/// Opens and reads a FASTQ file into a `RecordStore`.
pub fn read_store_from_path(path: &Path) -> anyhow::Result<RecordStore> {
    let file = File::open(path).with_context(|| format!("Unable to open file {}", path.display()))?;
    let store = read_store(BufReader::new(file))
        .with_context(|| format!("{} is not a valid FASTQ file", path.display()))?;

    debug!("Read {} records from {}", store.len(), path.display());
    Ok(store)
}

/// Formats a read as a 4-line FASTQ record and writes it to `writer`.
pub fn write_read(writer: &mut impl Write, read: &Read) -> std::io::Result<()> {
    writeln!(writer, "@{}\n{}\n+\n{}", read.id, read.seq, read.qual)
}

/// Writes every read of the store, in store order.
pub fn write_store(writer: &mut impl Write, store: &RecordStore) -> std::io::Result<()> {
    store.reads().try_for_each(|r| write_read(writer, &r))
}
