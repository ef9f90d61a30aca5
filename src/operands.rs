//! Provides the `Operands` iterator, which opens the input files one at a
//! time, and `Operand::read_line`, which reads one line of an open file into a
//! `LineBuffer`.
//!
//! A file is opened only when the iterator reaches it, and is closed when its
//! `Operand` is dropped, so at most one input file is open at any time.
//! Errors from closing a file are discarded by `File`'s drop and can't be
//! reported.
use memchr::memchr;
use std::{
    fs::File,
    io::{self, BufRead, BufReader, Read},
    path::{Path, PathBuf},
};

use encoding_rs_io::{DecodeReaderBytes, DecodeReaderBytesBuilder};

use crate::error::{Error, Result};
use crate::line::{LineBuffer, LinePolicy};

/// An iterator over the input files, opening each one as it is reached
pub struct Operands {
    paths: std::vec::IntoIter<PathBuf>,
}

impl From<Vec<PathBuf>> for Operands {
    fn from(paths: Vec<PathBuf>) -> Self {
        Operands { paths: paths.into_iter() }
    }
}

impl Iterator for Operands {
    type Item = Result<Operand<File>>;
    fn next(&mut self) -> Option<Self::Item> {
        self.paths.next().map(|path| Operand::open(&path))
    }
}

/// What `read_line` found after the line it just read
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LineStatus {
    /// The line ended with a newline; there may be more lines
    More,
    /// End of file. The buffer holds the last line if it had no newline,
    /// and is empty otherwise.
    Done,
}

/// An open input file. `path_display` is the path formatted for use in
/// error messages.
pub struct Operand<R: Read> {
    path_display: String,
    reader: BufReader<DecodeReaderBytes<R, Vec<u8>>>,
}

impl Operand<File> {
    /// Opens the file at `path`
    pub fn open(path: &Path) -> Result<Self> {
        let path_display = format!("{}", path.display());
        match File::open(path) {
            Ok(file) => {
                tracing::debug!(path = %path_display, "opened input file");
                Ok(Operand::new(path_display, file))
            }
            Err(source) => Err(Error::FileUnavailable { path: path_display, source }),
        }
    }
}

impl<R: Read> Operand<R> {
    /// Wraps `source`, named `path_display` in error messages. Input that
    /// starts with a UTF-16 byte order mark is decoded to UTF-8; anything
    /// else is passed through byte for byte.
    pub fn new(path_display: String, source: R) -> Self {
        let reader = BufReader::new(
            DecodeReaderBytesBuilder::new()
                .bom_sniffing(true) // Look at the BOM to detect UTF-16 files and convert to UTF-8
                .strip_bom(true) // Remove the BOM before sending data to us
                .utf8_passthru(true) // Don't enforce UTF-8 (BOM or no BOM)
                .build(source),
        );
        Operand { path_display, reader }
    }

    /// The path, as shown in messages
    #[must_use]
    pub fn path_display(&self) -> &str {
        &self.path_display
    }

    /// Reads the next line into `line`, passing each byte through `policy`.
    /// The newline isn't stored, and neither is a carriage return just
    /// before it.
    ///
    /// `line` should be empty on entry; bytes are appended to whatever it
    /// holds.
    pub fn read_line(&mut self, line: &mut LineBuffer, policy: LinePolicy) -> Result<LineStatus> {
        // A '\r' is held back until we know whether a '\n' follows it
        let mut held_cr = false;
        loop {
            let chunk = match self.reader.fill_buf() {
                Ok(chunk) => chunk,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(source) => {
                    return Err(Error::ReadFailure { path: self.path_display.clone(), source })
                }
            };
            if chunk.is_empty() {
                if held_cr {
                    line.push_with(b'\r', policy)?;
                }
                return Ok(LineStatus::Done);
            }
            let (body, used, status) = match memchr(b'\n', chunk) {
                Some(end) => (&chunk[..end], end + 1, Some(LineStatus::More)),
                None => (chunk, chunk.len(), None),
            };
            for &byte in body {
                if held_cr {
                    line.push_with(b'\r', policy)?;
                }
                held_cr = byte == b'\r';
                if !held_cr {
                    line.push_with(byte, policy)?;
                }
            }
            self.reader.consume(used);
            if let Some(status) = status {
                return Ok(status);
            }
        }
    }
}
