//! The `Bookkeeping` trait says what is recorded each time a line is seen,
//! and how a line's record is printed. There are two implementations:
//!
//! * `LinePositions`, used for a single input file, records the number of
//!   every line where a given content occurs.
//! * `FileCounts`, used for two or more files, counts the occurrences of a
//!   given content in each file.
use std::io::{self, Write};

use crate::error::Result;
use crate::seq::Seq;

/// A policy for recording sightings of lines
pub trait Bookkeeping {
    /// What the `Seq` associated with each line holds
    type Counter: Copy;

    /// The counters for a line seen for the first time, in file number
    /// `file` (counting from zero)
    fn first_sighting(&mut self, file: usize) -> Result<Seq<Self::Counter>>;

    /// Updates `counters` for another sighting of their line in file `file`.
    /// On failure `counters` is unchanged.
    fn sighting(&mut self, counters: &mut Seq<Self::Counter>, file: usize) -> Result<()>;

    /// Called after each non-empty line has been recorded
    fn line_done(&mut self) {}

    /// Writes the report line for `line`, or nothing if the policy
    /// suppresses it
    fn write_entry(
        &self,
        line: &[u8],
        counters: &Seq<Self::Counter>,
        out: &mut impl Write,
    ) -> io::Result<()>;
}

/// Records, for each line, the positions at which it occurs. Positions count
/// only non-empty lines, starting at 1. Lines seen just once are not
/// reported.
#[derive(Clone, Copy, Debug)]
pub struct LinePositions {
    next_line: usize,
}

impl LinePositions {
    /// Starts counting at line 1
    #[must_use]
    pub fn new() -> Self {
        LinePositions { next_line: 1 }
    }
}

impl Default for LinePositions {
    fn default() -> Self {
        Self::new()
    }
}

impl Bookkeeping for LinePositions {
    type Counter = usize;

    fn first_sighting(&mut self, _file: usize) -> Result<Seq<usize>> {
        let mut positions = Seq::empty()?;
        positions.push(self.next_line)?;
        Ok(positions)
    }

    fn sighting(&mut self, positions: &mut Seq<usize>, _file: usize) -> Result<()> {
        positions.push(self.next_line)
    }

    fn line_done(&mut self) {
        self.next_line += 1;
    }

    /// `1,3,5<TAB>line`
    fn write_entry(
        &self,
        line: &[u8],
        positions: &Seq<usize>,
        out: &mut impl Write,
    ) -> io::Result<()> {
        if positions.len() < 2 {
            return Ok(());
        }
        for (k, position) in positions.iter().enumerate() {
            if k > 0 {
                out.write_all(b",")?;
            }
            write!(out, "{position}")?;
        }
        out.write_all(b"\t")?;
        out.write_all(line)?;
        out.write_all(b"\n")
    }
}

/// Counts, for each line, its occurrences in each of `files` files. Every
/// line's counters are created zero-filled, one per file, so a line absent
/// from some file reports a zero there.
#[derive(Clone, Copy, Debug)]
pub struct FileCounts {
    files: usize,
}

impl FileCounts {
    /// Counters for `files` input files
    #[must_use]
    pub fn new(files: usize) -> Self {
        FileCounts { files }
    }
}

impl Bookkeeping for FileCounts {
    type Counter = usize;

    fn first_sighting(&mut self, file: usize) -> Result<Seq<usize>> {
        let mut counts = Seq::empty()?;
        for k in 0..self.files {
            counts.push(usize::from(k == file))?;
        }
        Ok(counts)
    }

    fn sighting(&mut self, counts: &mut Seq<usize>, file: usize) -> Result<()> {
        debug_assert!(file < counts.len(), "file {file} has no counter");
        if let Some(count) = counts.get_mut(file) {
            *count += 1;
        }
        Ok(())
    }

    /// `1<TAB>0<TAB>line`
    fn write_entry(&self, line: &[u8], counts: &Seq<usize>, out: &mut impl Write) -> io::Result<()> {
        if counts.len() < self.files {
            return Ok(());
        }
        for count in counts {
            write!(out, "{count}\t")?;
        }
        out.write_all(line)?;
        out.write_all(b"\n")
    }
}
