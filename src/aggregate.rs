//! Houses the `Aggregator`, which reads every line of every input file into
//! an `OccurrenceMap`, and the `run` function that chooses how lines are
//! counted and prints the report.
//!
//! Nothing is printed until every input file has been read and closed, so a
//! run that fails prints no partial report.
use bstr::ByteSlice;
use std::{io::Read, io::Write, path::PathBuf};

use crate::error::{Error, Result};
use crate::line::{LineBuffer, LinePolicy};
use crate::map::OccurrenceMap;
use crate::operands::{LineStatus, Operand, Operands};
use crate::tally::{Bookkeeping, FileCounts, LinePositions};

/// Reads lines into an `OccurrenceMap`, recording each sighting as `B`
/// dictates.
pub struct Aggregator<B: Bookkeeping> {
    map: OccurrenceMap<B::Counter>,
    bookkeeping: B,
    policy: LinePolicy,
}

impl<B: Bookkeeping> Aggregator<B> {
    /// An aggregator with no lines yet
    pub fn new(bookkeeping: B, policy: LinePolicy) -> Self {
        Aggregator { map: OccurrenceMap::new(), bookkeeping, policy }
    }

    /// Records one sighting of `line` in file `file`. Empty lines are
    /// ignored. On failure, everything recorded so far is unchanged.
    pub fn add_line(&mut self, file: usize, line: &LineBuffer) -> Result<()> {
        if line.is_empty() {
            return Ok(());
        }
        match self.map.lookup(line.as_bytes()) {
            Some(counters) => self.bookkeeping.sighting(counters, file)?,
            None => {
                let key = line.to_key()?;
                let counters = self.bookkeeping.first_sighting(file)?;
                tracing::trace!(line = %key.as_bstr(), file, "first sighting");
                self.map.insert(key, counters)?;
            }
        }
        self.bookkeeping.line_done();
        Ok(())
    }

    /// Reads `operand` to the end, recording each of its lines as belonging
    /// to file `file`.
    pub fn add_operand<R: Read>(&mut self, file: usize, operand: &mut Operand<R>) -> Result<()> {
        let mut line = LineBuffer::new()?;
        let mut lines = 0_usize;
        loop {
            let status = operand.read_line(&mut line, self.policy)?;
            if !line.is_empty() {
                lines += 1;
            }
            self.add_line(file, &line)?;
            line.clear();
            if status == LineStatus::Done {
                break;
            }
        }
        tracing::debug!(path = operand.path_display(), lines, "finished input file");
        Ok(())
    }

    /// The lines recorded so far
    pub fn occurrences(&self) -> &OccurrenceMap<B::Counter> {
        &self.map
    }

    /// Prints the report: one line for each reported line, in the order
    /// lines were first seen.
    pub fn output_to(&self, mut out: impl Write) -> Result<()> {
        tracing::info!(distinct = self.map.len(), "writing report");
        for (line, counters) in self.map.iter() {
            self.bookkeeping.write_entry(line, counters, &mut out).map_err(Error::WriteFailure)?;
        }
        out.flush().map_err(Error::WriteFailure)
    }
}

/// Reads each operand in turn into a new `Aggregator`. Each operand is
/// dropped, closing its file, before the next one is opened.
pub fn aggregate<B, R>(
    bookkeeping: B,
    operands: impl IntoIterator<Item = Result<Operand<R>>>,
    policy: LinePolicy,
) -> Result<Aggregator<B>>
where
    B: Bookkeeping,
    R: Read,
{
    let mut aggregator = Aggregator::new(bookkeeping, policy);
    for (file, operand) in operands.into_iter().enumerate() {
        let mut operand = operand?;
        aggregator.add_operand(file, &mut operand)?;
    }
    Ok(aggregator)
}

/// Reads the files in `paths` and prints the report to `out`:
///
/// * For a single file, each line occurring more than once, preceded by the
///   comma-separated numbers of the lines where it occurs.
/// * For two or more files, each line occurring anywhere, preceded by its
///   number of occurrences in each file.
///
/// With no files, there is nothing to do.
pub fn run(paths: &[PathBuf], policy: LinePolicy, out: impl Write) -> Result<()> {
    let operands = Operands::from(paths.to_vec());
    match paths.len() {
        0 => Ok(()),
        1 => aggregate(LinePositions::new(), operands, policy)?.output_to(out),
        n => aggregate(FileCounts::new(n), operands, policy)?.output_to(out),
    }
}
