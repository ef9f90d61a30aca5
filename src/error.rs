//! The `Error` type shared by every stage of a run. Each variant is one
//! category of fatal failure: nothing is retried, and a run that hits any of
//! them produces no report.
use std::io;

/// Everything that can stop a run.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// An allocation needed to store a line, a key or a counter failed
    #[error("Not enough memory")]
    OutOfMemory,
    /// Doubling a sequence's capacity would exceed the addressable size
    #[error("Not enough memory (capacity overflow)")]
    CapacityOverflow,
    /// An input file could not be opened
    #[error("Can't open file: {path}")]
    FileUnavailable {
        /// The path as given on the command line
        path: String,
        /// What the operating system said
        #[source]
        source: io::Error,
    },
    /// Reading an already opened input file failed before end of file
    #[error("Error reading file: {path}")]
    ReadFailure {
        /// The path as given on the command line
        path: String,
        /// What the operating system said
        #[source]
        source: io::Error,
    },
    /// Writing the report failed
    #[error("Error writing output")]
    WriteFailure(#[source] io::Error),
    /// A filter or transform name outside the known set
    #[error("Invalid option: {0}")]
    InvalidOption(String),
}

impl Error {
    /// True for the two variants reported as "Not enough memory"
    #[must_use]
    pub fn is_out_of_memory(&self) -> bool {
        matches!(self, Error::OutOfMemory | Error::CapacityOverflow)
    }
}

/// `Result` with `Error` as the default error type.
pub type Result<T, E = Error> = std::result::Result<T, E>;
