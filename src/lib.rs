//! `linedup` finds repeated lines. Given a single file, it prints each line
//! that occurs more than once, along with the numbers of the lines where it
//! occurs. Given several files, it prints every line along with the number of
//! times it occurs in each file.
//!
//! The `run` function is the kernel of the application. The `args` module
//! parses the command line, and the `operands` module hides I/O details.
//! Lines are counted in an `OccurrenceMap` built from `Seq`s, growable arrays
//! whose growth can fail without losing what they hold: running out of memory
//! is reported as an error rather than aborting the process.
//!
//! Current Limitations:
//! * A "line" is zero or more non-newline bytes followed by a newline (or by
//!   the end of the file). Character classes and transforms only know about
//!   ASCII.

#![deny(unused_must_use)]
#![deny(clippy::all)]
#![allow(clippy::needless_return)]
#![deny(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::module_name_repetitions)]
#![deny(missing_docs)]

pub mod aggregate;
pub mod args;
pub mod error;
pub mod line;
pub mod map;
pub mod operands;
pub mod seq;
pub mod tally;

pub use crate::aggregate::run;
pub use crate::error::{Error, Result};
