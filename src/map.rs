//! Provides the `OccurrenceMap`, which associates each distinct line with a
//! `Seq` of counters, and remembers the order in which lines were first
//! inserted.
use indexmap::{map::Entry, IndexMap};
use std::hash::{BuildHasherDefault, Hasher};

use crate::error::{Error, Result};
use crate::seq::{allocation_guard, Seq};

/// The hash recommended by Kernighan and Pike for strings: starting from
/// zero, `h = 37 * h + byte` for every byte written, with wrapping
/// arithmetic.
#[derive(Clone, Copy, Debug, Default)]
pub struct LineHasher(u64);

impl Hasher for LineHasher {
    fn write(&mut self, bytes: &[u8]) {
        for &byte in bytes {
            self.0 = self.0.wrapping_mul(37).wrapping_add(u64::from(byte));
        }
    }
    /// `[u8]` writes its length before its bytes; only the bytes are hashed
    fn write_usize(&mut self, _length: usize) {}
    fn finish(&self) -> u64 {
        self.0
    }
}

type LineMap<C> = IndexMap<Box<[u8]>, Seq<C>, BuildHasherDefault<LineHasher>>;

/// A map from line content to a `Seq` of counters. Keys are compared byte
/// for byte. Once inserted, a key is never replaced or removed, and
/// iteration yields keys in the order they were first inserted.
#[derive(Debug)]
pub struct OccurrenceMap<C> {
    entries: LineMap<C>,
}

impl<C> Default for OccurrenceMap<C> {
    fn default() -> Self {
        OccurrenceMap { entries: LineMap::default() }
    }
}

impl<C> OccurrenceMap<C> {
    /// An empty map
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The counters for `line`, if it has been inserted
    pub fn lookup(&mut self, line: &[u8]) -> Option<&mut Seq<C>> {
        self.entries.get_mut(line)
    }

    /// Like `lookup`, but read-only
    #[must_use]
    pub fn get(&self, line: &[u8]) -> Option<&Seq<C>> {
        self.entries.get(line)
    }

    /// Records `counters` as the counters for `line`, unless `line` is
    /// already present, in which case its counters are left as they were.
    /// Either way, returns the counters now associated with `line`.
    pub fn insert(&mut self, line: Box<[u8]>, counters: Seq<C>) -> Result<&mut Seq<C>> {
        allocation_guard()?;
        self.entries.try_reserve(1).map_err(|_| Error::OutOfMemory)?;
        Ok(match self.entries.entry(line) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => entry.insert(counters),
        })
    }

    /// Number of distinct lines
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Has nothing been inserted?
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Lines and their counters, in first-insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&[u8], &Seq<C>)> {
        self.entries.iter().map(|(line, counters)| (&line[..], counters))
    }
}
