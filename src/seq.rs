//! Provides `Seq<T>`, a growable array with an explicit capacity policy: it
//! starts with room for `MIN_CAPACITY` items and doubles whenever it is full.
//!
//! Growth is fallible. A `push` that can't grow the storage returns
//! `Error::OutOfMemory` (the allocator refused) or `Error::CapacityOverflow`
//! (the doubled size isn't addressable), and leaves the sequence exactly as it
//! was before the call.
//!
//! Whether a `Seq` owns what it holds is decided by `T`. A `Seq<&'a str>`
//! borrows its elements, and dropping it frees only its own storage. A
//! `Seq<Box<[u8]>>` owns them, and frees them on drop. Callers that need to
//! dispose of owned elements themselves can take them back with
//! `release_each`.
use std::mem;

use crate::error::{Error, Result};

/// Capacity of a freshly created `Seq`
pub const MIN_CAPACITY: usize = 4;

/// Factor applied to the capacity of a full `Seq` when it grows
pub const GROWTH_FACTOR: usize = 2;

/// A growable array whose capacity is `MIN_CAPACITY * GROWTH_FACTOR^k` for
/// some `k`, and is never less than its length.
#[derive(Debug)]
pub struct Seq<T> {
    items: Vec<T>,
    capacity: usize,
}

impl<T> Seq<T> {
    /// Returns an empty `Seq` with storage for `MIN_CAPACITY` items.
    pub fn empty() -> Result<Self> {
        let mut items = Vec::new();
        reserve_exact(&mut items, MIN_CAPACITY)?;
        Ok(Seq { items, capacity: MIN_CAPACITY })
    }

    /// Appends `item`, doubling the capacity first if the `Seq` is full.
    /// On failure the `Seq` is unchanged and `item` is dropped.
    pub fn push(&mut self, item: T) -> Result<()> {
        if self.items.len() == self.capacity {
            self.grow()?;
        }
        self.items.push(item);
        Ok(())
    }

    fn grow(&mut self) -> Result<()> {
        let new_capacity =
            self.capacity.checked_mul(GROWTH_FACTOR).ok_or(Error::CapacityOverflow)?;
        let addressable = new_capacity
            .checked_mul(mem::size_of::<T>())
            .is_some_and(|bytes| bytes <= isize::MAX.unsigned_abs());
        if !addressable {
            return Err(Error::CapacityOverflow);
        }
        let additional = new_capacity - self.items.len();
        reserve_exact(&mut self.items, additional)?;
        self.capacity = new_capacity;
        Ok(())
    }

    /// The item at `index`, or `None` unless `index < self.len()`
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&T> {
        if index < self.items.len() {
            Some(&self.items[index])
        } else {
            None
        }
    }

    /// Mutable access to the item at `index`, or `None` unless
    /// `index < self.len()`
    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        if index < self.items.len() {
            Some(&mut self.items[index])
        } else {
            None
        }
    }

    /// Number of items pushed so far
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Is the `Seq` empty?
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The number of items the `Seq` can hold before it must grow. An empty
    /// `Seq` reports zero, whatever storage it has reserved.
    #[must_use]
    pub fn capacity(&self) -> usize {
        if self.is_empty() {
            0
        } else {
            self.capacity
        }
    }

    /// The items, in the order they were pushed
    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    /// Iterates over the items in the order they were pushed
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    /// Drops every item but keeps the storage, so the next pushes don't
    /// allocate.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Hands each item, in order, to `release`, leaving the `Seq` empty. The
    /// storage itself is kept until the `Seq` is dropped or disposed of.
    pub fn release_each(&mut self, release: impl FnMut(T)) {
        self.items.drain(..).for_each(release);
    }

    /// Frees the `Seq` held in `slot`, if any, and leaves `None` behind.
    /// Disposing of an empty slot does nothing.
    pub fn dispose(slot: &mut Option<Self>) {
        *slot = None;
    }
}

impl<'a, T> IntoIterator for &'a Seq<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;
    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

/// Reserves room for exactly `additional` more items in `items`, reporting a
/// refusal as `Error::OutOfMemory`. Every allocation made while tallying
/// lines goes through here or through `allocation_guard`.
pub(crate) fn reserve_exact<T>(items: &mut Vec<T>, additional: usize) -> Result<()> {
    allocation_guard()?;
    items.try_reserve_exact(additional).map_err(|_| Error::OutOfMemory)
}

#[cfg(not(test))]
#[inline]
pub(crate) fn allocation_guard() -> Result<()> {
    Ok(())
}

#[cfg(test)]
pub(crate) use fault::allocation_guard;


#[allow(clippy::pedantic)]
#[cfg(test)]
mod test {
    use super::*;

    fn seq_of(n: usize) -> Seq<usize> {
        let mut seq = Seq::empty().unwrap();
        for k in 0..n {
            seq.push(k).unwrap();
        }
        seq
    }

    #[test]
    fn a_new_seq_is_empty_and_reports_zero_capacity() {
        let seq = Seq::<u8>::empty().unwrap();
        assert_eq!(seq.len(), 0);
        assert_eq!(seq.capacity(), 0);
        assert!(seq.get(0).is_none());
        assert!(seq.items.capacity() >= MIN_CAPACITY);
    }

    #[test]
    fn capacity_starts_at_the_minimum_and_doubles_when_full() {
        let mut seq = Seq::empty().unwrap();
        let mut seen = Vec::new();
        for k in 0..17 {
            seq.push(k).unwrap();
            assert!(seq.len() <= seq.capacity());
            if seen.last() != Some(&seq.capacity()) {
                seen.push(seq.capacity());
            }
        }
        assert_eq!(seen, vec![4, 8, 16, 32]);
    }

    #[test]
    fn get_returns_the_items_in_push_order() {
        let seq = seq_of(10);
        for k in 0..10 {
            assert_eq!(seq.get(k), Some(&k));
        }
        assert_eq!(seq.iter().copied().collect::<Vec<_>>(), (0..10).collect::<Vec<_>>());
    }

    #[test]
    fn get_at_or_past_the_length_is_none() {
        let mut seq = seq_of(3);
        assert!(seq.get(3).is_none());
        assert!(seq.get(4).is_none());
        assert!(seq.get_mut(3).is_none());
        // A full seq: index == length == capacity
        seq.push(3).unwrap();
        assert_eq!(seq.len(), seq.capacity());
        assert!(seq.get(4).is_none());
        assert_eq!(seq.get(3), Some(&3));
    }

    #[test]
    fn get_mut_changes_the_item_in_place() {
        let mut seq = seq_of(3);
        *seq.get_mut(1).unwrap() += 40;
        assert_eq!(seq.as_slice(), &[0, 41, 2]);
    }

    #[test]
    fn disposing_twice_is_harmless() {
        let mut slot = Some(seq_of(5));
        Seq::dispose(&mut slot);
        assert!(slot.is_none());
        Seq::dispose(&mut slot);
        assert!(slot.is_none());
    }

    #[test]
    fn a_seq_of_references_leaves_its_referents_alone() {
        let words = vec![String::from("alpha"), String::from("beta")];
        let mut slot = Some(Seq::empty().unwrap());
        if let Some(seq) = slot.as_mut() {
            for w in &words {
                seq.push(w).unwrap();
            }
            assert_eq!(seq.get(1).map(|s| s.as_str()), Some("beta"));
        }
        Seq::dispose(&mut slot);
        assert_eq!(words.join(" "), "alpha beta");
    }

    #[test]
    fn release_each_hands_back_owned_items_and_keeps_the_storage() {
        let mut seq = Seq::empty().unwrap();
        for word in ["x", "y", "z", "w", "v"] {
            seq.push(Box::<str>::from(word)).unwrap();
        }
        let reserved = seq.items.capacity();
        let mut released = Vec::new();
        seq.release_each(|item| released.push(item));
        assert_eq!(released.concat(), "xyzwv");
        assert!(seq.is_empty());
        assert_eq!(seq.items.capacity(), reserved);
        seq.push("again".into()).unwrap();
        assert_eq!(seq.len(), 1);
    }

    #[test]
    fn a_failed_growth_leaves_the_seq_unchanged() {
        let mut seq = seq_of(4);
        fault::fail_after(0);
        let result = seq.push(4);
        fault::reset();
        assert!(matches!(result, Err(Error::OutOfMemory)));
        assert_eq!(seq.as_slice(), &[0, 1, 2, 3]);
        assert_eq!(seq.capacity(), 4);
        seq.push(4).unwrap();
        assert_eq!(seq.capacity(), 8);
    }

    #[test]
    fn pushing_into_a_seq_with_room_does_not_allocate() {
        let mut seq = seq_of(2);
        fault::fail_after(0);
        let result = seq.push(2);
        fault::reset();
        assert!(result.is_ok());
        assert_eq!(seq.len(), 3);
    }

    #[test]
    fn creating_a_seq_fails_cleanly_when_memory_is_short() {
        fault::fail_after(0);
        let result = Seq::<u32>::empty();
        fault::reset();
        assert!(matches!(result, Err(Error::OutOfMemory)));
    }

    #[test]
    fn growth_past_the_addressable_size_is_a_capacity_overflow() {
        let mut seq = Seq::<u64> { items: Vec::new(), capacity: usize::MAX / 2 + 1 };
        assert!(matches!(seq.grow(), Err(Error::CapacityOverflow)));
        assert_eq!(seq.capacity, usize::MAX / 2 + 1);

        let mut seq = Seq::<u64> { items: Vec::new(), capacity: isize::MAX.unsigned_abs() / 8 };
        assert!(matches!(seq.grow(), Err(Error::CapacityOverflow)));
    }
}
