use std::cmp::min;

use thiserror::Error;

use crate::heap_primitives::index_first_child;
use crate::heap_primitives::index_last_child;
use crate::heap_primitives::index_parent;
use crate::heap_primitives::linear_max_index;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConstructionError {
    #[error("capacity must be positive")]
    ZeroCapacity,
    #[error("2^{log_children} children per node does not fit in a usize")]
    ArityTooLarge { log_children: u32 },
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("heap overflow, all {capacity} slots are in use")]
pub struct OverflowError {
    pub capacity: usize,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("heap underflow, there is nothing to pop")]
pub struct UnderflowError;

/// Power-of-two Max-Heap
///
/// An array-backed max-heap where every parent has up to `2^x` children, for
/// a per-heap exponent `x` fixed at construction, and where the backing
/// array never grows past the capacity chosen at construction.
///
/// Only the live prefix `slots[0..len]` is materialized. Slots past the
/// length don't exist as far as the heap is concerned, so no value needs to
/// be reserved as an empty-slot marker.
///
/// ```
/// use pow2heap::PowerOfTwoMaxHeap;
///
/// // 2^2 = 4 children per node
/// let mut heap = PowerOfTwoMaxHeap::new(8, 2)?;
/// heap.insert(5)?;
/// heap.insert(9)?;
/// heap.insert(3)?;
/// assert_eq!(heap.pop_max()?, 9);
/// assert_eq!(heap.pop_max()?, 5);
/// assert_eq!(heap.pop_max()?, 3);
/// assert!(heap.is_empty());
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PowerOfTwoMaxHeap<T>
where
    T: Ord + Copy,
{
    arity: usize,
    capacity: usize,
    slots: Vec<T>,
}

impl<T> PowerOfTwoMaxHeap<T>
where
    T: Ord + Copy,
{
    /// Builds an empty heap holding at most `capacity` elements, with
    /// `2^log_children` children per node.
    pub fn new(capacity: usize, log_children: u32) -> Result<Self, ConstructionError> {
        if capacity == 0 {
            return Err(ConstructionError::ZeroCapacity);
        }
        let arity = 1usize
            .checked_shl(log_children)
            .ok_or(ConstructionError::ArityTooLarge { log_children })?;

        Ok(Self {
            arity,
            capacity,
            slots: Vec::with_capacity(capacity),
        })
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.slots.len() == self.capacity
    }
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }
    #[must_use]
    pub fn arity(&self) -> usize {
        self.arity
    }

    /// Drops every element. Capacity and arity are kept.
    pub fn clear(&mut self) {
        self.slots.clear();
    }

    /// Adds `value` to the heap.
    ///
    /// Fails without touching the heap when every slot is in use.
    pub fn insert(&mut self, value: T) -> Result<(), OverflowError> {
        self.verify_heap();

        if self.is_full() {
            return Err(OverflowError {
                capacity: self.capacity,
            });
        }
        self.slots.push(value);
        self.sift_up(self.slots.len() - 1);

        self.verify_heap();
        Ok(())
    }

    /// Removes and returns the largest element.
    ///
    /// Fails without touching the heap when there are no elements left.
    pub fn pop_max(&mut self) -> Result<T, UnderflowError> {
        self.verify_heap();

        let Some(last) = self.slots.pop() else {
            return Err(UnderflowError);
        };
        if self.slots.is_empty() {
            // The last element was also the top one.
            return Ok(last);
        }

        let max = self.slots[0];
        self.slots[0] = last;
        self.sift_down(0);

        self.verify_heap();
        Ok(max)
    }

    /// Read-only snapshot of the parent/children layout.
    ///
    /// One row per occupied parent position up to `len / arity` inclusive,
    /// pairing the parent's value with the values of its in-range children.
    #[must_use]
    pub fn describe(&self) -> Vec<(T, Vec<T>)> {
        let len = self.slots.len();
        (0..=len / self.arity)
            .take_while(|i| *i < len)
            .map(|i| {
                let first = index_first_child(self.arity, i);
                let children = if first < len {
                    self.slots[first..min(first + self.arity, len)].to_vec()
                } else {
                    Vec::new()
                };
                (self.slots[i], children)
            })
            .collect()
    }

    /// Borrow of the live prefix, in array order.
    #[cfg(feature = "inspect")]
    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        &self.slots
    }

    #[inline(always)]
    #[cfg(not(feature = "verify"))]
    fn verify_heap(&self) {
        // All good... (hopefully)
    }

    #[inline(always)]
    #[cfg(feature = "verify")]
    fn verify_heap(&self) {
        // Every node goes before its children, if any.
        for i in 1..self.slots.len() {
            let p = index_parent(self.arity, i);
            debug_assert!(
                self.slots[p] >= self.slots[i],
                "Node[{p}] !>= child [{i}]. Out of heap of len={}",
                self.slots.len(),
            );
        }
    }

    // Implementation details

    /// Raises the value at `pos` to its rank.
    ///
    /// Holds the value aside and drags parents down over the hole until the
    /// parent is no smaller, then writes the held value into the hole.
    #[inline(always)]
    fn sift_up(&mut self, mut pos: usize) {
        debug_assert!(pos < self.slots.len());

        let held = self.slots[pos];
        while pos > 0 {
            let parent = index_parent(self.arity, pos);
            if held <= self.slots[parent] {
                break;
            }
            self.slots[pos] = self.slots[parent];
            pos = parent;
        }
        self.slots[pos] = held;
    }

    /// Lowers the value at `pos` to its rank.
    ///
    /// Holds the value aside and drags the largest child up over the hole
    /// until no in-range child beats it, then writes the held value into the
    /// hole. Each level costs a full scan of one child range.
    #[inline(always)]
    fn sift_down(&mut self, mut pos: usize) {
        let len = self.slots.len();
        debug_assert!(pos < len);

        let held = self.slots[pos];
        while index_first_child(self.arity, pos) < len {
            let child = self.max_child(pos);
            if self.slots[child] <= held {
                break;
            }
            self.slots[pos] = self.slots[child];
            pos = child;
        }
        self.slots[pos] = held;
    }

    /// Index of the largest in-range child of `pos`.
    ///
    /// Callers must make sure at least one child is in range.
    #[inline(always)]
    #[must_use]
    fn max_child(&self, pos: usize) -> usize {
        let len = self.slots.len();
        let first = index_first_child(self.arity, pos);
        debug_assert!(first < len);
        debug_assert_eq!(first + self.arity, index_last_child(self.arity, pos) + 1);

        first + linear_max_index(&self.slots[first..min(first + self.arity, len)])
    }
}

impl<T> std::fmt::Display for PowerOfTwoMaxHeap<T>
where
    T: Ord + Copy + std::fmt::Display,
{
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        writeln!(f, "PARENT\tCHILDREN")?;
        for (parent, children) in self.describe() {
            write!(f, " {parent}")?;
            for child in children {
                write!(f, "\t\t{child}")?;
            }
            writeln!(f)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn heap_works() {
        let mut heap = PowerOfTwoMaxHeap::new(4, 1).unwrap();

        heap.insert(7).unwrap();
        assert_eq!(heap.pop_max(), Ok(7));
        assert!(heap.is_empty());
    }

    #[test]
    fn heap_sorts() {
        let mut heap = PowerOfTwoMaxHeap::new(10, 2).unwrap();

        for v in [5, 3, 8, 1, 9, 2] {
            heap.insert(v).unwrap();
        }

        assert_eq!(heap.pop_max(), Ok(9));
        assert_eq!(heap.pop_max(), Ok(8));
        assert_eq!(heap.pop_max(), Ok(5));
        assert_eq!(heap.pop_max(), Ok(3));
        assert_eq!(heap.pop_max(), Ok(2));
        assert_eq!(heap.pop_max(), Ok(1));
        assert_eq!(heap.pop_max(), Err(UnderflowError));
    }

    #[test]
    fn construction_rejects_zero_capacity() {
        assert_eq!(
            PowerOfTwoMaxHeap::<i32>::new(0, 1),
            Err(ConstructionError::ZeroCapacity)
        );
    }

    #[test]
    fn construction_rejects_oversized_arity() {
        assert_eq!(
            PowerOfTwoMaxHeap::<i32>::new(4, usize::BITS),
            Err(ConstructionError::ArityTooLarge {
                log_children: usize::BITS
            })
        );
    }

    #[test]
    fn overflow_leaves_heap_untouched() {
        let mut heap = PowerOfTwoMaxHeap::new(3, 1).unwrap();

        for v in [4, 6, 2] {
            heap.insert(v).unwrap();
        }
        assert!(heap.is_full());

        assert_eq!(heap.insert(99), Err(OverflowError { capacity: 3 }));
        assert_eq!(heap.len(), 3);
        assert_eq!(heap.pop_max(), Ok(6));
        assert_eq!(heap.pop_max(), Ok(4));
        assert_eq!(heap.pop_max(), Ok(2));
    }

    #[test]
    fn underflow_leaves_heap_untouched() {
        let mut heap = PowerOfTwoMaxHeap::<i32>::new(4, 1).unwrap();

        assert_eq!(heap.pop_max(), Err(UnderflowError));
        assert!(heap.is_empty());

        heap.insert(1).unwrap();
        heap.pop_max().unwrap();
        assert_eq!(heap.pop_max(), Err(UnderflowError));
        assert_eq!(heap.len(), 0);
    }

    #[test]
    fn size_tracks_inserts_and_pops() {
        let mut heap = PowerOfTwoMaxHeap::new(8, 2).unwrap();

        for v in 0..5 {
            heap.insert(v).unwrap();
        }
        heap.pop_max().unwrap();
        heap.pop_max().unwrap();

        assert_eq!(heap.len(), 3);
        assert!(!heap.is_empty());
        assert!(!heap.is_full());
    }

    #[test]
    fn clear_resets() {
        let mut heap = PowerOfTwoMaxHeap::new(4, 1).unwrap();

        for v in [9, 1, 5] {
            heap.insert(v).unwrap();
        }
        heap.clear();
        assert!(heap.is_empty());
        assert_eq!(heap.len(), 0);

        heap.insert(7).unwrap();
        assert_eq!(heap.pop_max(), Ok(7));
    }

    #[test]
    fn unary_arity_degenerates_to_a_sorted_chain() {
        // 2^0 = 1 child per node. The general formulas must still hold.
        let mut heap = PowerOfTwoMaxHeap::new(8, 0).unwrap();
        assert_eq!(heap.arity(), 1);

        for v in [3, 1, 4, 1, 5, 9, 2, 6] {
            heap.insert(v).unwrap();
        }
        let mut drained = Vec::new();
        while let Ok(v) = heap.pop_max() {
            drained.push(v);
        }
        assert_eq!(drained, vec![9, 6, 5, 4, 3, 2, 1, 1]);
    }

    #[test]
    fn binary_arity_matches_std_binary_heap() {
        let values = [13, 7, 42, 0, -3, 42, 19, 8];

        let mut heap = PowerOfTwoMaxHeap::new(values.len(), 1).unwrap();
        let mut reference = std::collections::BinaryHeap::new();
        for v in values {
            heap.insert(v).unwrap();
            reference.push(v);
        }

        while let Some(expected) = reference.pop() {
            assert_eq!(heap.pop_max(), Ok(expected));
        }
        assert!(heap.is_empty());
    }

    #[test]
    fn describe_groups_children_by_parent() {
        let mut heap = PowerOfTwoMaxHeap::new(8, 1).unwrap();

        heap.insert(1).unwrap();
        heap.insert(2).unwrap();
        heap.insert(3).unwrap();
        // Sifting leaves the array as [3, 1, 2].
        assert_eq!(heap.describe(), vec![(3, vec![1, 2]), (1, vec![])]);

        heap.clear();
        assert_eq!(heap.describe(), vec![]);
    }

    #[test]
    fn display_renders_the_parent_children_table() {
        let mut heap = PowerOfTwoMaxHeap::new(8, 2).unwrap();

        heap.insert(5).unwrap();
        heap.insert(3).unwrap();
        assert_eq!(heap.to_string(), "PARENT\tCHILDREN\n 5\t\t3\n");
    }
}
