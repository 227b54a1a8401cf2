// Heap intrinsic operations implemented externally.
//
// A heap is a tree-like structure where every subtree's root has a better
// score than all the other nodes in the subtree.
//
// This is often implemented with an array that's traversed in a non-linear
// way. These are the indices we assign to each node of a heap where every
// parent has 4 children.
//
// ```text
//                               0
//      1           2            3            4
//  5 6 7 8     9 10 11 12  13 14 15 16  17 18 19 20
// 21 22 ...
// ```
//
// The last level will often be incomplete
//
// With `arity` children per node you can go up and down from any index with,
//   - Up:          `(i-1)//arity`
//   - Nth child:   `arity*i + n`, for `n` in `1..=arity`

/// The parent node
///
/// ```
/// use pow2heap::heap_primitives::index_parent;
/// assert_eq!(index_parent(2, 1), 0);
/// assert_eq!(index_parent(2, 2), 0);
/// assert_eq!(index_parent(2, 3), 1);
/// assert_eq!(index_parent(2, 6), 2);
/// assert_eq!(index_parent(4, 1), 0);
/// assert_eq!(index_parent(4, 4), 0);
/// assert_eq!(index_parent(4, 5), 1);
/// assert_eq!(index_parent(4, 8), 1);
/// assert_eq!(index_parent(4, 20), 4);
/// ```
#[inline(always)]
#[must_use]
pub fn index_parent(arity: usize, i: usize) -> usize {
    debug_assert!(i != 0);
    (i - 1) / arity
}

/// The nth children, for `n` in `1..=arity`
///
/// ```
/// use pow2heap::heap_primitives::index_nth_child;
/// assert_eq!(index_nth_child(2, 0, 1), 1);
/// assert_eq!(index_nth_child(2, 0, 2), 2);
/// assert_eq!(index_nth_child(2, 2, 1), 5);
/// assert_eq!(index_nth_child(4, 0, 3), 3);
/// assert_eq!(index_nth_child(4, 1, 1), 5);
/// assert_eq!(index_nth_child(4, 1, 4), 8);
/// assert_eq!(index_nth_child(4, 4, 4), 20);
/// ```
#[inline(always)]
#[must_use]
pub fn index_nth_child(arity: usize, i: usize, n: usize) -> usize {
    debug_assert!(1 <= n && n <= arity);
    (arity * i) + n
}

/// The first children
///
/// ```
/// use pow2heap::heap_primitives::index_first_child;
/// assert_eq!(index_first_child(2, 0), 1);
/// assert_eq!(index_first_child(2, 1), 3);
/// assert_eq!(index_first_child(4, 0), 1);
/// assert_eq!(index_first_child(4, 1), 5);
/// assert_eq!(index_first_child(4, 4), 17);
/// ```
#[inline(always)]
#[must_use]
pub fn index_first_child(arity: usize, i: usize) -> usize {
    (arity * i) + 1
}

/// The last children
///
/// ```
/// use pow2heap::heap_primitives::index_last_child;
/// assert_eq!(index_last_child(2, 0), 2);
/// assert_eq!(index_last_child(2, 1), 4);
/// assert_eq!(index_last_child(4, 0), 4);
/// assert_eq!(index_last_child(4, 1), 8);
/// assert_eq!(index_last_child(4, 4), 20);
/// ```
#[inline(always)]
#[must_use]
pub fn index_last_child(arity: usize, i: usize) -> usize {
    arity * (i + 1)
}

/// Index of the largest element of a slice.
///
/// Uses a strict `>` to displace the running best, so ties keep the earliest
/// index.
///
/// ```
/// use pow2heap::heap_primitives::linear_max_index;
/// assert_eq!(linear_max_index(&[3u8]), 0);
/// assert_eq!(linear_max_index(&[3u8, 9u8, 7u8]), 1);
/// assert_eq!(linear_max_index(&[3u8, 9u8, 9u8, 7u8]), 1);
/// ```
#[must_use]
pub fn linear_max_index<T: Ord>(xs: &[T]) -> usize {
    assert!(!xs.is_empty());

    let mut max_i = 0;
    for (i, x) in xs.iter().enumerate() {
        if *x > xs[max_i] {
            max_i = i;
        }
    }
    max_i
}
