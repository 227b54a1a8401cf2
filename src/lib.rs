// Internals
// ---------
pub mod heap_primitives;

// Data structures
// ---------------
pub mod power_of_two_heap;

pub use power_of_two_heap::ConstructionError;
pub use power_of_two_heap::OverflowError;
pub use power_of_two_heap::PowerOfTwoMaxHeap;
pub use power_of_two_heap::UnderflowError;
