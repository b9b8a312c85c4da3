//! Backing storage for a table's slots.
//!
//! The map is generic over [`SlotStorage`], which decides where the slot
//! array lives and whether the table may reallocate it:
//!
//! | Backend           | Memory                      | Grow / shrink |
//! |-------------------|-----------------------------|---------------|
//! | [`HeapStorage`]   | owned boxed slice           | yes           |
//! | [`BufferStorage`] | caller's `&mut [Slot]`      | no            |
//! | [`InlineStorage`] | `[Slot; N]` inside the map  | no            |

use alloc::boxed::Box;
use core::fmt::Debug;

use crate::slot::Slot;

/// Provides the slot array of a table.
///
/// Storage lengths are validated by the map at construction: a storage whose
/// slot count is zero or not a power of two is rejected.
pub trait SlotStorage<K, V> {
    /// Whether [`allocate`](SlotStorage::allocate) can produce new storage.
    const RESIZABLE: bool;

    /// The slot array.
    fn slots(&self) -> &[Slot<K, V>];

    /// The slot array, mutably.
    fn slots_mut(&mut self) -> &mut [Slot<K, V>];

    /// Fresh storage of `capacity` empty slots, or `None` if this backend
    /// cannot provide memory of its own.
    fn allocate(&self, capacity: usize) -> Option<Self>
    where
        Self: Sized;
}

/// Heap-allocated slots owned by the table. The only backend that can grow
/// and shrink.
pub struct HeapStorage<K, V> {
    slots: Box<[Slot<K, V>]>,
}

impl<K, V> HeapStorage<K, V> {
    /// Allocates `capacity` empty slots.
    pub fn with_capacity(capacity: usize) -> Self {
        HeapStorage {
            slots: core::iter::repeat_with(Slot::new).take(capacity).collect(),
        }
    }
}

impl<K, V> SlotStorage<K, V> for HeapStorage<K, V> {
    const RESIZABLE: bool = true;

    #[inline(always)]
    fn slots(&self) -> &[Slot<K, V>] {
        &self.slots
    }

    #[inline(always)]
    fn slots_mut(&mut self) -> &mut [Slot<K, V>] {
        &mut self.slots
    }

    fn allocate(&self, capacity: usize) -> Option<Self> {
        Some(HeapStorage::with_capacity(capacity))
    }
}

impl<K, V> Clone for HeapStorage<K, V>
where
    K: Clone,
    V: Clone,
{
    fn clone(&self) -> Self {
        HeapStorage {
            slots: self.slots.clone(),
        }
    }
}

impl<K, V> Debug for HeapStorage<K, V> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("HeapStorage")
            .field("capacity", &self.slots.len())
            .finish()
    }
}

/// Slots borrowed from the caller. The table never grows or shrinks them.
///
/// Entries still in the buffer when the map is dropped stay there and are
/// dropped with the buffer.
pub struct BufferStorage<'a, K, V> {
    slots: &'a mut [Slot<K, V>],
}

impl<'a, K, V> BufferStorage<'a, K, V> {
    /// Wraps `slots`.
    pub fn new(slots: &'a mut [Slot<K, V>]) -> Self {
        BufferStorage { slots }
    }
}

impl<K, V> SlotStorage<K, V> for BufferStorage<'_, K, V> {
    const RESIZABLE: bool = false;

    #[inline(always)]
    fn slots(&self) -> &[Slot<K, V>] {
        &*self.slots
    }

    #[inline(always)]
    fn slots_mut(&mut self) -> &mut [Slot<K, V>] {
        &mut *self.slots
    }

    fn allocate(&self, _capacity: usize) -> Option<Self> {
        None
    }
}

impl<K, V> Debug for BufferStorage<'_, K, V> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("BufferStorage")
            .field("capacity", &self.slots.len())
            .finish()
    }
}

/// `N` slots stored inline, sized at compile time. Never grows or shrinks.
pub struct InlineStorage<K, V, const N: usize> {
    slots: [Slot<K, V>; N],
}

impl<K, V, const N: usize> InlineStorage<K, V, N> {
    /// `N` empty slots.
    pub const fn new() -> Self {
        InlineStorage {
            slots: [const { Slot::new() }; N],
        }
    }
}

impl<K, V, const N: usize> Default for InlineStorage<K, V, N> {
    fn default() -> Self {
        InlineStorage::new()
    }
}

impl<K, V, const N: usize> SlotStorage<K, V> for InlineStorage<K, V, N> {
    const RESIZABLE: bool = false;

    #[inline(always)]
    fn slots(&self) -> &[Slot<K, V>] {
        &self.slots
    }

    #[inline(always)]
    fn slots_mut(&mut self) -> &mut [Slot<K, V>] {
        &mut self.slots
    }

    fn allocate(&self, _capacity: usize) -> Option<Self> {
        None
    }
}

impl<K, V, const N: usize> Clone for InlineStorage<K, V, N>
where
    K: Clone,
    V: Clone,
{
    fn clone(&self) -> Self {
        InlineStorage {
            slots: self.slots.clone(),
        }
    }
}

impl<K, V, const N: usize> Debug for InlineStorage<K, V, N> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("InlineStorage")
            .field("capacity", &N)
            .finish()
    }
}
