//! Slot storage cell and its packed metadata byte.
//!
//! A slot holds a key, a value and one metadata byte. The byte is the single
//! source of truth for whether the key and value are initialized:
//!
//! ```text
//!   bit  7     6 5 4 3 2 1 0
//!      [occ] [probe distance]
//! ```
//!
//! - `OCCUPIED_MASK` (`0b1000_0000`) is set while the slot holds an entry.
//! - `DISTANCE_MASK` (`0b0111_1111`) is how far the entry sits from its ideal
//!   index, so distances top out at [`MAX_PROBE_DISTANCE`].
//!
//! An empty slot always has metadata `0`.

use core::fmt::Debug;
use core::mem::MaybeUninit;

use crate::error::Error;
use crate::error::Result;

/// Bit marking a slot as occupied.
pub const OCCUPIED_MASK: u8 = 0b1000_0000;

/// Bits holding the probe distance.
pub const DISTANCE_MASK: u8 = 0b0111_1111;

/// Largest probe distance a slot can record.
pub const MAX_PROBE_DISTANCE: u8 = DISTANCE_MASK;

/// Occupancy flag and probe distance packed into one byte.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Metadata(u8);

impl Metadata {
    /// Metadata of an empty slot.
    pub const EMPTY: Metadata = Metadata(0);

    /// Metadata of an occupied slot at `distance`.
    ///
    /// Fails with [`Error::ProbeDistanceOverflow`] if `distance` does not fit
    /// in seven bits.
    #[inline]
    pub fn occupied(distance: u8) -> Result<Self> {
        let mut metadata = Metadata::EMPTY;
        metadata.set_empty(false);
        metadata.set_probe_distance(distance)?;
        Ok(metadata)
    }

    /// The raw byte.
    #[inline(always)]
    pub const fn bits(self) -> u8 {
        self.0
    }

    /// Returns `true` if the occupancy bit is clear.
    #[inline(always)]
    pub const fn is_empty(self) -> bool {
        self.0 & OCCUPIED_MASK == 0
    }

    /// Sets or clears the occupancy bit, leaving the distance untouched.
    #[inline(always)]
    pub fn set_empty(&mut self, empty: bool) {
        if empty {
            self.0 &= !OCCUPIED_MASK;
        } else {
            self.0 |= OCCUPIED_MASK;
        }
    }

    /// The recorded probe distance.
    #[inline(always)]
    pub const fn probe_distance(self) -> u8 {
        self.0 & DISTANCE_MASK
    }

    /// Records `distance`, leaving the occupancy bit untouched.
    ///
    /// A distance above [`MAX_PROBE_DISTANCE`] is rejected and the metadata is
    /// left as it was.
    #[inline]
    pub fn set_probe_distance(&mut self, distance: u8) -> Result<()> {
        if distance > MAX_PROBE_DISTANCE {
            return Err(Error::ProbeDistanceOverflow);
        }
        self.0 = (self.0 & OCCUPIED_MASK) | distance;
        Ok(())
    }

    /// Marks the slot empty and zeroes the distance in one step.
    #[inline(always)]
    pub fn reset(&mut self) {
        self.0 = 0;
    }
}

impl Debug for Metadata {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        if self.is_empty() {
            f.write_str("Metadata(empty)")
        } else {
            write!(f, "Metadata(d={})", self.probe_distance())
        }
    }
}

/// One cell of a table's backing storage.
///
/// Slots are handed to [`RobinHoodMap::with_buffer`] when the caller provides
/// the storage; otherwise they only appear behind the map's own operations.
///
/// [`RobinHoodMap::with_buffer`]: crate::RobinHoodMap::with_buffer
pub struct Slot<K, V> {
    key: MaybeUninit<K>,
    value: MaybeUninit<V>,
    metadata: Metadata,
}

impl<K, V> Slot<K, V> {
    /// Creates an empty slot.
    #[inline]
    pub const fn new() -> Self {
        Slot {
            key: MaybeUninit::uninit(),
            value: MaybeUninit::uninit(),
            metadata: Metadata::EMPTY,
        }
    }

    /// The slot's metadata byte.
    #[inline(always)]
    pub fn metadata(&self) -> Metadata {
        self.metadata
    }

    /// Returns `true` if the slot holds no entry.
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.metadata.is_empty()
    }

    /// Distance of the held entry from its ideal index. Zero when empty.
    #[inline(always)]
    pub fn probe_distance(&self) -> u8 {
        self.metadata.probe_distance()
    }

    /// The held key, if any.
    #[inline]
    pub fn key(&self) -> Option<&K> {
        if self.is_empty() {
            return None;
        }
        // SAFETY: The occupancy bit is only set by `fill`, which initializes the
        // key, and is cleared whenever the key is moved out.
        Some(unsafe { self.key.assume_init_ref() })
    }

    /// The held value, if any.
    #[inline]
    pub fn value(&self) -> Option<&V> {
        if self.is_empty() {
            return None;
        }
        // SAFETY: Occupied slots have an initialized value, see `key`.
        Some(unsafe { self.value.assume_init_ref() })
    }

    #[inline]
    pub(crate) fn entry(&self) -> Option<(&K, &V)> {
        if self.is_empty() {
            return None;
        }
        // SAFETY: Occupied slots have an initialized key and value.
        unsafe { Some((self.key.assume_init_ref(), self.value.assume_init_ref())) }
    }

    #[inline]
    pub(crate) fn entry_mut(&mut self) -> Option<(&K, &mut V)> {
        if self.is_empty() {
            return None;
        }
        // SAFETY: Occupied slots have an initialized key and value.
        unsafe { Some((self.key.assume_init_ref(), self.value.assume_init_mut())) }
    }

    /// Stores an entry in an empty slot.
    ///
    /// The distance is validated before anything is written, so on error the
    /// slot is still empty and the entry is handed back.
    #[inline]
    pub(crate) fn fill(&mut self, key: K, value: V, distance: u8) -> core::result::Result<(), (K, V)> {
        debug_assert!(self.is_empty());
        let Ok(metadata) = Metadata::occupied(distance) else {
            return Err((key, value));
        };
        self.key.write(key);
        self.value.write(value);
        self.metadata = metadata;
        Ok(())
    }

    /// Exchanges the held entry and distance with the carried ones.
    ///
    /// The slot must be occupied and `distance` must fit in seven bits.
    #[inline]
    pub(crate) fn swap_entry(&mut self, key: &mut K, value: &mut V, distance: &mut u8) {
        debug_assert!(!self.is_empty());
        debug_assert!(*distance <= MAX_PROBE_DISTANCE);
        // SAFETY: The slot is occupied, so its key and value are initialized.
        unsafe {
            core::mem::swap(self.key.assume_init_mut(), key);
            core::mem::swap(self.value.assume_init_mut(), value);
        }
        let resident = self.metadata.probe_distance();
        // Cannot fail: the carried distance came from a slot or was checked by
        // the caller against `MAX_PROBE_DISTANCE`.
        let _ = self.metadata.set_probe_distance(*distance);
        *distance = resident;
    }

    /// Replaces the held value, returning the old one.
    #[inline]
    pub(crate) fn replace_value(&mut self, value: V) -> V {
        debug_assert!(!self.is_empty());
        // SAFETY: The slot is occupied, so its value is initialized.
        unsafe { core::mem::replace(self.value.assume_init_mut(), value) }
    }

    /// Moves the entry out and resets the metadata.
    #[inline]
    pub(crate) fn take(&mut self) -> Option<(K, V)> {
        if self.is_empty() {
            return None;
        }
        self.metadata.reset();
        // SAFETY: The slot was occupied. Its metadata is already reset, so the
        // moved-out key and value are never read or dropped again.
        unsafe { Some((self.key.assume_init_read(), self.value.assume_init_read())) }
    }

    /// Drops any held entry and leaves the slot empty.
    #[inline]
    pub(crate) fn clear(&mut self) {
        drop(self.take());
    }

    /// Lowers the distance of an entry that moved one slot closer to its ideal
    /// index during a backward shift.
    #[inline]
    pub(crate) fn shift_back(&mut self) {
        debug_assert!(!self.is_empty());
        debug_assert!(self.probe_distance() > 0);
        let distance = self.metadata.probe_distance() - 1;
        // Cannot fail: the new distance is smaller than a valid one.
        let _ = self.metadata.set_probe_distance(distance);
    }
}

impl<K, V> Default for Slot<K, V> {
    fn default() -> Self {
        Slot::new()
    }
}

impl<K, V> Drop for Slot<K, V> {
    fn drop(&mut self) {
        self.clear();
    }
}

impl<K, V> Clone for Slot<K, V>
where
    K: Clone,
    V: Clone,
{
    fn clone(&self) -> Self {
        let mut slot = Slot::new();
        if let Some((key, value)) = self.entry() {
            slot.key.write(key.clone());
            slot.value.write(value.clone());
            slot.metadata = self.metadata;
        }
        slot
    }
}

impl<K, V> Debug for Slot<K, V>
where
    K: Debug,
    V: Debug,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self.entry() {
            Some((key, value)) => f
                .debug_struct("Slot")
                .field("key", key)
                .field("value", value)
                .field("metadata", &self.metadata)
                .finish(),
            None => f.write_str("Slot(empty)"),
        }
    }
}
