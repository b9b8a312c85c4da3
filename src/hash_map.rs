use alloc::vec;
use alloc::vec::Vec;
use core::fmt::Debug;
#[cfg(any(feature = "foldhash", feature = "std"))]
use core::hash::Hash;
use core::marker::PhantomData;

use crate::context::DefaultContext;
use crate::context::KeyContext;
use crate::error::Error;
use crate::error::Result;
use crate::math;
use crate::options::Options;
use crate::slot::MAX_PROBE_DISTANCE;
use crate::slot::Metadata;
use crate::slot::Slot;
use crate::storage::BufferStorage;
use crate::storage::HeapStorage;
use crate::storage::InlineStorage;
use crate::storage::SlotStorage;

/// A map over caller-supplied slots.
pub type BufferMap<'a, K, V, C = DefaultContext> = RobinHoodMap<K, V, C, BufferStorage<'a, K, V>>;

/// A map over `N` inline slots.
pub type InlineMap<K, V, const N: usize, C = DefaultContext> =
    RobinHoodMap<K, V, C, InlineStorage<K, V, N>>;

/// An open-addressing hash map using Robin Hood probing and backward-shift
/// deletion.
///
/// Each key lives in a [`Slot`] at or after its ideal index
/// `hash & (capacity - 1)`. On insert, an entry that has probed further than
/// a resident takes the resident's slot and the resident keeps probing, which
/// keeps probe distances short and even. Lookups stop as soon as they meet a
/// resident closer to home than the search, and removals pull the rest of the
/// cluster back one slot instead of leaving tombstones.
///
/// Keys are hashed and compared through a [`KeyContext`] (`C`). Slots come
/// from a [`SlotStorage`] (`S`): [`HeapStorage`] grows and shrinks, while
/// [`BufferStorage`] and [`InlineStorage`] have a fixed slot count and report
/// [`Error::CapacityExhausted`] when full.
///
/// ## Performance Characteristics
///
/// - **Memory**: 1 byte of metadata per slot, plus the size of `K` and `V`.
/// - **Probe distance**: at most 127. An insert that would need more fails
///   with [`Error::ProbeDistanceOverflow`] and leaves the table unchanged.
///
/// ## Example
///
/// ```rust
/// use robin_hash::RobinHoodMap;
///
/// let mut map = RobinHoodMap::new();
/// map.insert("alice", 1).unwrap();
/// map.insert("bob", 2).unwrap();
///
/// assert_eq!(map.get(&"alice"), Some(&1));
/// assert!(map.remove(&"alice"));
/// assert!(!map.contains_key(&"alice"));
/// assert_eq!(map.len(), 1);
/// ```
#[derive(Clone)]
pub struct RobinHoodMap<K, V, C = DefaultContext, S = HeapStorage<K, V>> {
    storage: S,
    count: usize,
    grow_threshold: usize,
    options: Options,
    context: C,
    _phantom: PhantomData<(K, V)>,
}

impl<K, V, C, S> Debug for RobinHoodMap<K, V, C, S>
where
    K: Debug,
    V: Debug,
    S: SlotStorage<K, V>,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

#[cfg(any(feature = "foldhash", feature = "std"))]
impl<K, V> RobinHoodMap<K, V>
where
    K: Hash + Eq,
{
    /// Creates an empty heap-backed map with default [`Options`] and the
    /// default hasher.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use robin_hash::RobinHoodMap;
    ///
    /// let map: RobinHoodMap<u64, String> = RobinHoodMap::new();
    /// assert!(map.is_empty());
    /// assert_eq!(map.capacity(), 64);
    /// ```
    pub fn new() -> Self {
        let options = Options::default();
        RobinHoodMap {
            storage: HeapStorage::with_capacity(options.init_capacity),
            count: 0,
            grow_threshold: math::grow_threshold(
                options.init_capacity,
                options.grow_threshold_fraction(),
            ),
            options,
            context: DefaultContext::default(),
            _phantom: PhantomData,
        }
    }

    /// Creates an empty heap-backed map with `options` and the default
    /// hasher.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidConfiguration`] if `options` fails
    /// [`Options::validate`].
    ///
    /// # Examples
    ///
    /// ```rust
    /// use robin_hash::Error;
    /// use robin_hash::Options;
    /// use robin_hash::RobinHoodMap;
    ///
    /// let options = Options::default().with_init_capacity(4).with_growable(false);
    /// let mut map = RobinHoodMap::with_options(options).unwrap();
    /// for key in 0..4 {
    ///     map.insert(key, key).unwrap();
    /// }
    /// assert_eq!(map.insert(4, 4), Err(Error::CapacityExhausted));
    ///
    /// assert!(RobinHoodMap::<u8, u8>::with_options(Options::default().with_init_capacity(3)).is_err());
    /// ```
    pub fn with_options(options: Options) -> Result<Self> {
        Self::with_options_and_context(options, DefaultContext::default())
    }
}

#[cfg(any(feature = "foldhash", feature = "std"))]
impl<K, V> Default for RobinHoodMap<K, V>
where
    K: Hash + Eq,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, C> RobinHoodMap<K, V, C>
where
    C: KeyContext<K>,
{
    /// Creates an empty heap-backed map with `options`, hashing and comparing
    /// keys through `context`.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidConfiguration`] if `options` fails
    /// [`Options::validate`].
    pub fn with_options_and_context(options: Options, context: C) -> Result<Self> {
        options.validate()?;
        let storage = HeapStorage::with_capacity(options.init_capacity);
        Self::with_storage(storage, options, context)
    }
}

impl<'a, K, V, C> RobinHoodMap<K, V, C, BufferStorage<'a, K, V>>
where
    C: KeyContext<K>,
{
    /// Creates an empty map over `buffer`.
    ///
    /// The slot count is `buffer.len()` and never changes; `init_capacity`,
    /// `growable` and `shrinkable` in `options` are ignored. Entries already
    /// in `buffer` are dropped.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidConfiguration`] if `buffer` is empty or its length is
    /// not a power of two, or the threshold fraction is out of range.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use robin_hash::DefaultContext;
    /// use robin_hash::Options;
    /// use robin_hash::RobinHoodMap;
    /// use robin_hash::Slot;
    ///
    /// let mut buffer: [Slot<u32, &str>; 8] = Default::default();
    /// let mut map =
    ///     RobinHoodMap::with_buffer(&mut buffer, Options::default(), DefaultContext::default())
    ///         .unwrap();
    /// map.insert(1, "one").unwrap();
    /// assert_eq!(map.capacity(), 8);
    /// ```
    pub fn with_buffer(buffer: &'a mut [Slot<K, V>], options: Options, context: C) -> Result<Self> {
        Self::with_storage(BufferStorage::new(buffer), options, context)
    }
}

impl<K, V, C, const N: usize> RobinHoodMap<K, V, C, InlineStorage<K, V, N>>
where
    C: KeyContext<K>,
{
    /// Creates an empty map over `N` inline slots.
    ///
    /// `N` must be a non-zero power of two. Like [`with_buffer`], the slot
    /// count is fixed and the sizing options are ignored.
    ///
    /// [`with_buffer`]: RobinHoodMap::with_buffer
    ///
    /// # Examples
    ///
    /// ```rust
    /// use robin_hash::DefaultContext;
    /// use robin_hash::InlineMap;
    /// use robin_hash::Options;
    ///
    /// let mut map =
    ///     InlineMap::<u8, u8, 4>::with_inline(Options::default(), DefaultContext::default())
    ///         .unwrap();
    /// map.insert(1, 2).unwrap();
    /// assert_eq!(map.get(&1), Some(&2));
    /// ```
    pub fn with_inline(options: Options, context: C) -> Result<Self> {
        Self::with_storage(InlineStorage::new(), options, context)
    }
}

impl<K, V, C, S> RobinHoodMap<K, V, C, S>
where
    C: KeyContext<K>,
    S: SlotStorage<K, V>,
{
    /// Creates an empty map over `storage`.
    ///
    /// `options.init_capacity` is replaced by the storage's slot count. Fixed
    /// storage turns `growable` and `shrinkable` off. Any entries already in
    /// `storage` are dropped.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidConfiguration`] if the slot count is zero or not a
    /// power of two, or the threshold fraction is out of range.
    pub fn with_storage(mut storage: S, mut options: Options, context: C) -> Result<Self> {
        let capacity = storage.slots().len();
        options.init_capacity = capacity;
        if !S::RESIZABLE {
            options.growable = false;
            options.shrinkable = false;
        }
        options.validate()?;
        let grow_threshold = math::grow_threshold(capacity, options.grow_threshold_fraction());

        storage.slots_mut().iter_mut().for_each(Slot::clear);

        Ok(RobinHoodMap {
            storage,
            count: 0,
            grow_threshold,
            options,
            context,
            _phantom: PhantomData,
        })
    }

    /// Returns the number of entries in the map.
    pub fn len(&self) -> usize {
        self.count
    }

    /// Returns `true` if the map holds no entries.
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Returns the number of slots. Always a power of two.
    pub fn capacity(&self) -> usize {
        self.storage.slots().len()
    }

    /// Returns the occupancy at which the next insert grows the table.
    pub fn grow_threshold(&self) -> usize {
        self.grow_threshold
    }

    /// Returns the options in effect.
    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Returns the key context.
    pub fn context(&self) -> &C {
        &self.context
    }

    #[inline(always)]
    fn can_grow(&self) -> bool {
        S::RESIZABLE && self.options.growable
    }

    #[inline(always)]
    fn can_shrink(&self) -> bool {
        S::RESIZABLE && self.options.shrinkable
    }

    #[inline(always)]
    fn ideal_index(&self, key: &K, capacity: usize) -> usize {
        math::fast_mod(self.context.hash(key) as usize, capacity)
    }

    /// Inserts a key-value pair.
    ///
    /// If the key is already present its value is replaced in place and the
    /// old value returned; this never grows the table and succeeds even when
    /// the table is full. Otherwise the table grows first if it has reached
    /// its grow threshold.
    ///
    /// # Errors
    ///
    /// - [`Error::CapacityExhausted`] if the table is full and cannot grow.
    /// - [`Error::ProbeDistanceOverflow`] if placing the key would need a
    ///   probe distance above 127, even after growing once.
    /// - [`Error::ArithmeticOverflow`] if the doubled capacity overflows.
    ///
    /// On error the table is unchanged apart from a possible grow.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use robin_hash::RobinHoodMap;
    ///
    /// let mut map = RobinHoodMap::new();
    /// assert_eq!(map.insert(1, "a"), Ok(None));
    /// assert_eq!(map.insert(1, "b"), Ok(Some("a")));
    /// assert_eq!(map.len(), 1);
    /// ```
    pub fn insert(&mut self, key: K, value: V) -> Result<Option<V>> {
        if let Some(index) = self.find_index(&key) {
            return Ok(Some(self.storage.slots_mut()[index].replace_value(value)));
        }

        let grown = self.reserve_for_insert()?;

        let mut start = self.ideal_index(&key, self.capacity());
        if let Err(err) = plan_insert(self.storage.slots(), start) {
            if grown || !self.can_grow() {
                log::trace!("rejecting insert at {} of {} slots: {err}", self.count, self.capacity());
                return Err(err);
            }
            self.grow()?;
            start = self.ideal_index(&key, self.capacity());
            plan_insert(self.storage.slots(), start).inspect_err(|err| {
                log::trace!("rejecting insert after grow to {} slots: {err}", self.capacity());
            })?;
        }

        place(self.storage.slots_mut(), start, key, value)?;
        self.count += 1;
        Ok(None)
    }

    /// Makes room for one new entry: grows at the threshold, or fails when a
    /// table that cannot grow is full. Returns whether the table grew.
    fn reserve_for_insert(&mut self) -> Result<bool> {
        if self.count >= self.grow_threshold && self.can_grow() {
            self.grow()?;
            return Ok(true);
        }
        if self.count == self.capacity() {
            log::trace!("rejecting insert: all {} slots occupied", self.count);
            return Err(Error::CapacityExhausted);
        }
        Ok(false)
    }

    /// Returns a reference to the value for `key`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use robin_hash::RobinHoodMap;
    ///
    /// let mut map = RobinHoodMap::new();
    /// map.insert("k", 10).unwrap();
    /// assert_eq!(map.get(&"k"), Some(&10));
    /// assert_eq!(map.get(&"missing"), None);
    /// ```
    #[inline]
    pub fn get(&self, key: &K) -> Option<&V> {
        let index = self.find_index(key)?;
        self.storage.slots()[index].value()
    }

    /// Returns the stored key and value for `key`.
    #[inline]
    pub fn get_key_value(&self, key: &K) -> Option<(&K, &V)> {
        let index = self.find_index(key)?;
        self.storage.slots()[index].entry()
    }

    /// Returns a mutable reference to the value for `key`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use robin_hash::RobinHoodMap;
    ///
    /// let mut map = RobinHoodMap::new();
    /// map.insert(3, vec![1]).unwrap();
    /// map.get_mut(&3).unwrap().push(2);
    /// assert_eq!(map.get(&3), Some(&vec![1, 2]));
    /// ```
    #[inline]
    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        let index = self.find_index(key)?;
        self.storage.slots_mut()[index]
            .entry_mut()
            .map(|(_, value)| value)
    }

    /// Returns `true` if the map holds `key`.
    #[inline]
    pub fn contains_key(&self, key: &K) -> bool {
        self.find_index(key).is_some()
    }

    /// Walks the probe sequence of `key` and returns its slot index.
    ///
    /// The walk stops at the first empty slot or the first resident whose
    /// probe distance is below the search distance: had the key been there,
    /// it would have displaced that resident on insert.
    fn find_index(&self, key: &K) -> Option<usize> {
        if self.count == 0 {
            return None;
        }

        let slots = self.storage.slots();
        let mut index = self.ideal_index(key, slots.len());
        let mut distance = 0u8;
        loop {
            let slot = &slots[index];
            if slot.is_empty() || slot.probe_distance() < distance {
                return None;
            }
            if slot
                .key()
                .is_some_and(|resident| self.context.eql(resident, key))
            {
                return Some(index);
            }
            if distance == MAX_PROBE_DISTANCE {
                return None;
            }
            distance += 1;
            index = math::fast_mod(index + 1, slots.len());
        }
    }

    /// Removes `key` from the map. Returns `true` if it was present.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use robin_hash::RobinHoodMap;
    ///
    /// let mut map = RobinHoodMap::new();
    /// map.insert(42, "x").unwrap();
    /// assert!(map.remove(&42));
    /// assert!(!map.remove(&42));
    /// ```
    pub fn remove(&mut self, key: &K) -> bool {
        self.remove_entry(key).is_some()
    }

    /// Removes `key` and returns the stored key and value.
    ///
    /// May halve the capacity afterwards, see [`Options::shrinkable`].
    ///
    /// # Examples
    ///
    /// ```rust
    /// use robin_hash::RobinHoodMap;
    ///
    /// let mut map = RobinHoodMap::new();
    /// map.insert(String::from("k"), 1).unwrap();
    /// assert_eq!(map.remove_entry(&String::from("k")), Some((String::from("k"), 1)));
    /// assert!(map.is_empty());
    /// ```
    pub fn remove_entry(&mut self, key: &K) -> Option<(K, V)> {
        let index = self.find_index(key)?;
        let entry = self.remove_at(index)?;
        self.maybe_shrink();
        Some(entry)
    }

    /// Empties the slot at `index` and shifts the following cluster members
    /// back by one until an empty slot or an entry already at home.
    fn remove_at(&mut self, index: usize) -> Option<(K, V)> {
        let slots = self.storage.slots_mut();
        let len = slots.len();
        let entry = slots[index].take()?;

        let mut hole = index;
        for _ in 1..len {
            let next = math::fast_mod(hole + 1, len);
            let follower = &slots[next];
            if follower.is_empty() || follower.probe_distance() == 0 {
                break;
            }
            slots.swap(hole, next);
            slots[hole].shift_back();
            hole = next;
        }

        self.count -= 1;
        Some(entry)
    }

    /// Removes every entry, keeping the capacity.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use robin_hash::RobinHoodMap;
    ///
    /// let mut map = RobinHoodMap::new();
    /// map.insert(1, 1).unwrap();
    /// map.clear();
    /// assert!(map.is_empty());
    /// assert_eq!(map.capacity(), 64);
    /// ```
    pub fn clear(&mut self) {
        self.storage.slots_mut().iter_mut().for_each(Slot::clear);
        self.count = 0;
    }

    /// Ensures `additional` more entries fit without growing.
    ///
    /// # Errors
    ///
    /// - [`Error::CapacityExhausted`] if the table cannot grow and has fewer
    ///   than `additional` free slots.
    /// - [`Error::ArithmeticOverflow`] if the required capacity overflows.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use robin_hash::RobinHoodMap;
    ///
    /// let mut map: RobinHoodMap<u32, u32> = RobinHoodMap::new();
    /// map.reserve(1000).unwrap();
    /// let capacity = map.capacity();
    /// for i in 0..1000 {
    ///     map.insert(i, i).unwrap();
    /// }
    /// assert_eq!(map.capacity(), capacity);
    /// ```
    pub fn reserve(&mut self, additional: usize) -> Result<()> {
        if !self.can_grow() {
            let free = math::checked_sub(self.capacity(), self.count)?;
            if additional > free {
                return Err(Error::CapacityExhausted);
            }
            return Ok(());
        }

        let required = math::checked_add(self.count, additional)?;
        let fraction = self.options.grow_threshold_fraction();
        let mut capacity = self.capacity().max(math::next_power_of_two(required)?);
        while math::grow_threshold(capacity, fraction) < required {
            capacity = math::checked_mul(capacity, 2)?;
        }
        if capacity > self.capacity() {
            self.resize(capacity)?;
        }
        Ok(())
    }

    /// Shrinks heap storage to the smallest power of two, no smaller than
    /// `init_capacity`, that holds the current entries below the grow
    /// threshold. Does nothing for fixed storage. Runs regardless of
    /// [`Options::shrinkable`].
    ///
    /// # Errors
    ///
    /// [`Error::ProbeDistanceOverflow`] if the entries cannot be placed in the
    /// smaller table; the table is left as it was.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use robin_hash::Options;
    /// use robin_hash::RobinHoodMap;
    ///
    /// let mut map = RobinHoodMap::with_options(
    ///     Options::default().with_init_capacity(4).with_shrinkable(false),
    /// )
    /// .unwrap();
    /// for i in 0..100 {
    ///     map.insert(i, i).unwrap();
    /// }
    /// for i in 2..100 {
    ///     map.remove(&i);
    /// }
    /// map.shrink_to_fit().unwrap();
    /// assert_eq!(map.capacity(), 4);
    /// ```
    pub fn shrink_to_fit(&mut self) -> Result<()> {
        if !S::RESIZABLE {
            return Ok(());
        }

        let fraction = self.options.grow_threshold_fraction();
        let mut capacity = self.options.init_capacity;
        while capacity < self.capacity() && math::grow_threshold(capacity, fraction) < self.count {
            capacity = math::checked_mul(capacity, 2)?;
        }
        if capacity < self.capacity() {
            self.resize(capacity)?;
        }
        Ok(())
    }

    /// Doubles the capacity.
    fn grow(&mut self) -> Result<()> {
        let capacity = math::checked_mul(self.capacity(), 2)?;
        self.resize(capacity)
    }

    /// Halves the capacity once occupancy falls under a quarter, staying at or
    /// above `init_capacity`. A shrink that cannot place every entry is
    /// skipped.
    fn maybe_shrink(&mut self) {
        let capacity = self.capacity();
        if !self.can_shrink() || self.count >= capacity / 4 {
            return;
        }
        let target = capacity / 2;
        if target < self.options.init_capacity {
            return;
        }
        if let Err(err) = self.resize(target) {
            log::debug!("skipping shrink from {capacity} to {target} slots: {err}");
        }
    }

    /// Moves every entry into fresh storage of `capacity` slots.
    ///
    /// The placement is first planned on a metadata-only shadow table, so a
    /// rehash that would overflow a probe distance fails before any entry
    /// moves. Each key is hashed once, by the plan, and the move reuses those
    /// start indices.
    fn resize(&mut self, capacity: usize) -> Result<()> {
        debug_assert!(capacity.is_power_of_two());
        debug_assert!(capacity >= self.count);

        let grow_threshold =
            math::grow_threshold(capacity, self.options.grow_threshold_fraction());
        let starts = self.plan_rehash(capacity)?;
        let Some(mut storage) = self.storage.allocate(capacity) else {
            return Err(Error::CapacityExhausted);
        };

        let occupied = self.storage.slots_mut().iter_mut().filter(|slot| !slot.is_empty());
        for (slot, start) in occupied.zip(starts) {
            if let Some((key, value)) = slot.take() {
                place(storage.slots_mut(), start, key, value)?;
            }
        }

        log::debug!(
            "resized table from {} to {capacity} slots holding {} entries",
            self.capacity(),
            self.count
        );
        self.storage = storage;
        self.grow_threshold = grow_threshold;
        Ok(())
    }

    /// Replays the rehash into `capacity` slots on metadata alone and returns
    /// the start index of every entry in slot order.
    fn plan_rehash(&self, capacity: usize) -> Result<Vec<usize>> {
        let mut shadow = vec![Metadata::EMPTY; capacity];
        let mut starts = Vec::with_capacity(self.count);
        for (key, _) in self.storage.slots().iter().filter_map(Slot::entry) {
            let start = self.ideal_index(key, capacity);
            shadow_insert(&mut shadow, start)?;
            starts.push(start);
        }
        Ok(starts)
    }

    /// Inserts every pair from `iter`, stopping at the first error.
    ///
    /// # Errors
    ///
    /// The first error [`insert`](RobinHoodMap::insert) returns. Pairs
    /// inserted before it stay in the map.
    pub fn try_extend<I>(&mut self, iter: I) -> Result<()>
    where
        I: IntoIterator<Item = (K, V)>,
    {
        for (key, value) in iter {
            self.insert(key, value)?;
        }
        Ok(())
    }
}

impl<K, V, C, S> RobinHoodMap<K, V, C, S>
where
    S: SlotStorage<K, V>,
{
    /// Returns an iterator over the entries in slot order.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use robin_hash::RobinHoodMap;
    ///
    /// let mut map = RobinHoodMap::new();
    /// map.insert(1, 10).unwrap();
    /// map.insert(2, 20).unwrap();
    /// let mut pairs: Vec<_> = map.iter().map(|(k, v)| (*k, *v)).collect();
    /// pairs.sort();
    /// assert_eq!(pairs, vec![(1, 10), (2, 20)]);
    /// ```
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            slots: self.storage.slots().iter(),
            remaining: self.count,
        }
    }

    /// Returns an iterator over the entries with mutable values.
    pub fn iter_mut(&mut self) -> IterMut<'_, K, V> {
        IterMut {
            remaining: self.count,
            slots: self.storage.slots_mut().iter_mut(),
        }
    }

    /// Returns an iterator over the keys.
    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys { inner: self.iter() }
    }

    /// Returns an iterator over the values.
    pub fn values(&self) -> Values<'_, K, V> {
        Values { inner: self.iter() }
    }

    /// Returns an iterator over mutable references to the values.
    pub fn values_mut(&mut self) -> ValuesMut<'_, K, V> {
        ValuesMut {
            inner: self.iter_mut(),
        }
    }

    /// Removes and yields every entry, keeping the capacity.
    ///
    /// The map is empty once the iterator is dropped, even if it was not
    /// exhausted.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use robin_hash::RobinHoodMap;
    ///
    /// let mut map = RobinHoodMap::new();
    /// map.insert(1, "a").unwrap();
    /// map.insert(2, "b").unwrap();
    /// let mut drained: Vec<_> = map.drain().collect();
    /// drained.sort();
    /// assert_eq!(drained, vec![(1, "a"), (2, "b")]);
    /// assert!(map.is_empty());
    /// ```
    pub fn drain(&mut self) -> Drain<'_, K, V> {
        Drain {
            slots: self.storage.slots_mut().iter_mut(),
            count: &mut self.count,
        }
    }

    /// Returns how many entries sit at each probe distance.
    #[cfg(feature = "stats")]
    pub fn probe_histogram(&self) -> [usize; MAX_PROBE_DISTANCE as usize + 1] {
        let mut histogram = [0; MAX_PROBE_DISTANCE as usize + 1];
        for slot in self.storage.slots().iter().filter(|slot| !slot.is_empty()) {
            histogram[slot.probe_distance() as usize] += 1;
        }
        histogram
    }

    /// Returns the largest probe distance of any entry. Zero when empty.
    #[cfg(feature = "stats")]
    pub fn max_probe_distance(&self) -> u8 {
        self.storage
            .slots()
            .iter()
            .map(Slot::probe_distance)
            .max()
            .unwrap_or(0)
    }
}

/// Walks the displacement chain an insert starting at `start` would follow,
/// without moving anything.
///
/// The carried distance drops to the resident's whenever the insert would
/// displace it, exactly as in [`place`].
fn plan_insert<K, V>(slots: &[Slot<K, V>], start: usize) -> Result<()> {
    let len = slots.len();
    let mut index = start;
    let mut distance = 0u8;
    for _ in 0..len {
        let resident = slots[index].metadata();
        if resident.is_empty() {
            return Ok(());
        }
        if resident.probe_distance() < distance {
            distance = resident.probe_distance();
        }
        if distance == MAX_PROBE_DISTANCE {
            return Err(Error::ProbeDistanceOverflow);
        }
        distance += 1;
        index = math::fast_mod(index + 1, len);
    }
    Err(Error::CapacityExhausted)
}

/// [`place`] on a table of bare metadata.
fn shadow_insert(shadow: &mut [Metadata], start: usize) -> Result<()> {
    let len = shadow.len();
    let mut index = start;
    let mut distance = 0u8;
    for _ in 0..len {
        let resident = &mut shadow[index];
        if resident.is_empty() {
            *resident = Metadata::occupied(distance)?;
            return Ok(());
        }
        if resident.probe_distance() < distance {
            let displaced = resident.probe_distance();
            resident.set_probe_distance(distance)?;
            distance = displaced;
        }
        if distance == MAX_PROBE_DISTANCE {
            return Err(Error::ProbeDistanceOverflow);
        }
        distance += 1;
        index = math::fast_mod(index + 1, len);
    }
    Err(Error::CapacityExhausted)
}

/// Robin Hood placement of a key known to be absent.
///
/// Callers plan the insert first; a failure here drops the carried entry.
fn place<K, V>(slots: &mut [Slot<K, V>], start: usize, key: K, value: V) -> Result<()> {
    let len = slots.len();
    let mut index = start;
    let mut distance = 0u8;
    let (mut key, mut value) = (key, value);
    for _ in 0..len {
        let slot = &mut slots[index];
        if slot.is_empty() {
            return slot
                .fill(key, value, distance)
                .map_err(|_| Error::ProbeDistanceOverflow);
        }
        // Steal from the rich: a resident closer to home gives up its slot.
        if slot.probe_distance() < distance {
            slot.swap_entry(&mut key, &mut value, &mut distance);
        }
        if distance == MAX_PROBE_DISTANCE {
            return Err(Error::ProbeDistanceOverflow);
        }
        distance += 1;
        index = math::fast_mod(index + 1, len);
    }
    Err(Error::CapacityExhausted)
}

/// An iterator over the entries of a [`RobinHoodMap`].
pub struct Iter<'a, K, V> {
    slots: core::slice::Iter<'a, Slot<K, V>>,
    remaining: usize,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let entry = self.slots.by_ref().find_map(Slot::entry)?;
        self.remaining -= 1;
        Some(entry)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

impl<K, V> Clone for Iter<'_, K, V> {
    fn clone(&self) -> Self {
        Iter {
            slots: self.slots.clone(),
            remaining: self.remaining,
        }
    }
}

/// An iterator over the entries of a [`RobinHoodMap`] with mutable values.
pub struct IterMut<'a, K, V> {
    slots: core::slice::IterMut<'a, Slot<K, V>>,
    remaining: usize,
}

impl<'a, K, V> Iterator for IterMut<'a, K, V> {
    type Item = (&'a K, &'a mut V);

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let entry = self.slots.by_ref().find_map(Slot::entry_mut)?;
        self.remaining -= 1;
        Some(entry)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for IterMut<'_, K, V> {}

/// An iterator over the keys of a [`RobinHoodMap`].
pub struct Keys<'a, K, V> {
    inner: Iter<'a, K, V>,
}

impl<'a, K, V> Iterator for Keys<'a, K, V> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(key, _)| key)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for Keys<'_, K, V> {}

/// An iterator over the values of a [`RobinHoodMap`].
pub struct Values<'a, K, V> {
    inner: Iter<'a, K, V>,
}

impl<'a, K, V> Iterator for Values<'a, K, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, value)| value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for Values<'_, K, V> {}

/// An iterator over mutable references to the values of a [`RobinHoodMap`].
pub struct ValuesMut<'a, K, V> {
    inner: IterMut<'a, K, V>,
}

impl<'a, K, V> Iterator for ValuesMut<'a, K, V> {
    type Item = &'a mut V;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, value)| value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for ValuesMut<'_, K, V> {}

/// A draining iterator over the entries of a [`RobinHoodMap`].
///
/// Entries are moved out of their slots directly; no backward shifting is
/// needed since every slot ends up empty.
pub struct Drain<'a, K, V> {
    slots: core::slice::IterMut<'a, Slot<K, V>>,
    count: &'a mut usize,
}

impl<K, V> Iterator for Drain<'_, K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        if *self.count == 0 {
            return None;
        }
        let entry = self.slots.by_ref().find_map(Slot::take)?;
        *self.count -= 1;
        Some(entry)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (*self.count, Some(*self.count))
    }
}

impl<K, V> ExactSizeIterator for Drain<'_, K, V> {}

impl<K, V> Drop for Drain<'_, K, V> {
    fn drop(&mut self) {
        self.for_each(drop);
    }
}

impl<'a, K, V, C, S> IntoIterator for &'a RobinHoodMap<K, V, C, S>
where
    S: SlotStorage<K, V>,
{
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, K, V, C, S> IntoIterator for &'a mut RobinHoodMap<K, V, C, S>
where
    S: SlotStorage<K, V>,
{
    type Item = (&'a K, &'a mut V);
    type IntoIter = IterMut<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}
