//! Key contexts: how a table hashes and compares its keys.
//!
//! Every constructor of [`RobinHoodMap`](crate::RobinHoodMap) requires
//! `C: KeyContext<K>`, so a context that lacks `hash` or `eql`, or declares
//! them with other signatures, is rejected where the table type is named
//! rather than on first use:
//!
//! ```compile_fail
//! use robin_hash::Options;
//! use robin_hash::RobinHoodMap;
//!
//! // Only knows how to hash.
//! struct HashOnly;
//!
//! impl HashOnly {
//!     fn hash(&self, key: &u32) -> u64 {
//!         u64::from(*key)
//!     }
//! }
//!
//! let map = RobinHoodMap::<u32, u32, HashOnly>::with_options_and_context(
//!     Options::default(),
//!     HashOnly,
//! );
//! ```

use core::fmt::Debug;
use core::hash::BuildHasher;
use core::hash::Hash;

/// The hash and equality pair a table uses for keys of type `K`.
///
/// Keys that compare equal under [`eql`](KeyContext::eql) must produce the
/// same [`hash`](KeyContext::hash). The table relies on this to find them.
pub trait KeyContext<K: ?Sized> {
    /// 64-bit hash of `key`.
    fn hash(&self, key: &K) -> u64;

    /// Returns `true` if `a` and `b` are the same key.
    fn eql(&self, a: &K, b: &K) -> bool;
}

cfg_if::cfg_if! {
    if #[cfg(feature = "foldhash")] {
        /// Hasher builder used by [`DefaultContext`].
        pub type DefaultHashBuilder = foldhash::fast::RandomState;
    } else if #[cfg(feature = "std")] {
        /// Hasher builder used by [`DefaultContext`].
        pub type DefaultHashBuilder = std::hash::RandomState;
    } else {
        /// Stand-in when neither `foldhash` nor `std` is enabled. It has no
        /// values, so [`DefaultContext`] cannot be built and a context must
        /// be supplied.
        pub enum DefaultHashBuilder {}
    }
}

/// Context used when none is given: [`Hash`] + [`Eq`] keys hashed with
/// [`DefaultHashBuilder`].
pub type DefaultContext = HashContext<DefaultHashBuilder>;

/// Context for keys implementing [`Hash`] and [`Eq`], hashed with any
/// [`BuildHasher`].
///
/// # Examples
///
/// ```rust
/// # #[cfg(feature = "std")]
/// # {
/// use std::hash::RandomState;
///
/// use robin_hash::HashContext;
/// use robin_hash::KeyContext;
///
/// let context = HashContext::new(RandomState::new());
/// assert_eq!(context.hash("a"), context.hash("a"));
/// assert!(context.eql("a", "a"));
/// # }
/// ```
#[derive(Clone, Copy, Default, Debug)]
pub struct HashContext<S> {
    hash_builder: S,
}

impl<S> HashContext<S> {
    /// Wraps `hash_builder`.
    pub const fn new(hash_builder: S) -> Self {
        HashContext { hash_builder }
    }

    /// The wrapped hasher builder.
    pub fn hasher(&self) -> &S {
        &self.hash_builder
    }
}

impl<K, S> KeyContext<K> for HashContext<S>
where
    K: Hash + Eq + ?Sized,
    S: BuildHasher,
{
    #[inline]
    fn hash(&self, key: &K) -> u64 {
        self.hash_builder.hash_one(key)
    }

    #[inline]
    fn eql(&self, a: &K, b: &K) -> bool {
        a == b
    }
}

/// Context assembled from a plain hash function and a plain equality
/// function.
///
/// # Examples
///
/// ```rust
/// use robin_hash::FnContext;
/// use robin_hash::Options;
/// use robin_hash::RobinHoodMap;
///
/// fn hash(key: &u32) -> u64 {
///     u64::from(*key).wrapping_mul(0x9E37_79B9_7F4A_7C15)
/// }
///
/// fn eql(a: &u32, b: &u32) -> bool {
///     a == b
/// }
///
/// let mut map = RobinHoodMap::with_options_and_context(
///     Options::default(),
///     FnContext::new(hash, eql),
/// )
/// .unwrap();
/// map.insert(7u32, "seven").unwrap();
/// assert_eq!(map.get(&7), Some(&"seven"));
/// ```
pub struct FnContext<K: ?Sized> {
    hash: fn(&K) -> u64,
    eql: fn(&K, &K) -> bool,
}

impl<K: ?Sized> FnContext<K> {
    /// Pairs `hash` and `eql`.
    pub const fn new(hash: fn(&K) -> u64, eql: fn(&K, &K) -> bool) -> Self {
        FnContext { hash, eql }
    }
}

impl<K: ?Sized> Clone for FnContext<K> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<K: ?Sized> Copy for FnContext<K> {}

impl<K: ?Sized> Debug for FnContext<K> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("FnContext").finish_non_exhaustive()
    }
}

impl<K: ?Sized> KeyContext<K> for FnContext<K> {
    #[inline]
    fn hash(&self, key: &K) -> u64 {
        (self.hash)(key)
    }

    #[inline]
    fn eql(&self, a: &K, b: &K) -> bool {
        (self.eql)(a, b)
    }
}

impl<K: ?Sized, C: KeyContext<K>> KeyContext<K> for &C {
    #[inline]
    fn hash(&self, key: &K) -> u64 {
        (**self).hash(key)
    }

    #[inline]
    fn eql(&self, a: &K, b: &K) -> bool {
        (**self).eql(a, b)
    }
}
