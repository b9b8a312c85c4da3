#![warn(missing_docs)]
#![doc = include_str!("../README.md")]
#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;
#[cfg(all(test, not(feature = "std")))]
extern crate std;

/// Hash and equality contexts for keys.
pub mod context;

/// Errors reported by table construction and mutation.
pub mod error;

/// A HashMap implementation using Robin Hood hashing.
///
/// This module provides [`RobinHoodMap`], an open-addressing map with
/// backward-shift deletion over pluggable slot storage.
pub mod hash_map;

mod math;

/// Table construction parameters.
pub mod options;

pub mod slot;

pub mod storage;

pub use context::DefaultContext;
pub use context::DefaultHashBuilder;
pub use context::FnContext;
pub use context::HashContext;
pub use context::KeyContext;
pub use error::ConfigError;
pub use error::Error;
pub use error::Result;
pub use hash_map::BufferMap;
pub use hash_map::InlineMap;
pub use hash_map::RobinHoodMap;
pub use options::Options;
pub use slot::Metadata;
pub use slot::Slot;
pub use storage::BufferStorage;
pub use storage::HeapStorage;
pub use storage::InlineStorage;
pub use storage::SlotStorage;
