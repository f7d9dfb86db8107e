//! Strongly-typed sequential ID wrappers and their allocator
//!
//! Using newtype wrappers prevents accidentally mixing up IDs from different
//! entity types at compile time. IDs are positive integers handed out by an
//! [`IdAllocator`]; the first ID issued by a fresh allocator is 1.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::marker::PhantomData;
use std::num::ParseIntError;
use std::str::FromStr;

/// An ID that can be produced by an [`IdAllocator`]
pub trait SequentialId: Copy {
    /// Wrap a raw counter value
    fn from_raw(raw: u64) -> Self;

    /// Get the raw counter value
    fn raw(&self) -> u64;
}

/// Macro to generate ID newtype wrappers
macro_rules! define_id {
    ($name:ident, $display_prefix:literal) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(u64);

        impl $name {
            /// Create an ID from a raw value
            pub const fn new(raw: u64) -> Self {
                Self(raw)
            }

            /// Get the underlying integer
            pub const fn get(&self) -> u64 {
                self.0
            }

            /// Parse an ID from a string ("7" or the display form)
            pub fn parse(s: &str) -> Result<Self, ParseIntError> {
                s.parse()
            }
        }

        impl SequentialId for $name {
            fn from_raw(raw: u64) -> Self {
                Self(raw)
            }

            fn raw(&self) -> u64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}{}", $display_prefix, self.0)
            }
        }

        impl From<u64> for $name {
            fn from(raw: u64) -> Self {
                Self(raw)
            }
        }

        impl FromStr for $name {
            type Err = ParseIntError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let s = s.trim();
                // Accept both "7" and "txn-7"
                let s = s.strip_prefix($display_prefix).unwrap_or(s);
                Ok(Self(s.parse()?))
            }
        }
    };
}

define_id!(TransactionId, "txn-");
define_id!(UserId, "usr-");

/// Monotonic ID counter
///
/// Pre-increments before handing out an ID, never goes backwards and never
/// reissues a value, even after the entity holding it is deleted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdAllocator<I> {
    last: u64,
    _marker: PhantomData<I>,
}

impl<I: SequentialId> IdAllocator<I> {
    /// Create an allocator whose first ID will be 1
    pub fn new() -> Self {
        Self::resuming_after(0)
    }

    /// Create an allocator whose next ID will be `last + 1`
    pub fn resuming_after(last: u64) -> Self {
        Self {
            last,
            _marker: PhantomData,
        }
    }

    /// Allocate the next ID
    pub fn next_id(&mut self) -> I {
        self.last += 1;
        I::from_raw(self.last)
    }

    /// Make sure future IDs are greater than `id`
    pub fn observe(&mut self, id: I) {
        self.last = self.last.max(id.raw());
    }

    /// The most recently issued (or observed) raw value
    pub fn last_issued(&self) -> u64 {
        self.last
    }
}

impl<I: SequentialId> Default for IdAllocator<I> {
    fn default() -> Self {
        Self::new()
    }
}
