//! Opaque ID newtypes for IR entities.
//!
//! Each ID is a thin `u32` wrapper that is `Copy`, `Hash`, and
//! `Serialize`/`Deserialize`. IDs are handed out by the [`TypeDb`](crate::TypeDb)
//! and [`Graph`](crate::Graph) arenas and used for O(1) lookup and identity
//! comparison.

use crate::arena::ArenaId;
use serde::{Deserialize, Serialize};

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
        pub struct $name(u32);

        impl $name {
            /// Creates an ID from a raw `u32` index.
            pub fn from_raw(index: u32) -> Self {
                Self(index)
            }

            /// Returns the raw `u32` index.
            pub fn as_raw(self) -> u32 {
                self.0
            }
        }

        impl ArenaId for $name {
            fn from_raw(index: u32) -> Self {
                Self(index)
            }

            fn as_raw(self) -> u32 {
                self.0
            }
        }
    };
}

define_id!(
    /// Opaque, copyable handle for an interned type in the [`TypeDb`](crate::TypeDb).
    ///
    /// Because types are structurally uniqued, `TypeId` equality is type
    /// equality.
    TypeId
);

define_id!(
    /// Opaque, copyable ID for an operation in a [`Graph`](crate::Graph).
    OpId
);

define_id!(
    /// Opaque, copyable ID for an SSA value in a [`Graph`](crate::Graph).
    ValueId
);
