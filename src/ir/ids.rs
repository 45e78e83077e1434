//! Newtype IDs for the aggregate (COCO) document.
//!
//! Image ids come from a document's position within its partition and
//! category ids from a class's position in the catalog. Keeping them apart
//! prevents passing one where the other is expected.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! positional_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub u64);

        impl $name {
            #[inline]
            pub fn new(id: u64) -> Self {
                Self(id)
            }

            #[inline]
            pub fn as_u64(&self) -> u64 {
                self.0
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!(stringify!($name), "({})"), self.0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Display::fmt(&self.0, f)
            }
        }

        /// Zero-based position to id.
        impl From<usize> for $name {
            fn from(position: usize) -> Self {
                Self(position as u64)
            }
        }
    };
}

positional_id!(
    /// Position of an image within a partition's aggregate document.
    ImageId
);

positional_id!(
    /// Index of a class in the [`ClassCatalog`](super::ClassCatalog).
    CategoryId
);
