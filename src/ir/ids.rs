//! Content-derived newtype IDs for COCO records.
//!
//! Every id is a pure function of the text it identifies: the first 8 hex
//! digits of the MD5 digest of the UTF-8 key, parsed as a base-16 unsigned
//! integer. That is the same value as the first four digest bytes read as a
//! big-endian `u32`. Consumers may key on exact id values, so this rule is
//! part of the output contract and must not change.

use md5::{Digest, Md5};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Computes the 32-bit content id of `key`, widened to `u64`.
pub fn digest_id(key: &str) -> u64 {
    let digest = Md5::digest(key.as_bytes());
    u64::from(u32::from_be_bytes([digest[0], digest[1], digest[2], digest[3]]))
}

macro_rules! define_id {
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

            /// Returns the underlying u64 value.
            #[inline]
            pub fn as_u64(&self) -> u64 {
                self.0
            }
        }

        impl From<u64> for $name {
            fn from(id: u64) -> Self {
                Self(id)
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!(stringify!($name), "({})"), self.0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

define_id!(
    /// Identifies an image record; derived from its file name.
    ImageId
);

define_id!(
    /// Identifies a category record; derived from its label.
    CategoryId
);

define_id!(
    /// Identifies an annotation record; derived from image, label and row index.
    AnnotationId
);

define_id!(
    /// Identifies a license entry.
    LicenseId
);

impl ImageId {
    pub fn for_file_name(file_name: &str) -> Self {
        Self(digest_id(file_name))
    }
}

impl CategoryId {
    pub fn for_label(label: &str) -> Self {
        Self(digest_id(label))
    }
}

impl AnnotationId {
    /// The row index keeps repeated image/label pairs apart.
    pub fn for_row(image: &str, label: &str, row_index: usize) -> Self {
        Self(digest_id(&format!("{}_{}_{}", image, label, row_index)))
    }
}
