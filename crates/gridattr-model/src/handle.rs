use core::cmp::Ordering;
use core::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

/// Reference to an image owned by the host's pixmap cache.
///
/// Identity is the cache key alone: two handles with the same key are the same
/// image regardless of the size hint they carry. Key `0` is the null pixmap.
#[derive(Copy, Clone, Debug, Default, Serialize, Deserialize)]
pub struct PixmapHandle {
    pub cache_key: u64,
    #[serde(default)]
    pub width: u32,
    #[serde(default)]
    pub height: u32,
}

impl PixmapHandle {
    pub const fn new(cache_key: u64, width: u32, height: u32) -> Self {
        Self {
            cache_key,
            width,
            height,
        }
    }

    pub const fn null() -> Self {
        Self::new(0, 0, 0)
    }

    #[must_use]
    pub const fn is_null(&self) -> bool {
        self.cache_key == 0
    }
}

impl PartialEq for PixmapHandle {
    fn eq(&self, other: &Self) -> bool {
        self.cache_key == other.cache_key
    }
}

impl Eq for PixmapHandle {}

impl PartialOrd for PixmapHandle {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for PixmapHandle {
    fn cmp(&self, other: &Self) -> Ordering {
        self.cache_key.cmp(&other.cache_key)
    }
}

impl Hash for PixmapHandle {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.cache_key.hash(state);
    }
}

/// Identifier of an object owned outside the store (cell displayer, formatter,
/// validator, user data, ...).
///
/// The store only records and compares the identifier; it never owns or
/// dereferences what it names.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OpaqueHandle(pub u64);

impl OpaqueHandle {
    #[inline]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    #[inline]
    pub const fn id(self) -> u64 {
        self.0
    }
}
