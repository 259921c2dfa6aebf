//! Hash states used across the workspace.
//!
//! - [`FixedHashState`]: `foldhash` with a fixed seed, so a key always hashes
//!   the same way. Expression caches and URL path tables use it.
//! - [`NoOpHashState`]: keys that are already hashes, such as
//!   [`TypeId`](core::any::TypeId), pass straight through.

use core::hash::{BuildHasher, Hasher};

use foldhash::fast::{FixedState, FoldHasher};

const SEED: FixedState = FixedState::with_seed(0x5354_5249_5045_5321);

/// Seeded `foldhash` state whose results only depend on the input.
///
/// # Examples
///
/// ```
/// use core::hash::BuildHasher;
/// use st_utils::hash::FixedHashState;
///
/// assert_eq!(FixedHashState.hash_one("a.b[0]"), FixedHashState.hash_one("a.b[0]"));
/// ```
#[derive(Copy, Clone, Default, Debug)]
pub struct FixedHashState;

impl BuildHasher for FixedHashState {
    type Hasher = FoldHasher<'static>;

    #[inline]
    fn build_hasher(&self) -> Self::Hasher {
        SEED.build_hasher()
    }
}

/// Keeps the last `u64` written. Other writes are folded in byte by byte.
#[derive(Copy, Clone, Default, Debug)]
pub struct NoOpHasher(u64);

impl Hasher for NoOpHasher {
    #[inline]
    fn finish(&self) -> u64 {
        self.0
    }

    fn write(&mut self, bytes: &[u8]) {
        self.0 = bytes
            .iter()
            .rev()
            .fold(self.0, |hash, &byte| hash.rotate_left(8) ^ u64::from(byte));
    }

    #[inline]
    fn write_u64(&mut self, i: u64) {
        self.0 = i;
    }
}

/// Build state for [`NoOpHasher`].
#[derive(Copy, Clone, Default, Debug)]
pub struct NoOpHashState;

impl BuildHasher for NoOpHashState {
    type Hasher = NoOpHasher;

    #[inline]
    fn build_hasher(&self) -> Self::Hasher {
        NoOpHasher(0)
    }
}

/// A `hashbrown` map hashed with [`FixedHashState`].
pub type HashMap<K, V> = hashbrown::HashMap<K, V, FixedHashState>;

pub use foldhash;
pub use hashbrown;

#[cfg(test)]
mod tests {
    use core::any::TypeId;
    use core::hash::{BuildHasher, Hash, Hasher};

    use super::{HashMap, NoOpHashState};

    #[test]
    fn no_op_hasher_keeps_u64_writes() {
        let mut hasher = NoOpHashState.build_hasher();
        hasher.write_u64(42);
        assert_eq!(hasher.finish(), 42);

        let a = NoOpHashState.hash_one(TypeId::of::<u8>());
        let b = NoOpHashState.hash_one(TypeId::of::<u16>());
        assert_ne!(a, b);

        let mut hasher = NoOpHashState.build_hasher();
        7_u8.hash(&mut hasher);
        assert_eq!(hasher.finish(), 7);
    }

    #[test]
    fn fixed_map_with_str_keys() {
        let mut map: HashMap<&str, u32> = HashMap::default();
        map.insert("person.name", 1);
        map.insert("person.age", 2);
        assert_eq!(map.get("person.name"), Some(&1));
        assert_eq!(map.len(), 2);
    }
}
