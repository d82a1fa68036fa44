use core::hash::{BuildHasher, Hasher};

use foldhash::fast::{FixedState, FoldHasher};

// -----------------------------------------------------------------------------
// FixedHashState

const DISPATCH_SEED: FixedState = FixedState::with_seed(0x51F1_A3C4_D7E2_0B69);

/// A `foldhash` state with a fixed seed.
///
/// Key dispatch tables hash member names once while they are built and
/// again for every lookup, so both sides must agree on the seed.
///
/// # Examples
///
/// ```
/// use core::hash::BuildHasher;
/// use vc_access::utils::FixedHashState;
///
/// let a = FixedHashState.hash_one("name");
/// let b = FixedHashState.hash_one("name");
/// assert_eq!(a, b);
/// ```
#[derive(Copy, Clone, Default, Debug)]
pub struct FixedHashState;

impl BuildHasher for FixedHashState {
    type Hasher = FoldHasher<'static>;

    #[inline(always)]
    fn build_hasher(&self) -> Self::Hasher {
        DISPATCH_SEED.build_hasher()
    }
}

/// A [`hashbrown::HashMap`] using [`FixedHashState`].
pub type HashMap<K, V> = hashbrown::HashMap<K, V, FixedHashState>;

// -----------------------------------------------------------------------------
// NoOpHashState

/// Hasher that keeps the last `u64` written to it.
///
/// `TypeId` hashes itself by writing an already well distributed `u64`,
/// so hashing it again is wasted work.
#[derive(Copy, Clone, Default, Debug)]
pub struct NoOpHasher(u64);

impl Hasher for NoOpHasher {
    #[inline]
    fn finish(&self) -> u64 {
        self.0
    }

    fn write(&mut self, bytes: &[u8]) {
        for byte in bytes {
            self.0 = self.0.rotate_left(8) ^ u64::from(*byte);
        }
    }

    #[inline]
    fn write_u64(&mut self, i: u64) {
        self.0 = i;
    }
}

/// Builds [`NoOpHasher`]s.
#[derive(Copy, Clone, Default, Debug)]
pub struct NoOpHashState;

impl BuildHasher for NoOpHashState {
    type Hasher = NoOpHasher;

    #[inline(always)]
    fn build_hasher(&self) -> Self::Hasher {
        NoOpHasher(0)
    }
}
