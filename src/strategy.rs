//! Bucket selection strategies.
//!
//! A strategy maps `(key, capacity)` to a bucket index in `0..capacity`.
//! The table calls it with its current capacity on every lookup and with the
//! target capacity while rehashing, so a strategy must be a pure function
//! of its inputs.

use core::hash::{BuildHasher, Hash};
use std::collections::hash_map::RandomState;

/// `floor((sqrt(5) - 1) / 2 * 2^64)`: Knuth's multiplicative constant in
/// 64-bit fixed point.
pub const GOLDEN_RATIO_FRACTION: u64 = 0x9E37_79B9_7F4A_7C15;

/// Maps a key to a bucket index.
///
/// Implementations must return a value `< capacity` and must be
/// deterministic. `capacity` is never zero.
pub trait HashStrategy<K: ?Sized> {
    fn index(&self, key: &K, capacity: usize) -> usize;
}

/// Integer keys accepted by [`Division`] and [`Multiplication`].
pub trait IntegerKey: Copy + Eq {
    /// Two's-complement bits, sign-extended to 64 bits.
    fn to_bits(self) -> u64;

    /// Euclidean remainder; always in `0..modulus`, also for negative keys.
    fn rem_euclid_usize(self, modulus: usize) -> usize;
}

macro_rules! impl_integer_key {
    ($($t:ty),* $(,)?) => {
        $(
            impl IntegerKey for $t {
                #[inline]
                fn to_bits(self) -> u64 {
                    self as i64 as u64
                }

                #[inline]
                fn rem_euclid_usize(self, modulus: usize) -> usize {
                    (self as i128).rem_euclid(modulus as i128) as usize
                }
            }
        )*
    };
}

impl_integer_key!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

/// Division method: `key mod capacity`.
///
/// Negative keys use the Euclidean remainder, so `-1` lands in the last
/// bucket rather than wrapping to a huge unsigned value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Division;

impl<K: IntegerKey> HashStrategy<K> for Division {
    #[inline]
    fn index(&self, key: &K, capacity: usize) -> usize {
        key.rem_euclid_usize(capacity)
    }
}

/// Multiplication method: `floor(capacity * frac(key * A))` with
/// `A = (sqrt(5) - 1) / 2`.
///
/// Evaluated in fixed point: the wrapping product `key * A * 2^64` holds the
/// fractional part of `key * A` scaled by `2^64`, and the high word of its
/// product with `capacity` is the index. Negative keys keep the real-valued
/// meaning since `frac(-x) = 1 - frac(x)` matches two's-complement negation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Multiplication;

impl<K: IntegerKey> HashStrategy<K> for Multiplication {
    #[inline]
    fn index(&self, key: &K, capacity: usize) -> usize {
        scale_fraction(key.to_bits().wrapping_mul(GOLDEN_RATIO_FRACTION), capacity)
    }
}

/// Hashes any `K: Hash` with a `BuildHasher`, then spreads the hash over the
/// buckets with the multiplication method.
#[derive(Debug, Clone, Default)]
pub struct Hashed<S = RandomState> {
    hasher: S,
}

impl<S> Hashed<S> {
    pub fn with_hasher(hasher: S) -> Self {
        Self { hasher }
    }

    pub fn hasher(&self) -> &S {
        &self.hasher
    }
}

impl<K, S> HashStrategy<K> for Hashed<S>
where
    K: ?Sized + Hash,
    S: BuildHasher,
{
    #[inline]
    fn index(&self, key: &K, capacity: usize) -> usize {
        let hash = self.hasher.hash_one(key);
        scale_fraction(hash.wrapping_mul(GOLDEN_RATIO_FRACTION), capacity)
    }
}

/// `floor(capacity * fraction / 2^64)`.
#[inline]
fn scale_fraction(fraction: u64, capacity: usize) -> usize {
    ((fraction as u128 * capacity as u128) >> 64) as usize
}
