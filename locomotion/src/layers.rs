//! Collision layers used to filter geometry queries.
//!
//! Ground detection and mantle probing each look at a different subset of the
//! world. The subset is a bitmask over [`CollisionLayer`], stored as a plain
//! integer so it serializes as raw bits in config files and fits in a Rapier
//! collider's `user_data`.

use num_traits::{One, PrimInt};
use serde::{Deserialize, Serialize};

/// Implemented by flag enums whose discriminant is a bit index.
pub trait FlagBitmask {
    type Storage: PrimInt;

    fn bit_index(&self) -> u8;

    fn mask(&self) -> Self::Storage {
        // NOTE: `bit_index()` must be < number of bits in `Storage`.
        Self::Storage::one() << (self.bit_index() as usize)
    }
}

/// A set of flags packed into a primitive integer.
#[derive(Default, Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BitmaskFlags<T: PrimInt> {
    pub bits: T,
}

impl<T: PrimInt> BitmaskFlags<T> {
    pub const fn from_bits(bits: T) -> Self {
        Self { bits }
    }

    pub fn of<U: FlagBitmask<Storage = T> + Copy>(flags: &[U]) -> Self {
        let bits = flags.iter().fold(T::zero(), |acc, f| acc | f.mask());
        Self { bits }
    }

    pub fn add<U: FlagBitmask<Storage = T>>(&mut self, flag: U) {
        self.bits = self.bits | flag.mask();
    }

    pub fn remove<U: FlagBitmask<Storage = T>>(&mut self, flag: U) {
        self.bits = self.bits & !flag.mask();
    }

    pub fn has<U: FlagBitmask<Storage = T>>(&self, flag: U) -> bool {
        (self.bits & flag.mask()) != T::zero()
    }

    /// True when the two sets share at least one flag.
    pub fn intersects(&self, other: Self) -> bool {
        (self.bits & other.bits) != T::zero()
    }

    pub fn is_empty(&self) -> bool {
        self.bits == T::zero()
    }
}

/// Declare a bitmask-backed enum and implement `FlagBitmask` for it.
#[macro_export]
macro_rules! define_bitmask_flags {
    ($(#[$meta:meta])* $name:ident, $storage:ty, { $($variant:ident),* $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        #[repr(u8)]
        pub enum $name {
            $($variant),*
        }

        impl $crate::layers::FlagBitmask for $name {
            type Storage = $storage;

            fn bit_index(&self) -> u8 {
                *self as u8
            }
        }
    };
}

define_bitmask_flags!(
    /// Layers a collider can belong to.
    CollisionLayer,
    u32,
    {
        Ground,
        Mantleable,
        Character,
        Prop,
    }
);

/// Layer filter passed to geometry queries.
pub type LayerMask = BitmaskFlags<u32>;

impl LayerMask {
    pub const NONE: LayerMask = LayerMask::from_bits(0);
    pub const ALL: LayerMask = LayerMask::from_bits(u32::MAX);

    /// Default filter for ground and slope probes.
    pub fn ground() -> Self {
        Self::of(&[CollisionLayer::Ground, CollisionLayer::Mantleable])
    }

    /// Default filter for mantle probes.
    pub fn mantleable() -> Self {
        Self::of(&[CollisionLayer::Mantleable])
    }
}
