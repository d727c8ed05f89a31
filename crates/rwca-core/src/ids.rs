//! Strongly typed, zero-cost identifier wrappers.
//!
//! All IDs are `Copy + Ord + Hash` so they can be used as map keys and sorted
//! collection elements without ceremony.  Entity IDs (agents, walls, wall
//! vertices, obstacles) are allocated by monotonically increasing counters in
//! the world's stores and are never reused, even after removal.

use std::fmt;
use std::hash::Hash;

/// Generate a typed ID wrapper around a primitive integer.
macro_rules! typed_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident($inner:ty);) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        $vis struct $name(pub $inner);

        impl $name {
            /// Sentinel meaning "no valid ID".  Counters stop before reaching it.
            pub const INVALID: $name = $name(<$inner>::MAX);

            /// Cast to `usize` for direct use as a `Vec` index.
            #[inline(always)]
            pub fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl Default for $name {
            /// Returns the `INVALID` sentinel so uninitialized IDs are visibly invalid.
            #[inline(always)]
            fn default() -> Self {
                Self::INVALID
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl From<$name> for usize {
            #[inline(always)]
            fn from(id: $name) -> usize {
                id.0 as usize
            }
        }

        impl TryFrom<usize> for $name {
            type Error = std::num::TryFromIntError;
            fn try_from(n: usize) -> Result<$name, Self::Error> {
                <$inner>::try_from(n).map($name)
            }
        }
    };
}

/// Key type of an entity store: a `u32`-backed id allocated from a counter.
///
/// Implemented for every entity id below; the store in `rwca-world` is
/// generic over it so the add/get/set/remove/list contract is written once.
pub trait EntityKey: Copy + Ord + Hash + fmt::Debug + fmt::Display {
    /// Human-readable entity kind, used in log events.
    const KIND: &'static str;

    fn from_raw(raw: u32) -> Self;

    fn raw(self) -> u32;

    /// The id `n` positions after `self`, or `None` on overflow into the
    /// `INVALID` sentinel.
    #[inline]
    fn offset(self, n: u32) -> Option<Self> {
        self.raw()
            .checked_add(n)
            .filter(|&raw| raw != u32::MAX)
            .map(Self::from_raw)
    }
}

macro_rules! entity_key {
    ($($name:ident => $kind:literal),* $(,)?) => {
        $(
            impl EntityKey for $name {
                const KIND: &'static str = $kind;

                #[inline(always)]
                fn from_raw(raw: u32) -> Self {
                    $name(raw)
                }

                #[inline(always)]
                fn raw(self) -> u32 {
                    self.0
                }
            }
        )*
    };
}

typed_id! {
    /// Handle of an agent.  Stable for the agent's lifetime.
    pub struct AgentId(u32);
}

typed_id! {
    /// Handle of a wall (a closed polygon).
    pub struct WallId(u32);
}

typed_id! {
    /// Handle of one boundary vertex of a wall.  The vertices of a wall with
    /// head `h` and `n` points occupy the contiguous range `h .. h + n`.
    pub struct WallVertexId(u32);
}

typed_id! {
    /// Handle of a dynamic obstacle.
    pub struct ObstacleId(u32);
}

typed_id! {
    /// Index of a behavioral profile in the agent-type registry.
    /// Using `u16` keeps agent records compact (max 65,535 profiles).
    pub struct AgentTypeId(u16);
}

entity_key! {
    AgentId      => "agent",
    WallId       => "wall",
    WallVertexId => "wall vertex",
    ObstacleId   => "obstacle",
}
