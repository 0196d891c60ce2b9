//! Strongly typed identifier wrappers.
//!
//! Servers, queues and hold slots are fixed-size arrays created at setup, so
//! their ids double as `Vec` indices.  Entity ids are handed out sequentially
//! at arrival, which makes id order equal to arrival order.

use std::fmt;

/// Generate a typed ID wrapper around a `u32` with a display prefix.
macro_rules! typed_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident => $label:literal;) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        $vis struct $name(pub u32);

        impl $name {
            /// Cast to `usize` for direct use as a `Vec` index.
            #[inline(always)]
            pub fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($label, "-{}"), self.0)
            }
        }

        impl TryFrom<usize> for $name {
            type Error = std::num::TryFromIntError;
            fn try_from(n: usize) -> Result<$name, Self::Error> {
                u32::try_from(n).map($name)
            }
        }
    };
}

typed_id! {
    /// A plane (job) flowing through the facility.
    pub struct EntityId => "plane";
}

typed_id! {
    /// A gate.  Serves exactly one entity at a time.
    pub struct ServerId => "gate";
}

typed_id! {
    /// One of the parallel FIFO waiting queues.
    pub struct QueueId => "queue";
}

typed_id! {
    /// One holding slot of the hold-and-divert waiting area.
    pub struct SlotId => "hold";
}
