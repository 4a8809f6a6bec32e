//! Index newtypes for operations and vehicles.
//!
//! Both ids are positions in an owning `Vec`: the scheduler's operation list
//! and the fleet's vehicle list.  Only those owners mint them, so an id taken
//! from one simulation means nothing in another.

use std::fmt;

macro_rules! index_id {
    ($(#[$doc:meta])* $name:ident, $label:literal) => {
        $(#[$doc])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        pub struct $name(pub u16);

        impl $name {
            #[inline]
            pub fn index(self) -> usize {
                usize::from(self.0)
            }
        }

        impl TryFrom<usize> for $name {
            type Error = std::num::TryFromIntError;

            fn try_from(n: usize) -> Result<Self, Self::Error> {
                u16::try_from(n).map(Self)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($label, "#{}"), self.0)
            }
        }
    };
}

index_id! {
    /// Position of an operation in table order.
    OpId, "op"
}

index_id! {
    /// Position of a vehicle in spawn order.
    VehicleId, "vehicle"
}
