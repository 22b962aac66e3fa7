#![deny(missing_docs)]
#![doc = include_str!("../README.md")]

#[doc(hidden)]
macro_rules! has_any_feature {
    ($($item:item)*) => {
        $(
            #[cfg(any(doc, feature = "queue", feature = "rwlock"))]
            $item
        )*
    }
}

has_any_feature! {

// loom integration
#[doc(hidden)]
macro_rules! cfg_loom {
    ($($item:item)*) => {
        $(
            #[cfg(feature = "loom")]
            $item
        )*
    };
}
#[doc(hidden)]
macro_rules! cfg_not_loom {
    ($($item:item)*) => {
        $(
            #[cfg(not(feature = "loom"))]
            $item
        )*
    };
}

#[doc(hidden)]
#[cfg(any(doc, feature = "rwlock"))]
mod cell;
#[doc(hidden)]
mod sync;
//loom integration finished.

/// A module containing the error types shared by every primitive.
pub mod error;

/// A fixed capacity blocking Multi Producer Multi Consumer queue.
#[cfg(any(doc, feature = "queue"))]
pub mod queue;

/// A reader/writer lock with a selectable fairness policy.
#[cfg(any(doc, feature = "rwlock"))]
pub mod rwlock;

#[cfg(any(doc, feature = "rwlock"))]
mod util;

}
