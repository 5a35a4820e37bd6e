//! Leveled internal assertions.
//!
//! Simple assertions are always active. Moderate assertions are only checked in tests or when the
//! `debug-checks` feature is enabled, since they re-derive properties of a whole model or tour.

#[cfg(all(not(test), not(feature = "debug-checks")))]
pub const TOUR_ASSERT_LEVEL_DEFINITION: u8 = TOUR_ASSERT_SIMPLE;

#[cfg(any(test, feature = "debug-checks"))]
pub const TOUR_ASSERT_LEVEL_DEFINITION: u8 = TOUR_ASSERT_MODERATE;

pub const TOUR_ASSERT_SIMPLE: u8 = 1;
pub const TOUR_ASSERT_MODERATE: u8 = 2;

#[macro_export]
#[doc(hidden)]
macro_rules! tour_assert_simple {
    ($($arg:tt)*) => {
        if $crate::asserts::TOUR_ASSERT_LEVEL_DEFINITION >= $crate::asserts::TOUR_ASSERT_SIMPLE {
            assert!($($arg)*);
        }
    };
}

#[macro_export]
#[doc(hidden)]
macro_rules! tour_assert_eq_simple {
    ($($arg:tt)*) => {
        if $crate::asserts::TOUR_ASSERT_LEVEL_DEFINITION >= $crate::asserts::TOUR_ASSERT_SIMPLE {
            assert_eq!($($arg)*);
        }
    };
}

#[macro_export]
#[doc(hidden)]
macro_rules! tour_assert_moderate {
    ($($arg:tt)*) => {
        if $crate::asserts::TOUR_ASSERT_LEVEL_DEFINITION >= $crate::asserts::TOUR_ASSERT_MODERATE {
            assert!($($arg)*);
        }
    };
}
