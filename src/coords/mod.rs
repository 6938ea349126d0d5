//! Type-safe coordinate system wrappers
//!
//! Marker tables are 1-based; chain files and the interval index are 0-based
//! half-open. The newtypes here keep the two apart so a conversion is always
//! an explicit method call.
//!
//! | Type | Basis | Use Cases |
//! |------|-------|-----------|
//! | [`ZeroBasedPos`] | 0-based | chain blocks, BED, interval index |
//! | [`OneBasedPos`] | 1-based | marker tables, PLINK `.map`/`.bim`, output |
//!
//! # Examples
//!
//! ```
//! use ferro_liftover::coords::{OneBasedPos, ZeroBasedInterval};
//!
//! let pos = OneBasedPos::try_new(1_000_000).unwrap();
//! let interval = ZeroBasedInterval::point(pos.to_zero_based());
//! assert_eq!(interval.start.value(), 999_999);
//! assert_eq!(interval.end.value(), 1_000_000);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

/// A 0-based position (array-style indexing)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ZeroBasedPos(u64);

/// A 1-based position (human-readable indexing)
///
/// # Invariant
///
/// Position must be >= 1. Position 0 is invalid in 1-based systems.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct OneBasedPos(u64);

impl ZeroBasedPos {
    /// Create a new 0-based position
    #[inline]
    pub const fn new(pos: u64) -> Self {
        Self(pos)
    }

    /// Get the raw value
    #[inline]
    pub const fn value(self) -> u64 {
        self.0
    }

    /// Convert to 1-based position
    ///
    /// ```
    /// use ferro_liftover::coords::ZeroBasedPos;
    ///
    /// assert_eq!(ZeroBasedPos::new(99).to_one_based().value(), 100);
    /// ```
    #[inline]
    pub const fn to_one_based(self) -> OneBasedPos {
        OneBasedPos(self.0 + 1)
    }
}

impl OneBasedPos {
    /// Try to create a 1-based position, returning None if invalid
    ///
    /// ```
    /// use ferro_liftover::coords::OneBasedPos;
    ///
    /// assert!(OneBasedPos::try_new(1).is_some());
    /// assert!(OneBasedPos::try_new(0).is_none());
    /// ```
    #[inline]
    pub const fn try_new(pos: u64) -> Option<Self> {
        if pos > 0 {
            Some(Self(pos))
        } else {
            None
        }
    }

    /// Get the raw value
    #[inline]
    pub const fn value(self) -> u64 {
        self.0
    }

    /// Convert to 0-based position
    #[inline]
    pub const fn to_zero_based(self) -> ZeroBasedPos {
        ZeroBasedPos(self.0 - 1)
    }
}

impl fmt::Display for ZeroBasedPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for OneBasedPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<ZeroBasedPos> for u64 {
    fn from(pos: ZeroBasedPos) -> Self {
        pos.0
    }
}

impl From<OneBasedPos> for u64 {
    fn from(pos: OneBasedPos) -> Self {
        pos.0
    }
}

/// A 0-based half-open interval [start, end)
///
/// # Invariant
///
/// `start < end`. Intervals built through [`ZeroBasedInterval::try_new`] or
/// [`ZeroBasedInterval::point`] are never empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ZeroBasedInterval {
    pub start: ZeroBasedPos,
    pub end: ZeroBasedPos,
}

impl ZeroBasedInterval {
    /// Create an interval, returning None when `end <= start`
    ///
    /// ```
    /// use ferro_liftover::coords::ZeroBasedInterval;
    ///
    /// assert!(ZeroBasedInterval::try_new(5, 8).is_some());
    /// assert!(ZeroBasedInterval::try_new(8, 8).is_none());
    /// ```
    pub fn try_new(start: u64, end: u64) -> Option<Self> {
        if start < end {
            Some(Self {
                start: ZeroBasedPos::new(start),
                end: ZeroBasedPos::new(end),
            })
        } else {
            None
        }
    }

    /// Single base-pair interval `[pos, pos + 1)`
    pub const fn point(pos: ZeroBasedPos) -> Self {
        Self {
            start: pos,
            end: ZeroBasedPos(pos.0 + 1),
        }
    }

    /// Length of the interval
    #[inline]
    pub const fn len(&self) -> u64 {
        self.end.value() - self.start.value()
    }

    /// Check if interval is empty
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.end.value() <= self.start.value()
    }

    /// True when `[start, end)` lies entirely inside this interval
    #[inline]
    pub const fn contains(&self, start: u64, end: u64) -> bool {
        self.start.value() <= start && end <= self.end.value()
    }

    /// First base of the interval as a 1-based position
    #[inline]
    pub const fn first_one_based(&self) -> OneBasedPos {
        self.start.to_one_based()
    }
}

impl fmt::Display for ZeroBasedInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}
