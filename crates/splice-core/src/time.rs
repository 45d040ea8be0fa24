//! Exact timeline time
//!
//! Every timeline position and span is a rational number of seconds, so a
//! split followed by a join lands on exactly the original edges. Floats are
//! only produced for playback surfaces and only accepted from probes and
//! clocks.

use num_rational::Rational64;
use serde::{Deserialize, Serialize};
use std::cmp::{max, min};
use std::fmt;
use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};

/// Microsecond grid used when a float enters the timeline.
const FLOAT_GRID: i64 = 1_000_000;

/// A point on the timeline or a span, in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RationalTime(Rational64);

impl RationalTime {
    pub const ZERO: Self = Self(Rational64::new_raw(0, 1));

    /// `numerator / denominator` seconds.
    #[inline]
    pub fn new(numerator: i64, denominator: i64) -> Self {
        Self(Rational64::new(numerator, denominator))
    }

    #[inline]
    pub fn from_secs(seconds: i64) -> Self {
        Self(Rational64::from_integer(seconds))
    }

    #[inline]
    pub fn from_millis(millis: i64) -> Self {
        Self::new(millis, 1000)
    }

    /// Snap a float onto the microsecond grid. NaN and infinities become zero.
    pub fn from_seconds_f64(seconds: f64) -> Self {
        if seconds.is_finite() {
            Self::new((seconds * FLOAT_GRID as f64).round() as i64, FLOAT_GRID)
        } else {
            Self::ZERO
        }
    }

    #[inline]
    pub fn to_seconds_f64(self) -> f64 {
        *self.0.numer() as f64 / *self.0.denom() as f64
    }

    /// Whole frames elapsed at `rate`, rounded down. Zero for a degenerate
    /// rate.
    fn whole_frames(self, rate: FrameRate) -> i64 {
        if !rate.is_valid() {
            return 0;
        }
        let per_second = Rational64::new(rate.numerator as i64, rate.denominator as i64);
        (self.0 * per_second).floor().to_integer()
    }

    /// Non-drop-frame `HH:MM:SS:FF`.
    pub fn to_timecode(self, rate: FrameRate) -> String {
        let fps = if rate.is_valid() {
            (rate.numerator as f64 / rate.denominator as f64).round().max(1.0) as i64
        } else {
            1
        };
        let frames = self.whole_frames(rate).max(0);
        let secs = frames / fps;
        format!(
            "{:02}:{:02}:{:02}:{:02}",
            secs / 3600,
            secs / 60 % 60,
            secs % 60,
            frames % fps
        )
    }

    #[inline]
    pub fn is_negative(self) -> bool {
        *self.0.numer() < 0
    }

    /// Clamp into `[lo, hi]`; if the bounds cross, `lo` wins instead of
    /// panicking like `Ord::clamp`.
    #[inline]
    pub fn clamp_to(self, lo: Self, hi: Self) -> Self {
        max(lo, min(self, hi))
    }

    #[inline]
    pub fn non_negative(self) -> Self {
        max(self, Self::ZERO)
    }
}

impl Default for RationalTime {
    fn default() -> Self {
        Self::ZERO
    }
}

macro_rules! time_ops {
    ($($op:ident::$method:ident, $assign:ident::$assign_method:ident => $sym:tt;)*) => {$(
        impl $op for RationalTime {
            type Output = Self;
            #[inline]
            fn $method(self, rhs: Self) -> Self {
                Self(self.0 $sym rhs.0)
            }
        }

        impl $assign for RationalTime {
            #[inline]
            fn $assign_method(&mut self, rhs: Self) {
                self.0 = self.0 $sym rhs.0;
            }
        }
    )*};
}

time_ops! {
    Add::add, AddAssign::add_assign => +;
    Sub::sub, SubAssign::sub_assign => -;
}

impl Neg for RationalTime {
    type Output = Self;
    fn neg(self) -> Self {
        Self(-self.0)
    }
}

impl fmt::Display for RationalTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.3}s", self.to_seconds_f64())
    }
}

/// Frames per second as `numerator / denominator` (30000/1001 for 29.97).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FrameRate {
    pub numerator: u32,
    pub denominator: u32,
}

impl FrameRate {
    pub const FPS_30: Self = Self::new(30, 1);

    #[inline]
    pub const fn new(numerator: u32, denominator: u32) -> Self {
        Self {
            numerator,
            denominator,
        }
    }

    /// Both terms non-zero.
    #[inline]
    pub const fn is_valid(self) -> bool {
        self.numerator != 0 && self.denominator != 0
    }
}

impl Default for FrameRate {
    fn default() -> Self {
        Self::FPS_30
    }
}

impl fmt::Display for FrameRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.denominator == 1 {
            write!(f, "{} fps", self.numerator)
        } else {
            write!(f, "{:.3} fps", self.numerator as f64 / self.denominator as f64)
        }
    }
}

/// Half-open span `[start, start + duration)`. This is what a clip occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimeRange {
    pub start: RationalTime,
    pub duration: RationalTime,
}

impl TimeRange {
    #[inline]
    pub fn new(start: RationalTime, duration: RationalTime) -> Self {
        Self { start, duration }
    }

    /// Exclusive end.
    #[inline]
    pub fn end(self) -> RationalTime {
        self.start + self.duration
    }

    #[inline]
    pub fn contains(self, time: RationalTime) -> bool {
        self.start <= time && time < self.end()
    }

    /// Inside the range and on neither edge. A split point must satisfy this.
    #[inline]
    pub fn contains_strictly(self, time: RationalTime) -> bool {
        self.start < time && time < self.end()
    }

    pub fn overlaps(self, other: Self) -> bool {
        self.start < other.end() && other.start < self.end()
    }

    /// Merge with a range that begins exactly where this one ends.
    pub fn join(self, next: Self) -> Option<Self> {
        (self.end() == next.start).then(|| Self::new(self.start, self.duration + next.duration))
    }
}
