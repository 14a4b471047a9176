/*!
    Timestamp type for media timing.
*/

use std::time::Duration;

use crate::Rational;

// Tick values this close to an integer are treated as exact.
const TICK_EPSILON: f64 = 1e-6;

/**
    Timestamp in time_base units.

    This is the raw tick count from the media stream. To convert to
    seconds, you need the stream's time base.
*/
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Pts(pub i64);

impl Pts {
    /**
        Convert this timestamp to seconds using the given time base.
    */
    #[inline]
    pub fn to_seconds(self, time_base: Rational) -> f64 {
        self.0 as f64 * time_base.num as f64 / time_base.den as f64
    }

    /**
        Convert this timestamp to a Duration using the given time base.

        Negative timestamps are clamped to zero.
    */
    #[inline]
    pub fn to_duration(self, time_base: Rational) -> Duration {
        if self.0 <= 0 {
            return Duration::ZERO;
        }
        Duration::from_secs_f64(self.to_seconds(time_base).max(0.0))
    }

    /**
        Returns the first tick at or after `seconds`.

        Returns `None` for negative or non-finite input, or a time base
        that is not positive.
    */
    pub fn from_seconds_ceil(seconds: f64, time_base: Rational) -> Option<Self> {
        if !seconds.is_finite() || seconds < 0.0 || time_base.num <= 0 || time_base.den <= 0 {
            return None;
        }
        let ticks = seconds * time_base.den as f64 / time_base.num as f64;
        let nearest = ticks.round();
        let ticks = if (ticks - nearest).abs() < TICK_EPSILON {
            nearest
        } else {
            ticks.ceil()
        };
        Some(Self(ticks as i64))
    }
}

impl From<i64> for Pts {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl From<Pts> for i64 {
    fn from(pts: Pts) -> Self {
        pts.0
    }
}
