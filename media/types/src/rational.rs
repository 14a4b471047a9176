/*!
    Time bases and frame rates.
*/

use std::fmt;

/**
    Ratio of two integers, as FFmpeg reports time bases and rates.

    A stream tick lasts `num / den` seconds: 1/12800 for most MP4 files,
    1/25 for a 25 fps Y4M file. Rates such as 30000/1001 use the same type.
    Media files may leave a value unset, which is represented as `0/1`.
*/
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rational {
    pub num: i32,
    pub den: i32,
}

impl Rational {
    /// The value FFmpeg reports when a rate or ratio is unknown.
    pub const UNSET: Self = Self { num: 0, den: 1 };

    /**
        # Panics

        Panics if `den` is zero.
    */
    #[inline]
    pub const fn new(num: i32, den: i32) -> Self {
        assert!(den != 0, "zero denominator in rational");
        Self { num, den }
    }

    /**
        Returns the ratio if both parts are positive, which is what a usable
        time base or frame rate needs.
    */
    #[inline]
    pub const fn positive(num: i32, den: i32) -> Option<Self> {
        if num > 0 && den > 0 {
            Some(Self { num, den })
        } else {
            None
        }
    }

    pub const fn is_unset(self) -> bool {
        self.num == 0
    }

    #[inline]
    pub fn to_f64(self) -> f64 {
        f64::from(self.num) / f64::from(self.den)
    }
}

impl Default for Rational {
    fn default() -> Self {
        Self::UNSET
    }
}

impl fmt::Display for Rational {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.num, self.den)
    }
}

impl fmt::Debug for Rational {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}
